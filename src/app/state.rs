//! Screen state management
//!
//! Defines the top-level screen state machine: either the launcher grid is
//! showing, or exactly one realm is active. Global keys (quit, mode, theme,
//! fullscreen) never reach this module; the controller handles them first.

use std::time::Duration;

use crate::domain::launcher::{LauncherCursor, NavigationDirection};
use crate::domain::realm::{
    RealmId, RealmSession, SessionEvent, SessionStep, TriggerKind, EVENT_WINDOW,
};

/// Which screen is on the wall
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    /// Realm selection grid
    Launcher { cursor: LauncherCursor },
    /// A realm is active; `return_cursor` is restored on exit
    InRealm {
        session: RealmSession,
        return_cursor: LauncherCursor,
    },
}

impl ScreenState {
    pub fn is_launcher(&self) -> bool {
        matches!(self, ScreenState::Launcher { .. })
    }

    pub fn active_realm(&self) -> Option<RealmId> {
        match self {
            ScreenState::Launcher { .. } => None,
            ScreenState::InRealm { session, .. } => Some(session.realm()),
        }
    }

    /// Short name for logs and run summaries
    pub fn label(&self) -> String {
        match self {
            ScreenState::Launcher { cursor } => format!("launcher (slot {})", cursor.slot() + 1),
            ScreenState::InRealm { session, .. } => {
                format!("{} (view {})", session.realm().name(), session.current_view() + 1)
            }
        }
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::Launcher {
            cursor: LauncherCursor::default(),
        }
    }
}

/// Screen-level events after global keys have been filtered out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    Navigate(NavigationDirection),
    /// Numeric key, 1-based
    DirectSelect(u8),
    Launch,
    Trigger(TriggerKind),
    Exit,
}

/// State machine for screen transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a screen event and returns the new state
    ///
    /// # Arguments
    /// * `current_state` - Current screen state
    /// * `event` - Event to process
    /// * `now` - Monotonic time of the event
    /// * `event_window` - Overlay lifetime for sessions created here
    pub fn process_event(
        current_state: ScreenState,
        event: ScreenEvent,
        now: Duration,
        event_window: Duration,
    ) -> ScreenState {
        match (current_state, event) {
            // Launcher
            (ScreenState::Launcher { mut cursor }, ScreenEvent::Navigate(direction)) => {
                cursor.navigate(direction);
                ScreenState::Launcher { cursor }
            }

            (ScreenState::Launcher { mut cursor }, ScreenEvent::DirectSelect(n)) => {
                if (1..=9).contains(&n) {
                    cursor.select(usize::from(n) - 1);
                }
                ScreenState::Launcher { cursor }
            }

            // SPACE launches from the launcher as well as ENTER
            (
                ScreenState::Launcher { cursor },
                ScreenEvent::Launch | ScreenEvent::Trigger(TriggerKind::Interact),
            ) => {
                let realm = cursor.realm();
                tracing::info!(realm = realm.name(), "entering realm");
                ScreenState::InRealm {
                    session: RealmSession::with_event_window(realm, now, event_window),
                    return_cursor: cursor,
                }
            }

            // Realm
            (
                ScreenState::InRealm {
                    session,
                    return_cursor,
                },
                event,
            ) => {
                let Some(session_event) = Self::session_event(event) else {
                    return ScreenState::InRealm {
                        session,
                        return_cursor,
                    };
                };

                let realm = session.realm();
                match session.process_event(session_event, now) {
                    SessionStep::Continue(session) => ScreenState::InRealm {
                        session,
                        return_cursor,
                    },
                    SessionStep::Exited => {
                        tracing::info!(realm = realm.name(), "returning to launcher");
                        ScreenState::Launcher {
                            cursor: return_cursor,
                        }
                    }
                }
            }

            // Alerts do nothing on the launcher; exit there is a quit handled by the controller
            (state, _) => state,
        }
    }

    /// Same as [`process_event`](Self::process_event) with the default overlay window
    pub fn process(current_state: ScreenState, event: ScreenEvent, now: Duration) -> ScreenState {
        Self::process_event(current_state, event, now, EVENT_WINDOW)
    }

    fn session_event(event: ScreenEvent) -> Option<SessionEvent> {
        match event {
            ScreenEvent::Navigate(NavigationDirection::Left) => Some(SessionEvent::Previous),
            ScreenEvent::Navigate(NavigationDirection::Right) => Some(SessionEvent::Next),
            ScreenEvent::Navigate(_) => None,
            ScreenEvent::DirectSelect(n) if n >= 1 => {
                Some(SessionEvent::SelectView(usize::from(n) - 1))
            }
            ScreenEvent::DirectSelect(_) => None,
            ScreenEvent::Trigger(kind) => Some(SessionEvent::Trigger(kind)),
            ScreenEvent::Exit => Some(SessionEvent::Exit),
            ScreenEvent::Launch => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn launcher_at(slot: usize) -> ScreenState {
        ScreenState::Launcher {
            cursor: LauncherCursor::new(slot),
        }
    }

    #[test]
    fn default_state_is_launcher() {
        let state = ScreenState::default();
        assert!(state.is_launcher());
        assert_eq!(state.active_realm(), None);
    }

    #[test]
    fn launch_enters_selected_realm() {
        let state = StateMachine::process(launcher_at(3), ScreenEvent::Launch, at(0));

        assert_eq!(state.active_realm(), Some(RealmId::Transport));
        if let ScreenState::InRealm { session, return_cursor } = state {
            assert_eq!(session.current_view(), 0);
            assert!(!session.event_active());
            assert_eq!(return_cursor.slot(), 3);
        } else {
            panic!("Expected realm state");
        }
    }

    #[test]
    fn exit_restores_launcher_cursor() {
        let state = StateMachine::process(launcher_at(7), ScreenEvent::Launch, at(0));
        let state = StateMachine::process(
            state,
            ScreenEvent::Navigate(NavigationDirection::Right),
            at(10),
        );
        let state = StateMachine::process(state, ScreenEvent::Exit, at(20));

        assert_eq!(state, launcher_at(7));
    }

    #[test]
    fn interact_on_launcher_launches_selected_realm() {
        let state = StateMachine::process(
            launcher_at(4),
            ScreenEvent::Trigger(TriggerKind::Interact),
            at(0),
        );
        assert_eq!(state.active_realm(), Some(RealmId::Emergency));
        if let ScreenState::InRealm { session, return_cursor } = state {
            assert!(!session.event_active());
            assert_eq!(return_cursor.slot(), 4);
        } else {
            panic!("Expected realm state");
        }
    }

    #[test]
    fn alert_on_launcher_is_ignored() {
        let state = StateMachine::process(
            launcher_at(4),
            ScreenEvent::Trigger(TriggerKind::Alert),
            at(0),
        );
        assert_eq!(state, launcher_at(4));
    }

    #[test]
    fn digits_move_launcher_cursor() {
        let state = StateMachine::process(launcher_at(0), ScreenEvent::DirectSelect(9), at(0));
        assert_eq!(state, launcher_at(8));

        let state = StateMachine::process(state, ScreenEvent::DirectSelect(0), at(0));
        assert_eq!(state, launcher_at(8));
    }

    #[test]
    fn digits_select_views_inside_realm() {
        let state = StateMachine::process(launcher_at(0), ScreenEvent::Launch, at(0));
        let state = StateMachine::process(state, ScreenEvent::DirectSelect(3), at(10));
        match &state {
            ScreenState::InRealm { session, .. } => assert_eq!(session.current_view(), 2),
            other => panic!("Expected realm state, got {other:?}"),
        }

        // Home has four views; 9 is out of range and ignored
        let state = StateMachine::process(state, ScreenEvent::DirectSelect(9), at(20));
        match &state {
            ScreenState::InRealm { session, .. } => assert_eq!(session.current_view(), 2),
            other => panic!("Expected realm state, got {other:?}"),
        }
    }

    #[test]
    fn up_down_do_nothing_inside_realm() {
        let state = StateMachine::process(launcher_at(1), ScreenEvent::Launch, at(0));
        let before = state.clone();
        let state = StateMachine::process(
            state,
            ScreenEvent::Navigate(NavigationDirection::Up),
            at(0),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn relaunch_creates_fresh_session() {
        let state = StateMachine::process(launcher_at(0), ScreenEvent::Launch, at(0));
        let state = StateMachine::process(
            state,
            ScreenEvent::Navigate(NavigationDirection::Right),
            at(10),
        );
        let state = StateMachine::process(
            state,
            ScreenEvent::Trigger(TriggerKind::Interact),
            at(20),
        );
        let state = StateMachine::process(state, ScreenEvent::Exit, at(30));
        let state = StateMachine::process(state, ScreenEvent::Launch, at(40));

        match state {
            ScreenState::InRealm { session, .. } => {
                assert_eq!(session.current_view(), 0);
                assert!(!session.event_active());
                assert!(session.event_text().is_empty());
            }
            other => panic!("Expected realm state, got {other:?}"),
        }
    }

    #[test]
    fn session_uses_configured_event_window() {
        let state = StateMachine::process_event(
            launcher_at(0),
            ScreenEvent::Launch,
            at(0),
            at(500),
        );
        let state = StateMachine::process_event(
            state,
            ScreenEvent::Trigger(TriggerKind::Alert),
            at(100),
            at(500),
        );
        let ScreenState::InRealm { mut session, .. } = state else {
            panic!("Expected realm state");
        };
        session.tick(at(700));
        assert!(!session.event_active());
    }
}
