//! Realm catalog and the per-realm session state machine
//!
//! A [`RealmSession`] is created fresh every time a realm is entered from the
//! launcher and dropped on exit. It tracks the active sub-view and a single
//! transient event overlay that auto-clears after a fixed window.
//!
//! ## State machine
//! - `Idle` -> `Viewing` on the first tick or input
//! - `Viewing` -> `Viewing` on LEFT/RIGHT (wrapping) or direct view select
//! - `Viewing` -> `EventShown` on a trigger
//! - `EventShown` -> `Viewing` once the overlay window has elapsed
//! - any state -> `Exited` on exit

use std::time::Duration;

use crate::domain::presentation::Rgb;

/// Default time an event overlay stays visible
pub const EVENT_WINDOW: Duration = Duration::from_secs(3);

/// The nine realms, in launcher slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealmId {
    Home,
    Clinical,
    Education,
    Transport,
    Emergency,
    Security,
    Enterprise,
    Aviation,
    Maritime,
}

impl RealmId {
    pub const ALL: [RealmId; 9] = [
        RealmId::Home,
        RealmId::Clinical,
        RealmId::Education,
        RealmId::Transport,
        RealmId::Emergency,
        RealmId::Security,
        RealmId::Enterprise,
        RealmId::Aviation,
        RealmId::Maritime,
    ];

    /// Realm in launcher slot `slot` (0-based), if any
    pub fn from_slot(slot: usize) -> Option<RealmId> {
        Self::ALL.get(slot).copied()
    }

    /// 0-based launcher slot
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            RealmId::Home => "Home",
            RealmId::Clinical => "Clinical",
            RealmId::Education => "Education",
            RealmId::Transport => "Transport",
            RealmId::Emergency => "Emergency",
            RealmId::Security => "Security",
            RealmId::Enterprise => "Enterprise",
            RealmId::Aviation => "Aviation",
            RealmId::Maritime => "Maritime",
        }
    }

    /// ASCII badge drawn on the launcher tile and realm header
    pub fn symbol(self) -> &'static str {
        match self {
            RealmId::Home => "[H]",
            RealmId::Clinical => "[+]",
            RealmId::Education => "[E]",
            RealmId::Transport => "[T]",
            RealmId::Emergency => "[!]",
            RealmId::Security => "[S]",
            RealmId::Enterprise => "[B]",
            RealmId::Aviation => "[A]",
            RealmId::Maritime => "[M]",
        }
    }

    pub fn accent(self) -> Rgb {
        match self {
            RealmId::Home => Rgb::new(100, 200, 255),
            RealmId::Clinical => Rgb::new(80, 255, 120),
            RealmId::Education => Rgb::new(200, 100, 255),
            RealmId::Transport => Rgb::new(255, 255, 100),
            RealmId::Emergency => Rgb::new(255, 80, 80),
            RealmId::Security => Rgb::new(255, 180, 0),
            RealmId::Enterprise => Rgb::new(0, 255, 180),
            RealmId::Aviation => Rgb::new(100, 150, 255),
            RealmId::Maritime => Rgb::new(0, 200, 200),
        }
    }

    /// Names of the realm's sub-views; the length is the realm's view count
    pub fn view_names(self) -> &'static [&'static str] {
        match self {
            RealmId::Home => &[
                "Home Overview",
                "Camera & Deliveries",
                "Scenes & Routines",
                "Ambient Loop",
            ],
            RealmId::Clinical => &["Vitals", "Activity", "Insights", "Care Plan"],
            RealmId::Education => &["Today", "Focus Session", "Progress"],
            RealmId::Transport => &["Commute", "Vehicle", "Transit Board"],
            RealmId::Emergency => &["Readiness", "Incident", "Dispatch"],
            RealmId::Security => &["Perimeter", "Cameras", "Access Log"],
            RealmId::Enterprise => &["War Room", "Pipeline", "Team Health", "Calendar"],
            RealmId::Aviation => &["Sector Radar", "Arrivals", "Weather"],
            RealmId::Maritime => &["Harbor Radar", "Vessel Board", "Tides"],
        }
    }

    pub fn num_views(self) -> usize {
        self.view_names().len()
    }

    /// Message shown in the event overlay for a trigger in `view`
    pub fn event_message(self, kind: TriggerKind, view: usize) -> String {
        let view_name = self.view_names().get(view).copied().unwrap_or("View");
        let body = match (self, kind) {
            (RealmId::Home, TriggerKind::Interact) => "Doorbell: visitor waiting at the front door",
            (RealmId::Home, TriggerKind::Alert) => "Package delivered to the porch",
            (RealmId::Clinical, TriggerKind::Interact) => "Vitals check recorded: all within range",
            (RealmId::Clinical, TriggerKind::Alert) => "Caregiver notified",
            (RealmId::Education, TriggerKind::Interact) => "Focus block started: 25 minutes",
            (RealmId::Education, TriggerKind::Alert) => "Assignment due in 2 hours",
            (RealmId::Transport, TriggerKind::Interact) => "Route refreshed: 18 min to downtown",
            (RealmId::Transport, TriggerKind::Alert) => "Delay on Line 4: +6 min",
            (RealmId::Emergency, TriggerKind::Interact) => "Drill acknowledged by all stations",
            (RealmId::Emergency, TriggerKind::Alert) => "Unit M-12 dispatched",
            (RealmId::Security, TriggerKind::Interact) => "Perimeter sweep complete",
            (RealmId::Security, TriggerKind::Alert) => "Motion detected: side gate",
            (RealmId::Enterprise, TriggerKind::Interact) => "Room 3B booked for 30 minutes",
            (RealmId::Enterprise, TriggerKind::Alert) => "Deploy finished: build green",
            (RealmId::Aviation, TriggerKind::Interact) => "Handoff accepted: UAL 482",
            (RealmId::Aviation, TriggerKind::Alert) => "Wind shear advisory runway 27L",
            (RealmId::Maritime, TriggerKind::Interact) => "Berth 4 cleared for ATLANTIC STAR",
            (RealmId::Maritime, TriggerKind::Alert) => "Small craft advisory issued",
        };
        format!("{view_name}: {body}")
    }
}

/// Kind of user trigger that raises an event overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// General interaction (SPACE)
    Interact,
    /// Alert-style event (C)
    Alert,
}

/// Observable phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Just entered, nothing processed yet
    Idle,
    Viewing,
    EventShown,
}

/// Realm-local input after global keys have been handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Previous,
    Next,
    /// Direct jump to a 0-based view; ignored when out of range
    SelectView(usize),
    Trigger(TriggerKind),
    Exit,
}

/// Result of feeding an event to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    Continue(RealmSession),
    Exited,
}

/// Transient state of one visit to a realm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmSession {
    realm: RealmId,
    current_view: usize,
    num_views: usize,
    phase: SessionPhase,
    event_active: bool,
    event_started_at: Duration,
    event_text: String,
    entered_at: Duration,
    event_window: Duration,
}

impl RealmSession {
    /// Fresh session entered at `now`, with the default overlay window
    pub fn new(realm: RealmId, now: Duration) -> Self {
        Self::with_event_window(realm, now, EVENT_WINDOW)
    }

    pub fn with_event_window(realm: RealmId, now: Duration, event_window: Duration) -> Self {
        Self {
            realm,
            current_view: 0,
            num_views: realm.num_views().max(1),
            phase: SessionPhase::Idle,
            event_active: false,
            event_started_at: now,
            event_text: String::new(),
            entered_at: now,
            event_window,
        }
    }

    pub fn realm(&self) -> RealmId {
        self.realm
    }

    pub fn current_view(&self) -> usize {
        self.current_view
    }

    pub fn num_views(&self) -> usize {
        self.num_views
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn event_active(&self) -> bool {
        self.event_active
    }

    pub fn event_text(&self) -> &str {
        &self.event_text
    }

    pub fn event_started_at(&self) -> Duration {
        self.event_started_at
    }

    /// How long an overlay stays up
    pub fn event_window(&self) -> Duration {
        self.event_window
    }

    /// Seconds since the session was entered, the `t` for realm animation
    pub fn elapsed(&self, now: Duration) -> f32 {
        now.saturating_sub(self.entered_at).as_secs_f32()
    }

    /// Fraction of the overlay window still remaining, 0.0 when inactive
    pub fn event_remaining(&self, now: Duration) -> f32 {
        if !self.event_active || self.event_window.is_zero() {
            return 0.0;
        }
        let shown = now.saturating_sub(self.event_started_at);
        1.0 - (shown.as_secs_f32() / self.event_window.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Processes one realm-local event
    pub fn process_event(mut self, event: SessionEvent, now: Duration) -> SessionStep {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Viewing;
        }

        match event {
            SessionEvent::Exit => return SessionStep::Exited,
            SessionEvent::Previous => {
                self.current_view = (self.current_view + self.num_views - 1) % self.num_views;
            }
            SessionEvent::Next => {
                self.current_view = (self.current_view + 1) % self.num_views;
            }
            SessionEvent::SelectView(view) => {
                if view < self.num_views {
                    self.current_view = view;
                }
            }
            SessionEvent::Trigger(kind) => {
                self.event_text = self.realm.event_message(kind, self.current_view);
                // Re-triggering a visible overlay only swaps its text
                if !self.event_active {
                    self.event_active = true;
                    self.event_started_at = now;
                    self.phase = SessionPhase::EventShown;
                }
            }
        }

        SessionStep::Continue(self)
    }

    /// Per-frame update: clears the overlay once its window has passed
    pub fn tick(&mut self, now: Duration) {
        if self.phase == SessionPhase::Idle {
            self.phase = SessionPhase::Viewing;
        }
        if self.event_active && now.saturating_sub(self.event_started_at) >= self.event_window {
            self.event_active = false;
            self.phase = SessionPhase::Viewing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn step(session: RealmSession, event: SessionEvent, now: Duration) -> RealmSession {
        match session.process_event(event, now) {
            SessionStep::Continue(s) => s,
            SessionStep::Exited => panic!("unexpected exit"),
        }
    }

    #[test]
    fn catalog_has_nine_slots_in_order() {
        assert_eq!(RealmId::ALL.len(), 9);
        for (slot, realm) in RealmId::ALL.iter().enumerate() {
            assert_eq!(realm.slot(), slot);
            assert_eq!(RealmId::from_slot(slot), Some(*realm));
        }
        assert_eq!(RealmId::from_slot(9), None);
        assert_eq!(RealmId::from_slot(3).map(RealmId::num_views), Some(3));
    }

    #[test]
    fn new_session_starts_idle() {
        let session = RealmSession::new(RealmId::Clinical, secs(10.0));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.current_view(), 0);
        assert!(!session.event_active());
        assert_eq!(session.num_views(), 4);
    }

    #[test]
    fn first_tick_moves_to_viewing() {
        let mut session = RealmSession::new(RealmId::Home, secs(0.0));
        session.tick(secs(0.016));
        assert_eq!(session.phase(), SessionPhase::Viewing);
    }

    #[test]
    fn left_from_zero_wraps_to_last() {
        let session = RealmSession::new(RealmId::Home, secs(0.0));
        assert_eq!(session.num_views(), 4);
        let session = step(session, SessionEvent::Previous, secs(0.1));
        assert_eq!(session.current_view(), 3);
        let session = step(session, SessionEvent::Next, secs(0.2));
        assert_eq!(session.current_view(), 0);
    }

    #[test]
    fn direct_select_ignores_out_of_range() {
        let session = RealmSession::new(RealmId::Aviation, secs(0.0));
        let session = step(session, SessionEvent::SelectView(2), secs(0.1));
        assert_eq!(session.current_view(), 2);
        let session = step(session, SessionEvent::SelectView(7), secs(0.2));
        assert_eq!(session.current_view(), 2);
    }

    #[test]
    fn trigger_shows_event_then_auto_clears() {
        let session = RealmSession::new(RealmId::Security, secs(0.0));
        let mut session = step(session, SessionEvent::Trigger(TriggerKind::Alert), secs(1.0));
        assert!(session.event_active());
        assert_eq!(session.phase(), SessionPhase::EventShown);
        assert!(session.event_text().contains("Motion detected"));

        session.tick(secs(3.5));
        assert!(session.event_active(), "still inside the window");

        session.tick(secs(4.0));
        assert!(!session.event_active());
        assert_eq!(session.phase(), SessionPhase::Viewing);
    }

    #[test]
    fn late_frame_clears_overlay_without_error() {
        let session = RealmSession::new(RealmId::Home, secs(0.0));
        let mut session = step(session, SessionEvent::Trigger(TriggerKind::Interact), secs(0.0));
        session.tick(secs(60.0));
        assert!(!session.event_active());
    }

    #[test]
    fn retrigger_replaces_text_only() {
        let session = RealmSession::new(RealmId::Home, secs(0.0));
        let first = step(session, SessionEvent::Trigger(TriggerKind::Interact), secs(1.0));
        let second = step(first.clone(), SessionEvent::Trigger(TriggerKind::Alert), secs(2.5));

        assert_ne!(first.event_text(), second.event_text());
        assert_eq!(second.event_started_at(), first.event_started_at());
        assert_eq!(second.current_view(), first.current_view());
        assert_eq!(second.phase(), SessionPhase::EventShown);

        let mut second = second;
        second.tick(secs(4.0));
        assert!(!second.event_active(), "window measured from the first trigger");
    }

    #[test]
    fn navigation_keeps_overlay_visible() {
        let session = RealmSession::new(RealmId::Maritime, secs(0.0));
        let session = step(session, SessionEvent::Trigger(TriggerKind::Interact), secs(0.5));
        let session = step(session, SessionEvent::Next, secs(1.0));
        assert_eq!(session.current_view(), 1);
        assert!(session.event_active());
    }

    #[test]
    fn exit_is_accepted_from_every_phase() {
        let idle = RealmSession::new(RealmId::Home, secs(0.0));
        assert_eq!(idle.clone().process_event(SessionEvent::Exit, secs(0.0)), SessionStep::Exited);

        let shown = step(idle, SessionEvent::Trigger(TriggerKind::Interact), secs(0.1));
        assert_eq!(shown.process_event(SessionEvent::Exit, secs(0.2)), SessionStep::Exited);
    }

    #[test]
    fn remaining_fraction_counts_down() {
        let session = RealmSession::new(RealmId::Home, secs(0.0));
        let session = step(session, SessionEvent::Trigger(TriggerKind::Interact), secs(0.0));
        assert!((session.event_remaining(secs(1.5)) - 0.5).abs() < 1e-4);
        assert_eq!(session.event_remaining(secs(9.0)), 0.0);
    }

    #[test]
    fn every_realm_produces_messages() {
        for realm in RealmId::ALL {
            for view in 0..realm.num_views() {
                assert!(!realm.event_message(TriggerKind::Interact, view).is_empty());
                assert!(!realm.event_message(TriggerKind::Alert, view).is_empty());
            }
        }
    }

    fn any_realm() -> impl Strategy<Value = RealmId> {
        prop::sample::select(RealmId::ALL.to_vec())
    }

    fn any_event() -> impl Strategy<Value = SessionEvent> {
        prop_oneof![
            Just(SessionEvent::Previous),
            Just(SessionEvent::Next),
            (0usize..12).prop_map(SessionEvent::SelectView),
            Just(SessionEvent::Trigger(TriggerKind::Interact)),
            Just(SessionEvent::Trigger(TriggerKind::Alert)),
        ]
    }

    proptest! {
        #[test]
        fn view_index_stays_in_bounds(
            realm in any_realm(),
            events in prop::collection::vec(any_event(), 0..64)
        ) {
            let mut session = RealmSession::new(realm, Duration::ZERO);
            for (i, event) in events.into_iter().enumerate() {
                let now = Duration::from_millis(i as u64 * 100);
                session = match session.process_event(event, now) {
                    SessionStep::Continue(s) => s,
                    SessionStep::Exited => unreachable!(),
                };
                session.tick(now);
                prop_assert!(session.current_view() < session.num_views());
            }
        }
    }
}
