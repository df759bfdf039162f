//! Screen controller and frame loop
//!
//! The controller owns the single active [`ScreenState`], the global
//! presentation state and the ambient animation, and drives them from a
//! fixed-rate frame loop. Each frame it:
//! 1. drains input, handling quit first, then global keys, then the screen
//! 2. ticks the active realm session (overlay expiry)
//! 3. advances particles and the ticker by a clamped `dt`
//! 4. snapshots the presentation style once and renders with it
//! 5. presents the frame and waits for the next frame deadline

use std::time::Duration;

use thiserror::Error;

use crate::app::clock::TimeSource;
use crate::app::state::{ScreenEvent, ScreenState, StateMachine};
use crate::config::{ConfigError, WallConfig};
use crate::domain::animation::{clamp_dt, ParticleField, Ticker};
use crate::domain::launcher::LauncherCursor;
use crate::domain::presentation::{Mode, PresentationState, Theme};
use crate::input::{InputEvent, InputSource, ScriptError};
use crate::ui::{DisplaySurface, FrameInput, SceneView, SurfaceError, WallRenderer};

/// Startup errors; once the frame loop runs only quit ends it
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid input script: {0}")]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Display(#[from] SurfaceError),
}

/// Messages scrolling along the bottom of the launcher
const TICKER_MESSAGES: &[&str] = &[
    "MotiBeam Spatial OS",
    "Nine realms online",
    "1-9 to jump, ENTER or SPACE to launch",
    "ESC or Q to quit",
    "M cycles Normal / Study / Sleep",
    "T cycles Neon / Minimal / Night",
];

/// Ticker speed in pixels per second at full animation speed
const TICKER_SPEED: f32 = 120.0;

/// Outcome of a single input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What a finished run looked like
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub final_screen: ScreenState,
    pub mode: Mode,
    pub theme: Theme,
}

/// Main application controller
pub struct ScreenController {
    config: WallConfig,
    screen: ScreenState,
    presentation: PresentationState,
    particles: ParticleField,
    ticker: Ticker,
    renderer: WallRenderer,
    max_frames: Option<u64>,
    frames: u64,
    failed_frames: u64,
    /// Launcher/realm transitions so far; each screen gets its own particle field
    scene_generation: u64,
}

/// Particle field for the `generation`-th screen of a run
fn scene_particles(config: &WallConfig, generation: u64) -> ParticleField {
    ParticleField::new(
        config.particle_count,
        config.width as f32,
        config.height as f32,
        config.seed.wrapping_add(generation),
    )
}

impl ScreenController {
    /// Creates a controller on the launcher with the configured mode and theme
    pub fn new(config: WallConfig, renderer: WallRenderer) -> Self {
        let particles = scene_particles(&config, 0);
        let ticker = Ticker::new(
            TICKER_MESSAGES.iter().map(|m| m.to_string()).collect(),
            TICKER_SPEED,
        );

        Self {
            presentation: PresentationState::new(config.initial_mode, config.initial_theme),
            screen: ScreenState::Launcher {
                cursor: LauncherCursor::default(),
            },
            particles,
            ticker,
            renderer,
            max_frames: None,
            frames: 0,
            failed_frames: 0,
            scene_generation: 0,
            config,
        }
    }

    /// Stops the loop after `frames` rendered frames
    pub fn with_max_frames(mut self, frames: Option<u64>) -> Self {
        self.max_frames = frames;
        self
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn presentation(&self) -> PresentationState {
        self.presentation
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Dispatches one input event
    ///
    /// Quit is honored before anything else so a realm can never swallow it.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        now: Duration,
        surface: &mut dyn DisplaySurface,
    ) -> Flow {
        tracing::debug!(?event, "input");

        let screen_event = match event {
            InputEvent::Quit => {
                tracing::info!("quit requested");
                return Flow::Quit;
            }
            InputEvent::CycleMode => {
                let mode = self.presentation.cycle_mode();
                tracing::info!(mode = mode.label(), "mode changed");
                return Flow::Continue;
            }
            InputEvent::CycleTheme => {
                let theme = self.presentation.cycle_theme();
                tracing::info!(theme = theme.label(), "theme changed");
                return Flow::Continue;
            }
            InputEvent::ToggleFullscreen => {
                let target = !surface.is_fullscreen();
                match surface.set_fullscreen(target) {
                    Ok(()) => tracing::info!(fullscreen = target, "fullscreen toggled"),
                    Err(err) => tracing::warn!(error = %err, "fullscreen toggle failed"),
                }
                return Flow::Continue;
            }
            InputEvent::Navigate(direction) => ScreenEvent::Navigate(direction),
            InputEvent::DirectSelect(n) => ScreenEvent::DirectSelect(n),
            InputEvent::Launch => ScreenEvent::Launch,
            InputEvent::Trigger(kind) => ScreenEvent::Trigger(kind),
            InputEvent::Exit if self.screen.is_launcher() => {
                tracing::info!("exit on launcher, quitting");
                return Flow::Quit;
            }
            InputEvent::Exit => ScreenEvent::Exit,
        };

        let was_launcher = self.screen.is_launcher();
        let current = std::mem::take(&mut self.screen);
        self.screen = StateMachine::process_event(
            current,
            screen_event,
            now,
            self.config.event_window(),
        );

        if self.screen.is_launcher() != was_launcher {
            self.scene_generation += 1;
            self.particles = scene_particles(&self.config, self.scene_generation);
        }
        Flow::Continue
    }

    /// Runs the frame loop until quit (or the frame cap) and reports the run
    pub fn run(
        &mut self,
        surface: &mut dyn DisplaySurface,
        input: &mut dyn InputSource,
        clock: &dyn TimeSource,
    ) -> RunSummary {
        let interval = self.config.frame_interval();
        let started = clock.elapsed();
        let mut last = started;
        let mut next_frame = started;

        tracing::info!(
            fps = self.config.target_fps,
            particles = self.particles.len(),
            mode = self.presentation.mode().label(),
            theme = self.presentation.theme().label(),
            "frame loop started"
        );

        loop {
            let now = clock.elapsed();

            for event in input.poll() {
                if self.handle_input(event, now, surface) == Flow::Quit {
                    return self.summary();
                }
            }

            let dt = clamp_dt(now.saturating_sub(last).as_secs_f32(), self.config.max_dt_secs);
            last = now;
            self.update(now, dt);
            self.render_frame(surface, clock, now, now.saturating_sub(started));

            if self.max_frames.is_some_and(|max| self.frames >= max) {
                tracing::info!(frames = self.frames, "frame limit reached");
                return self.summary();
            }

            // Late frames start the next interval from now instead of bursting
            next_frame = (next_frame + interval).max(now);
            clock.wait_until(next_frame);
        }
    }

    fn update(&mut self, now: Duration, dt: f32) {
        if let ScreenState::InRealm { session, .. } = &mut self.screen {
            let was_active = session.event_active();
            session.tick(now);
            if was_active && !session.event_active() {
                tracing::debug!(realm = session.realm().name(), "event overlay cleared");
            }
        }

        let config = self.presentation.snapshot().config;
        self.particles.update(dt, &config);
        self.ticker.advance(dt, &config);
    }

    fn render_frame(
        &mut self,
        surface: &mut dyn DisplaySurface,
        clock: &dyn TimeSource,
        now: Duration,
        since_start: Duration,
    ) {
        let scene = match &self.screen {
            ScreenState::Launcher { cursor } => SceneView::Launcher { cursor: *cursor },
            ScreenState::InRealm { session, .. } => SceneView::Realm { session },
        };
        let frame = FrameInput {
            scene,
            style: self.presentation.snapshot(),
            t: since_start.as_secs_f32(),
            now,
            wall_clock: clock.wall_clock(),
            particles: &self.particles,
            ticker: &self.ticker,
        };

        let (width, height) = surface.size();
        let result = self
            .renderer
            .render(width, height, &frame)
            .map_err(|err| err.to_string())
            .and_then(|pixmap| surface.present(pixmap).map_err(|err| err.to_string()));

        match result {
            Ok(()) => self.frames += 1,
            Err(message) => {
                // Keep running; report the first failure loudly and the rest quietly
                self.failed_frames += 1;
                if self.failed_frames == 1 {
                    tracing::warn!(error = %message, "frame dropped");
                } else {
                    tracing::debug!(error = %message, failed = self.failed_frames, "frame dropped");
                }
            }
        }
    }

    fn summary(&self) -> RunSummary {
        tracing::info!(frames = self.frames, screen = %self.screen.label(), "frame loop stopped");
        RunSummary {
            frames: self.frames,
            final_screen: self.screen.clone(),
            mode: self.presentation.mode(),
            theme: self.presentation.theme(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::clock::ManualClock;
    use crate::domain::launcher::NavigationDirection;
    use crate::domain::realm::{RealmId, TriggerKind};
    use crate::input::ScriptedInput;
    use crate::ui::{HeadlessSurface, TextRenderer};

    fn small_config() -> WallConfig {
        WallConfig {
            width: 320,
            height: 180,
            particle_count: 20,
            ..WallConfig::default()
        }
    }

    fn controller() -> ScreenController {
        let config = small_config();
        let renderer = WallRenderer::new(TextRenderer::blocks(), config.pulse_frequency_hz);
        ScreenController::new(config, renderer)
    }

    fn realm_session(screen: &ScreenState) -> &crate::domain::realm::RealmSession {
        match screen {
            ScreenState::InRealm { session, .. } => session,
            other => panic!("Expected realm state, got {other:?}"),
        }
    }

    #[test]
    fn launch_navigate_trigger_exit_relaunch() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);
        let t = Duration::from_millis;

        for event in [InputEvent::DirectSelect(3), InputEvent::Launch] {
            controller.handle_input(event, t(0), &mut surface);
        }
        let session = realm_session(controller.screen());
        assert_eq!(session.realm(), RealmId::Education);
        assert_eq!(session.num_views(), 3);
        assert_eq!(session.current_view(), 0);
        assert!(!session.event_active());

        let right = InputEvent::Navigate(NavigationDirection::Right);
        controller.handle_input(right, t(100), &mut surface);
        controller.handle_input(right, t(200), &mut surface);
        assert_eq!(realm_session(controller.screen()).current_view(), 2);

        controller.handle_input(InputEvent::Trigger(TriggerKind::Interact), t(300), &mut surface);
        let session = realm_session(controller.screen());
        assert!(session.event_active());
        assert!(!session.event_text().is_empty());

        controller.handle_input(InputEvent::Exit, t(400), &mut surface);
        assert_eq!(
            controller.screen(),
            &ScreenState::Launcher {
                cursor: LauncherCursor::new(2)
            }
        );

        controller.handle_input(InputEvent::Launch, t(500), &mut surface);
        let session = realm_session(controller.screen());
        assert_eq!(session.current_view(), 0);
        assert!(!session.event_active());
    }

    #[test]
    fn global_keys_work_on_every_screen() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);

        controller.handle_input(InputEvent::CycleMode, Duration::ZERO, &mut surface);
        assert_eq!(controller.presentation().mode(), Mode::Study);

        controller.handle_input(InputEvent::Launch, Duration::ZERO, &mut surface);
        controller.handle_input(InputEvent::CycleTheme, Duration::ZERO, &mut surface);
        assert_eq!(controller.presentation().theme(), Theme::Minimal);
        assert!(!controller.screen().is_launcher());

        controller.handle_input(InputEvent::ToggleFullscreen, Duration::ZERO, &mut surface);
        assert!(surface.is_fullscreen());
    }

    #[test]
    fn quit_wins_inside_realm() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);
        controller.handle_input(InputEvent::Launch, Duration::ZERO, &mut surface);
        assert_eq!(
            controller.handle_input(InputEvent::Quit, Duration::ZERO, &mut surface),
            Flow::Quit,
        );
    }

    #[test]
    fn exit_quits_only_from_launcher() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);

        controller.handle_input(InputEvent::Launch, Duration::ZERO, &mut surface);
        assert_eq!(
            controller.handle_input(InputEvent::Exit, Duration::ZERO, &mut surface),
            Flow::Continue,
        );
        assert!(controller.screen().is_launcher());

        assert_eq!(
            controller.handle_input(InputEvent::Exit, Duration::ZERO, &mut surface),
            Flow::Quit,
        );
    }

    #[test]
    fn space_launches_from_launcher() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);

        controller.handle_input(InputEvent::DirectSelect(2), Duration::ZERO, &mut surface);
        controller.handle_input(
            InputEvent::Trigger(TriggerKind::Interact),
            Duration::ZERO,
            &mut surface,
        );

        let session = realm_session(controller.screen());
        assert_eq!(session.realm(), RealmId::Clinical);
        assert!(!session.event_active());
    }

    #[test]
    fn each_screen_gets_its_own_particle_field() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);
        let first_x = |c: &ScreenController| c.particles.particles()[0].x;

        assert_eq!(first_x(&controller), first_x_of(scene_particles(&controller.config, 0)));

        controller.handle_input(InputEvent::Launch, Duration::ZERO, &mut surface);
        assert_eq!(controller.scene_generation, 1);
        assert_eq!(first_x(&controller), first_x_of(scene_particles(&controller.config, 1)));

        // Navigation inside the realm keeps the field
        controller.handle_input(
            InputEvent::Navigate(NavigationDirection::Right),
            Duration::ZERO,
            &mut surface,
        );
        assert_eq!(controller.scene_generation, 1);

        controller.handle_input(InputEvent::Exit, Duration::ZERO, &mut surface);
        assert_eq!(controller.scene_generation, 2);
        assert_eq!(controller.particles.len(), controller.config.particle_count);
    }

    fn first_x_of(field: ParticleField) -> f32 {
        field.particles()[0].x
    }

    #[test]
    fn clock_is_sampled_once_per_frame() {
        struct CountingClock {
            inner: ManualClock,
            samples: std::cell::Cell<u32>,
        }
        impl TimeSource for CountingClock {
            fn elapsed(&self) -> Duration {
                self.samples.set(self.samples.get() + 1);
                self.inner.elapsed()
            }
            fn wall_clock(&self) -> chrono::DateTime<chrono::Local> {
                self.inner.wall_clock()
            }
            fn wait_until(&self, deadline: Duration) {
                self.inner.wait_until(deadline)
            }
        }

        let mut controller = controller().with_max_frames(Some(5));
        let mut surface = HeadlessSurface::new(320, 180);
        let mut input = ScriptedInput::parse("launch:1,trigger,wait:100").unwrap();
        let clock = CountingClock {
            inner: ManualClock::new(),
            samples: std::cell::Cell::new(0),
        };

        controller.run(&mut surface, &mut input, &clock);
        // One sample for the loop start plus one per frame
        assert_eq!(clock.samples.get(), 1 + 5);
    }

    #[test]
    fn scripted_run_reports_summary() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);
        let mut input = ScriptedInput::parse("launch:5,right,trigger,wait:3,mode,quit").unwrap();
        let clock = ManualClock::new();

        let summary = controller.run(&mut surface, &mut input, &clock);

        assert_eq!(summary.mode, Mode::Study);
        assert_eq!(summary.final_screen.active_realm(), Some(RealmId::Emergency));
        assert_eq!(summary.frames, surface.frames_presented());
        assert!(summary.frames >= 6);
    }

    #[test]
    fn failed_snapshots_keep_frame_counts_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();

        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180).with_snapshots(blocker.join("shots"), 1);
        let mut input = ScriptedInput::parse("wait:4,quit").unwrap();
        let clock = ManualClock::new();

        let summary = controller.run(&mut surface, &mut input, &clock);
        assert_eq!(summary.frames, surface.frames_presented());
        assert_eq!(surface.snapshot_failures(), summary.frames);
        assert_eq!(controller.failed_frames, 0);
    }

    #[test]
    fn overlay_clears_after_event_window() {
        let mut controller = controller();
        let mut surface = HeadlessSurface::new(320, 180);
        // 60 fps for 200 frames is a little over three seconds
        let mut input = ScriptedInput::parse("launch:1,trigger,wait:200").unwrap();
        let clock = ManualClock::new();

        let summary = controller.run(&mut surface, &mut input, &clock);

        let session = realm_session(&summary.final_screen);
        assert!(!session.event_active());
        assert!(clock.elapsed() >= Duration::from_secs(3));
    }

    #[test]
    fn frame_cap_stops_loop() {
        let mut controller = controller().with_max_frames(Some(10));
        let mut surface = HeadlessSurface::new(320, 180);
        let mut input = ScriptedInput::parse("wait:1000").unwrap();
        let clock = ManualClock::new();

        let summary = controller.run(&mut surface, &mut input, &clock);
        assert_eq!(summary.frames, 10);
        assert!(summary.final_screen.is_launcher());

        // Ten frames at 60 fps: the clock only ever moves by whole intervals
        let expected = controller.config.frame_interval() * 9;
        assert_eq!(clock.elapsed(), expected);
    }

    #[test]
    fn dropped_frames_do_not_stop_the_loop() {
        struct BrokenSurface;
        impl DisplaySurface for BrokenSurface {
            fn size(&self) -> (u32, u32) {
                (64, 36)
            }
            fn present(&mut self, _frame: &tiny_skia::Pixmap) -> Result<(), SurfaceError> {
                Err(SurfaceError::PresentFailed("device lost".into()))
            }
            fn set_fullscreen(&mut self, _fullscreen: bool) -> Result<(), SurfaceError> {
                Err(SurfaceError::FullscreenFailed("unsupported".into()))
            }
            fn is_fullscreen(&self) -> bool {
                false
            }
        }

        let mut controller = controller();
        let mut input = ScriptedInput::parse("fullscreen,wait:5,quit").unwrap();
        let clock = ManualClock::new();

        let summary = controller.run(&mut BrokenSurface, &mut input, &clock);
        assert_eq!(summary.frames, 0);
        assert!(controller.failed_frames >= 5);
    }
}
