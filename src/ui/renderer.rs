//! Frame rendering for the wall
//!
//! Composes one full frame with tiny-skia: background glows, the particle
//! field, then either the launcher grid or the active realm with its event
//! overlay. Layout calculation is kept separate from drawing so it can be
//! tested without rasterizing anything.

use std::time::Duration;

use chrono::{DateTime, Local};
use tiny_skia::Pixmap;

use crate::domain::animation::{ease_in_out, glow, pulse, GlowSpec, ParticleField, Ticker};
use crate::domain::core::{scale_for, Rect};
use crate::domain::launcher::{GridCoords, LauncherCursor, GRID_COLS, GRID_ROWS, SLOT_COUNT};
use crate::domain::presentation::FrameStyle;
use crate::domain::realm::{RealmId, RealmSession};
use crate::ui::draw;
use crate::ui::realms::{draw_realm_content, RealmCanvas};
use crate::ui::text::{Align, TextRenderer};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Failed to create {width}x{height} pixmap for rendering")]
    PixmapCreationFailed { width: u32, height: u32 },
}

/// What the frame shows, borrowed from the controller's state
#[derive(Debug, Clone, Copy)]
pub enum SceneView<'a> {
    Launcher { cursor: LauncherCursor },
    Realm { session: &'a RealmSession },
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub scene: SceneView<'a>,
    /// Style snapshot taken once for this frame
    pub style: FrameStyle,
    /// Seconds since startup, drives ambient animation
    pub t: f32,
    /// Monotonic time, used for realm timings
    pub now: Duration,
    pub wall_clock: DateTime<Local>,
    pub particles: &'a ParticleField,
    pub ticker: &'a Ticker,
}

/// Pre-calculated launcher geometry
#[derive(Debug, Clone, PartialEq)]
pub struct LauncherLayout {
    pub title: Rect,
    pub clock: Rect,
    pub tiles: Vec<Rect>,
    pub hints: Rect,
    pub ticker: Rect,
}

impl LauncherLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let frac = |fx, fy, fw, fh| Rect::from_fractions(width, height, fx, fy, fw, fh);
        let grid = frac(0.14, 0.22, 0.72, 0.6);
        let gap = 28.0 * scale_for(width, height);

        let tile_w = (grid.w - gap * (GRID_COLS - 1) as f32) / GRID_COLS as f32;
        let tile_h = (grid.h - gap * (GRID_ROWS - 1) as f32) / GRID_ROWS as f32;
        let tiles = (0..SLOT_COUNT)
            .map(|slot| {
                let GridCoords { row, col } = GridCoords::from_slot(slot);
                Rect::new(
                    grid.x + col as f32 * (tile_w + gap),
                    grid.y + row as f32 * (tile_h + gap),
                    tile_w.max(0.0),
                    tile_h.max(0.0),
                )
            })
            .collect();

        Self {
            title: frac(0.04, 0.04, 0.6, 0.12),
            clock: frac(0.6, 0.04, 0.36, 0.14),
            tiles,
            hints: frac(0.04, 0.845, 0.92, 0.05),
            ticker: frac(0.0, 0.92, 1.0, 0.08),
        }
    }
}

/// Pre-calculated realm screen geometry
#[derive(Debug, Clone, PartialEq)]
pub struct RealmLayout {
    pub header: Rect,
    pub indicator: Rect,
    pub content: Rect,
    pub footer: Rect,
    pub overlay: Rect,
}

impl RealmLayout {
    pub fn new(width: u32, height: u32) -> Self {
        let frac = |fx, fy, fw, fh| Rect::from_fractions(width, height, fx, fy, fw, fh);
        Self {
            header: frac(0.04, 0.04, 0.92, 0.1),
            indicator: frac(0.04, 0.15, 0.92, 0.03),
            content: frac(0.06, 0.21, 0.88, 0.64),
            footer: frac(0.04, 0.9, 0.92, 0.06),
            overlay: frac(0.2, 0.38, 0.6, 0.2),
        }
    }
}

/// Fixed positions of the three background halos
const BACKGROUND_GLOWS: [(f32, f32, f32); 3] = [
    (0.18, 0.28, 0.0),
    (0.82, 0.22, 1.3),
    (0.5, 0.86, 2.6),
];

/// Seconds the event overlay takes to fade in and out
const OVERLAY_FADE: f32 = 0.3;

/// Renders frames into a reused pixmap
#[derive(Debug)]
pub struct WallRenderer {
    text: TextRenderer,
    pulse_hz: f32,
    pixmap: Option<Pixmap>,
}

impl WallRenderer {
    pub fn new(text: TextRenderer, pulse_hz: f32) -> Self {
        Self {
            text,
            pulse_hz,
            pixmap: None,
        }
    }

    /// Draws a full frame at `width` x `height` and returns it
    pub fn render(
        &mut self,
        width: u32,
        height: u32,
        frame: &FrameInput<'_>,
    ) -> Result<&Pixmap, RendererError> {
        let reuse = matches!(&self.pixmap, Some(p) if p.width() == width && p.height() == height);
        if !reuse {
            let pixmap = Pixmap::new(width, height)
                .ok_or(RendererError::PixmapCreationFailed { width, height })?;
            tracing::debug!(width, height, "allocated frame buffer");
            self.pixmap = Some(pixmap);
        }

        let Some(pixmap) = self.pixmap.as_mut() else {
            return Err(RendererError::PixmapCreationFailed { width, height });
        };

        let painter = Painter {
            text: &self.text,
            pulse_hz: self.pulse_hz,
            scale: scale_for(width, height),
            width,
            height,
        };
        painter.paint(pixmap, frame);
        Ok(pixmap)
    }
}

/// Per-frame drawing state borrowed from the renderer
struct Painter<'a> {
    text: &'a TextRenderer,
    pulse_hz: f32,
    scale: f32,
    width: u32,
    height: u32,
}

impl Painter<'_> {
    fn paint(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>) {
        let style = &frame.style;
        pixmap.fill(draw::color(style.shade(style.palette.background), 1.0));

        self.paint_background_glows(pixmap, frame);
        self.paint_particles(pixmap, frame);

        match frame.scene {
            SceneView::Launcher { cursor } => self.paint_launcher(pixmap, frame, cursor),
            SceneView::Realm { session } => self.paint_realm(pixmap, frame, session),
        }
    }

    fn paint_background_glows(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>) {
        let style = &frame.style;
        let colors = [style.palette.primary, style.palette.secondary, style.palette.accent];
        let min_dim = self.width.min(self.height) as f32;
        let spec = GlowSpec {
            base_alpha: 70.0,
            base_radius: min_dim * 0.28,
            radius_span: min_dim * 0.06,
        };

        for (&(fx, fy, offset), color) in BACKGROUND_GLOWS.iter().zip(colors) {
            let g = glow(spec, &style.config, pulse(frame.t + offset, self.pulse_hz));
            let alpha = g.alpha as f32 / 255.0 * style.config.circle_alpha_multiplier;
            draw::radial_glow(
                pixmap,
                fx * self.width as f32,
                fy * self.height as f32,
                g.radius,
                style.shade(color),
                alpha,
            );
        }
    }

    fn paint_particles(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>) {
        let style = &frame.style;
        let (fw, fh) = frame.particles.bounds();
        let (sx, sy) = (self.width as f32 / fw, self.height as f32 / fh);
        let color = style.shade(style.palette.primary);

        for particle in frame.particles.particles() {
            let twinkle = 0.6 + 0.4 * pulse(frame.t + particle.phase, 0.3);
            let alpha = particle.draw_alpha(&style.config) as f32 / 255.0 * twinkle;
            draw::fill_circle(
                pixmap,
                particle.x * sx,
                particle.y * sy,
                particle.radius * self.scale,
                color,
                alpha,
            );
        }
    }

    fn paint_launcher(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>, cursor: LauncherCursor) {
        let style = &frame.style;
        let fonts = style.palette.fonts;
        let layout = LauncherLayout::new(self.width, self.height);
        let s = self.scale;

        let primary = style.text(style.palette.primary);
        let text = style.text(style.palette.text);
        let dim = style.text(style.palette.text_dim);

        self.text.draw(
            pixmap,
            "MOTIBEAM SPATIAL OS",
            layout.title.x,
            layout.title.y,
            fonts.title * s,
            primary,
            1.0,
            Align::Left,
        );
        self.text.draw(
            pixmap,
            "Select a realm",
            layout.title.x,
            layout.title.y + fonts.title * s * 1.15,
            fonts.body * s,
            dim,
            1.0,
            Align::Left,
        );

        let clock = frame.wall_clock.format("%H:%M:%S").to_string();
        let date = frame.wall_clock.format("%A, %d %B %Y").to_string();
        let right = layout.clock.right();
        self.text.draw(
            pixmap,
            &clock,
            right,
            layout.clock.y,
            fonts.title * s,
            text,
            1.0,
            Align::Right,
        );
        self.text.draw(
            pixmap,
            &date,
            right,
            layout.clock.y + fonts.title * s * 1.1,
            fonts.label * s,
            dim,
            1.0,
            Align::Right,
        );
        self.paint_status(
            pixmap,
            frame,
            right,
            layout.clock.y + fonts.title * s * 1.1 + fonts.label * s * 1.4,
        );

        let p = pulse(frame.t, self.pulse_hz);
        for (slot, tile) in layout.tiles.iter().enumerate() {
            let Some(realm) = RealmId::from_slot(slot) else {
                continue;
            };
            self.paint_tile(pixmap, frame, *tile, realm, slot == cursor.slot(), p);
        }

        self.text.draw(
            pixmap,
            "ARROWS select   1-9 jump   ENTER launch   M mode   T theme   F fullscreen   Q quit",
            layout.hints.center().0,
            layout.hints.y,
            fonts.label * s,
            dim,
            1.0,
            Align::Center,
        );

        self.paint_ticker(pixmap, frame, layout.ticker);
    }

    fn paint_tile(
        &self,
        pixmap: &mut Pixmap,
        frame: &FrameInput<'_>,
        tile: Rect,
        realm: RealmId,
        selected: bool,
        p: f32,
    ) {
        let style = &frame.style;
        let fonts = style.palette.fonts;
        let s = self.scale;
        let accent = style.shade(realm.accent());
        let radius = 22.0 * s;

        if selected {
            // Breathing halo behind the selected tile
            let g = glow(
                GlowSpec {
                    base_alpha: 160.0,
                    base_radius: tile.w.max(tile.h) * 0.55,
                    radius_span: 24.0 * s,
                },
                &style.config,
                p,
            );
            let (cx, cy) = tile.center();
            draw::radial_glow(pixmap, cx, cy, g.radius, accent, g.alpha as f32 / 255.0);
        }

        draw::fill_rounded(pixmap, tile, radius, style.shade(style.palette.panel), 0.92);
        let (border_w, border_a) = if selected {
            (5.0 * s, 0.7 + 0.3 * p)
        } else {
            (2.0 * s, 0.45)
        };
        draw::stroke_rounded(pixmap, tile, radius, border_w, accent, border_a);

        let (cx, _) = tile.center();
        let label = style.text(realm.accent());
        let text = style.text(style.palette.text);
        let dim = style.text(style.palette.text_dim);

        self.text.draw(
            pixmap,
            &(realm.slot() + 1).to_string(),
            tile.x + 18.0 * s,
            tile.y + 12.0 * s,
            fonts.label * s,
            dim,
            1.0,
            Align::Left,
        );
        self.text.draw(
            pixmap,
            realm.symbol(),
            cx,
            tile.y + tile.h * 0.18,
            fonts.subtitle * s,
            label,
            1.0,
            Align::Center,
        );
        self.text.draw(
            pixmap,
            realm.name(),
            cx,
            tile.y + tile.h * 0.48,
            fonts.body * s,
            text,
            1.0,
            Align::Center,
        );
        self.text.draw(
            pixmap,
            &format!("{} views", realm.num_views()),
            cx,
            tile.y + tile.h * 0.72,
            fonts.label * s,
            dim,
            1.0,
            Align::Center,
        );
    }

    /// Mode and theme labels, right-aligned at `right`
    fn paint_status(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>, right: f32, y: f32) {
        let style = &frame.style;
        let size = style.palette.fonts.label * self.scale;
        let status = format!("Mode: {}   Theme: {}", style.mode.label(), style.theme.label());
        let width = self.text.measure(&status, size);
        self.text.draw(
            pixmap,
            &status,
            right,
            y,
            size,
            style.text(style.palette.text_dim),
            1.0,
            Align::Right,
        );
        draw::fill_circle(
            pixmap,
            right - width - size * 0.8,
            y + size * 0.55,
            size * 0.3,
            style.mode.indicator(),
            0.9,
        );
    }

    fn paint_ticker(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>, strip: Rect) {
        let style = &frame.style;
        let size = style.palette.fonts.ticker * self.scale;
        draw::fill_rect(pixmap, strip, style.shade(style.palette.panel), 0.85);
        draw::line(
            pixmap,
            (strip.x, strip.y),
            (strip.right(), strip.y),
            2.0 * self.scale,
            style.shade(style.palette.primary),
            0.5,
        );

        let text = frame.ticker.text();
        let text_w = self.text.measure(&text, size);
        let x = strip.x + frame.ticker.offset(strip.w, text_w);
        self.text.draw(
            pixmap,
            &text,
            x,
            strip.y + (strip.h - size) / 2.0,
            size,
            style.text(style.palette.text),
            1.0,
            Align::Left,
        );
    }

    fn paint_realm(&self, pixmap: &mut Pixmap, frame: &FrameInput<'_>, session: &RealmSession) {
        let style = &frame.style;
        let fonts = style.palette.fonts;
        let s = self.scale;
        let layout = RealmLayout::new(self.width, self.height);
        let realm = session.realm();
        let accent = realm.accent();
        let t = session.elapsed(frame.now);

        // Header
        let title = format!("{} {}", realm.symbol(), realm.name());
        self.text.draw(
            pixmap,
            &title,
            layout.header.x,
            layout.header.y,
            fonts.title * s,
            style.text(accent),
            1.0,
            Align::Left,
        );

        let view = session.current_view();
        let view_name = realm.view_names().get(view).copied().unwrap_or("");
        let view_label = format!("View {}/{}: {}", view + 1, session.num_views(), view_name);
        let right = layout.header.right();
        self.text.draw(
            pixmap,
            &view_label,
            right,
            layout.header.y,
            fonts.subtitle * s,
            style.text(style.palette.text),
            1.0,
            Align::Right,
        );
        self.paint_status(pixmap, frame, right, layout.header.y + fonts.subtitle * s * 1.3);

        // Live indicator
        let live_alpha = 0.4 + 0.6 * pulse(frame.t, 1.0);
        let live_x = layout.header.x + self.text.measure(&title, fonts.title * s) + 36.0 * s;
        draw::fill_circle(
            pixmap,
            live_x,
            layout.header.y + fonts.title * s * 0.55,
            10.0 * s,
            style.shade(style.palette.danger),
            live_alpha,
        );

        // View indicator dots
        let dot_r = 8.0 * s;
        let spacing = 32.0 * s;
        let (_, cy) = layout.indicator.center();
        for i in 0..session.num_views() {
            let x = layout.indicator.x + dot_r + i as f32 * spacing;
            if i == view {
                draw::fill_circle(pixmap, x, cy, dot_r * 1.3, style.shade(accent), 1.0);
            } else {
                draw::stroke_circle(
                    pixmap,
                    x,
                    cy,
                    dot_r,
                    2.0 * s,
                    style.shade(style.palette.text_dim),
                    0.8,
                );
            }
        }

        let mut canvas = RealmCanvas {
            pixmap: &mut *pixmap,
            text: self.text,
            style,
            scale: s,
            t,
            accent,
        };
        draw_realm_content(&mut canvas, realm, view, layout.content);

        let hints = format!(
            "LEFT/RIGHT views   1-{} jump   SPACE interact   C alert   ESC back   M mode   T theme",
            session.num_views()
        );
        self.text.draw(
            pixmap,
            &hints,
            layout.footer.center().0,
            layout.footer.y,
            fonts.label * s,
            style.text(style.palette.text_dim),
            1.0,
            Align::Center,
        );

        if session.event_active() {
            self.paint_event_overlay(pixmap, frame, session, layout.overlay);
        }
    }

    fn paint_event_overlay(
        &self,
        pixmap: &mut Pixmap,
        frame: &FrameInput<'_>,
        session: &RealmSession,
        rect: Rect,
    ) {
        let style = &frame.style;
        let s = self.scale;
        let window = session.event_window().as_secs_f32().max(f32::EPSILON);
        let remaining = session.event_remaining(frame.now) * window;
        let shown = window - remaining;
        let alpha = ease_in_out(shown / OVERLAY_FADE).min(ease_in_out(remaining / OVERLAY_FADE));
        if alpha <= 0.0 {
            return;
        }

        let warning = style.shade(style.palette.warning);
        draw::radial_glow(
            pixmap,
            rect.center().0,
            rect.center().1,
            rect.w * 0.6,
            warning,
            0.25 * alpha * style.config.animation_intensity,
        );
        draw::fill_rounded(pixmap, rect, 24.0 * s, style.shade(style.palette.panel), 0.95 * alpha);
        draw::stroke_rounded(pixmap, rect, 24.0 * s, 4.0 * s, warning, alpha);

        let size = style.palette.fonts.body * s;
        self.text.draw(
            pixmap,
            session.event_text(),
            rect.center().0,
            rect.y + (rect.h - size) / 2.0,
            size,
            style.text(style.palette.text),
            alpha,
            Align::Center,
        );

        // Countdown bar along the bottom edge
        let bar = Rect::new(
            rect.x + 24.0 * s,
            rect.bottom() - 18.0 * s,
            (rect.w - 48.0 * s) * (remaining / window),
            6.0 * s,
        );
        draw::fill_rect(pixmap, bar, warning, 0.8 * alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presentation::{Mode, PresentationState, Theme};
    use crate::domain::realm::{SessionEvent, SessionStep, TriggerKind};

    fn rects_overlap(a: &Rect, b: &Rect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    #[test]
    fn launcher_layout_has_nine_disjoint_tiles() {
        let layout = LauncherLayout::new(1920, 1080);
        assert_eq!(layout.tiles.len(), 9);
        for (i, a) in layout.tiles.iter().enumerate() {
            assert!(a.w > 0.0 && a.h > 0.0);
            assert!(a.right() <= 1920.0 && a.bottom() <= 1080.0);
            for b in &layout.tiles[i + 1..] {
                assert!(!rects_overlap(a, b));
            }
        }
        assert!(!rects_overlap(&layout.tiles[8], &layout.ticker));
    }

    #[test]
    fn layouts_scale_with_surface() {
        let small = LauncherLayout::new(960, 540);
        let large = LauncherLayout::new(1920, 1080);
        assert!((large.tiles[0].w - small.tiles[0].w * 2.0).abs() < 1.0);

        let realm = RealmLayout::new(1280, 720);
        assert!(realm.header.bottom() <= realm.content.y);
        assert!(realm.content.bottom() <= realm.footer.y);
    }

    fn frame<'a>(
        scene: SceneView<'a>,
        mode: Mode,
        particles: &'a ParticleField,
        ticker: &'a Ticker,
        now: Duration,
    ) -> FrameInput<'a> {
        FrameInput {
            scene,
            style: PresentationState::new(mode, Theme::Neon).snapshot(),
            t: now.as_secs_f32(),
            now,
            wall_clock: Local::now(),
            particles,
            ticker,
        }
    }

    fn brightness(pixmap: &Pixmap) -> u64 {
        pixmap.data().chunks(4).map(|px| px[0] as u64 + px[1] as u64 + px[2] as u64).sum()
    }

    #[test]
    fn renders_launcher_frame() {
        let particles = ParticleField::new(50, 480.0, 270.0, 1);
        let ticker = Ticker::new(vec!["hello".into()], 60.0);
        let mut renderer = WallRenderer::new(TextRenderer::blocks(), 0.8);

        let input = frame(
            SceneView::Launcher { cursor: LauncherCursor::new(4) },
            Mode::Normal,
            &particles,
            &ticker,
            Duration::ZERO,
        );
        let pixmap = renderer.render(480, 270, &input).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (480, 270));
        assert!(brightness(pixmap) > 0);
    }

    #[test]
    fn sleep_mode_is_darker_than_normal() {
        let particles = ParticleField::new(50, 480.0, 270.0, 1);
        let ticker = Ticker::new(vec!["hello".into()], 60.0);
        let mut renderer = WallRenderer::new(TextRenderer::blocks(), 0.8);
        let scene = SceneView::Launcher { cursor: LauncherCursor::default() };

        let normal_frame = frame(scene, Mode::Normal, &particles, &ticker, Duration::ZERO);
        let normal = brightness(renderer.render(480, 270, &normal_frame).unwrap());
        let sleep_frame = frame(scene, Mode::Sleep, &particles, &ticker, Duration::ZERO);
        let sleep = brightness(renderer.render(480, 270, &sleep_frame).unwrap());
        assert!(sleep < normal);
    }

    #[test]
    fn renders_realm_with_overlay() {
        let particles = ParticleField::new(10, 480.0, 270.0, 1);
        let ticker = Ticker::new(Vec::new(), 60.0);
        let mut renderer = WallRenderer::new(TextRenderer::blocks(), 0.8);

        let session = RealmSession::new(RealmId::Clinical, Duration::ZERO);
        let alert = SessionEvent::Trigger(TriggerKind::Alert);
        let triggered_at = Duration::from_millis(100);
        let SessionStep::Continue(session) = session.process_event(alert, triggered_at) else {
            panic!("session exited");
        };

        let now = Duration::from_millis(1500);
        let scene = SceneView::Realm { session: &session };
        let overlay_frame = frame(scene, Mode::Normal, &particles, &ticker, now);
        let with_overlay = renderer.render(480, 270, &overlay_frame).unwrap().clone();

        let mut cleared = session.clone();
        cleared.tick(Duration::from_secs(5));
        let scene = SceneView::Realm { session: &cleared };
        let cleared_frame = frame(scene, Mode::Normal, &particles, &ticker, now);
        let without = renderer.render(480, 270, &cleared_frame).unwrap();

        assert_ne!(with_overlay.data(), without.data());
    }

    #[test]
    fn resizes_frame_buffer() {
        let particles = ParticleField::new(0, 100.0, 100.0, 1);
        let ticker = Ticker::new(Vec::new(), 60.0);
        let mut renderer = WallRenderer::new(TextRenderer::blocks(), 0.8);
        let scene = SceneView::Launcher { cursor: LauncherCursor::default() };

        let input = frame(scene, Mode::Normal, &particles, &ticker, Duration::ZERO);
        assert_eq!(renderer.render(320, 180, &input).unwrap().width(), 320);
        assert_eq!(renderer.render(640, 360, &input).unwrap().width(), 640);
        assert!(matches!(
            renderer.render(0, 360, &input),
            Err(RendererError::PixmapCreationFailed { width: 0, height: 360 })
        ));
    }
}
