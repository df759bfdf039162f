//! Content renderers for the nine realms
//!
//! Each realm view is composed from a handful of widgets (cards, lists,
//! radar, waveforms, bars). Renderers are pure functions of
//! `(t, view, style)`: they keep no state between frames, so re-entering a
//! realm always starts from the same picture.

use std::f32::consts::TAU;

use tiny_skia::Pixmap;

use crate::domain::animation::pulse;
use crate::domain::core::Rect;
use crate::domain::presentation::{FrameStyle, Rgb};
use crate::domain::realm::RealmId;
use crate::ui::draw;
use crate::ui::text::{Align, TextRenderer};

/// Everything a widget needs to draw into the content area
pub struct RealmCanvas<'a> {
    pub pixmap: &'a mut Pixmap,
    pub text: &'a TextRenderer,
    pub style: &'a FrameStyle,
    /// Surface scale relative to the 1920x1080 logical canvas
    pub scale: f32,
    /// Seconds since the realm was entered
    pub t: f32,
    pub accent: Rgb,
}

/// Draws the body of `realm` for `view` inside `area`
pub fn draw_realm_content(canvas: &mut RealmCanvas<'_>, realm: RealmId, view: usize, area: Rect) {
    let (top, bottom) = split_rows(area, 0.45, 24.0 * canvas.scale);

    match (realm, view) {
        (RealmId::Home, 0) => {
            canvas.cards(
                top,
                &[
                    ("Weather", "18° Clear"),
                    ("Lights", "6 on"),
                    ("Climate", "21.5°"),
                    ("Doors", "Locked"),
                ],
            );
            canvas.list(
                bottom,
                &[
                    ("07:30", "Wake-up routine"),
                    ("18:00", "Dinner lights"),
                    ("22:30", "Night mode"),
                ],
            );
        }
        (RealmId::Home, 1) => {
            canvas.camera_feed(top, "Front door");
            canvas.list(
                bottom,
                &[("09:12", "Parcel left at porch"), ("11:40", "Courier arriving at 14:00")],
            );
        }
        (RealmId::Home, 2) => canvas.list(
            area,
            &[
                ("Movie night", "Lights 20%, blinds down"),
                ("Focus", "Cool white, do not disturb"),
                ("Away", "Cameras armed, heating eco"),
            ],
        ),
        (RealmId::Home, _) => canvas.orb(area),

        (RealmId::Clinical, 0) => {
            canvas.cards(
                top,
                &[("Heart rate", "72 bpm"), ("SpO2", "98%"), ("Blood pressure", "118/76")],
            );
            canvas.wave(bottom, Waveform::Ecg);
        }
        (RealmId::Clinical, 1) => canvas.bars(
            area,
            &[0.42, 0.65, 0.58, 0.81, 0.73, 0.9, 0.55],
            &["M", "T", "W", "T", "F", "S", "S"],
        ),
        (RealmId::Clinical, 2) => canvas.list(
            area,
            &[
                ("Sleep", "7h 40m, above weekly average"),
                ("Hydration", "1.4 L of 2.0 L"),
                ("Mobility", "Steady gait this week"),
            ],
        ),
        (RealmId::Clinical, _) => canvas.progress(
            area,
            &[("Morning medication", 1.0), ("Physio exercises", 0.6), ("Evening medication", 0.0)],
        ),

        (RealmId::Education, 0) => canvas.list(
            area,
            &[
                ("09:00", "Mathematics"),
                ("10:30", "History essay"),
                ("13:00", "Lab: optics"),
                ("15:00", "Reading"),
            ],
        ),
        (RealmId::Education, 1) => {
            canvas.orb(top);
            let done = (canvas.t / (25.0 * 60.0)).clamp(0.0, 1.0);
            canvas.progress(bottom, &[("Focus block", done)]);
        }
        (RealmId::Education, _) => canvas.bars(
            area,
            &[0.7, 0.85, 0.6, 0.92],
            &["Math", "Science", "History", "Language"],
        ),

        (RealmId::Transport, 0) => {
            canvas.route(top);
            canvas.list(
                bottom,
                &[("Downtown", "18 min"), ("Airport", "42 min"), ("Office", "25 min")],
            );
        }
        (RealmId::Transport, 1) => canvas.cards(
            area,
            &[("Battery", "82%"), ("Range", "312 km"), ("Tyres", "OK")],
        ),
        (RealmId::Transport, _) => canvas.list(
            area,
            &[
                ("Line 4", "2 min"),
                ("Line 12", "7 min"),
                ("Express A", "11 min"),
                ("Line 4", "14 min"),
            ],
        ),

        (RealmId::Emergency, 0) => {
            canvas.cards(top, &[("Units ready", "12"), ("On call", "4"), ("Open incidents", "1")]);
            canvas.alarm_ring(bottom);
        }
        (RealmId::Emergency, 1) => canvas.radar(area, &[(0.6, 0.4), (2.1, 0.7), (4.0, 0.3)]),
        (RealmId::Emergency, _) => canvas.list(
            area,
            &[("M-12", "En route, ETA 4 min"), ("F-03", "On scene"), ("P-21", "Available")],
        ),

        (RealmId::Security, 0) => canvas.radar(area, &[(1.2, 0.8), (3.3, 0.55)]),
        (RealmId::Security, 1) => {
            let (left, right) = split_cols(area, 0.5, 24.0 * canvas.scale);
            canvas.camera_feed(left, "Gate");
            canvas.camera_feed(right, "Garage");
        }
        (RealmId::Security, _) => canvas.list(
            area,
            &[
                ("08:02", "Front door unlocked (family)"),
                ("08:15", "Garage closed"),
                ("12:47", "Side gate motion"),
            ],
        ),

        (RealmId::Enterprise, 0) => {
            canvas.cards(top, &[("Revenue", "+4.2%"), ("Uptime", "99.98%"), ("Incidents", "0")]);
            canvas.bars(bottom, &[0.5, 0.62, 0.58, 0.71, 0.8], &["Q1", "Q2", "Q3", "Q4", "Now"]);
        }
        (RealmId::Enterprise, 1) => canvas.progress(
            area,
            &[("Qualified", 0.8), ("Proposal", 0.55), ("Negotiation", 0.3), ("Closed", 0.15)],
        ),
        (RealmId::Enterprise, 2) => canvas.bars(
            area,
            &[0.82, 0.74, 0.9],
            &["Platform", "Mobile", "Data"],
        ),
        (RealmId::Enterprise, _) => canvas.list(
            area,
            &[("10:00", "Standup"), ("11:30", "Design review"), ("15:00", "All hands")],
        ),

        (RealmId::Aviation, 0) => canvas.radar(
            area,
            &[(0.4, 0.5), (1.9, 0.85), (3.1, 0.3), (5.2, 0.65)],
        ),
        (RealmId::Aviation, 1) => canvas.list(
            area,
            &[
                ("UAL 482", "Landed 27L"),
                ("DAL 1190", "Final approach"),
                ("AAL 77", "Holding, 6 min"),
            ],
        ),
        (RealmId::Aviation, _) => {
            canvas.cards(top, &[("Wind", "270° 14 kt"), ("Visibility", "10 km"), ("QNH", "1013")]);
            canvas.wave(bottom, Waveform::Sine);
        }

        (RealmId::Maritime, 0) => canvas.radar(area, &[(0.9, 0.6), (2.6, 0.45), (4.4, 0.8)]),
        (RealmId::Maritime, 1) => canvas.list(
            area,
            &[("ATLANTIC STAR", "Berth 4"), ("NORDIC WIND", "Anchored"), ("PILOT 2", "Underway")],
        ),
        (RealmId::Maritime, _) => {
            canvas.cards(top, &[("High tide", "14:32"), ("Low tide", "20:47"), ("Swell", "1.2 m")]);
            canvas.wave(bottom, Waveform::Tide);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waveform {
    Ecg,
    Sine,
    Tide,
}

impl RealmCanvas<'_> {
    fn panel(&mut self, rect: Rect) {
        let palette = self.style.palette;
        draw::fill_rounded(
            self.pixmap,
            rect,
            18.0 * self.scale,
            self.style.shade(palette.panel),
            0.85,
        );
        draw::stroke_rounded(
            self.pixmap,
            rect,
            18.0 * self.scale,
            2.0 * self.scale,
            self.style.shade(self.accent),
            0.35,
        );
    }

    /// Intensity-scaled alpha for moving elements
    fn lively(&self, alpha: f32) -> f32 {
        alpha * self.style.config.animation_intensity
    }

    fn cards(&mut self, area: Rect, items: &[(&str, &str)]) {
        let fonts = self.style.palette.fonts;
        let gap = 24.0 * self.scale;
        for (rect, (label, value)) in area.columns(items.len(), gap).into_iter().zip(items) {
            self.panel(rect);
            let (cx, _) = rect.center();
            let label_color = self.style.text(self.style.palette.text_dim);
            let value_color = self.style.text(self.style.palette.text);
            self.text.draw(
                self.pixmap,
                label,
                cx,
                rect.y + rect.h * 0.2,
                fonts.label * self.scale,
                label_color,
                1.0,
                Align::Center,
            );
            self.text.draw(
                self.pixmap,
                value,
                cx,
                rect.y + rect.h * 0.5,
                fonts.subtitle * self.scale,
                value_color,
                1.0,
                Align::Center,
            );
        }
    }

    fn list(&mut self, area: Rect, rows: &[(&str, &str)]) {
        if rows.is_empty() {
            return;
        }
        let fonts = self.style.palette.fonts;
        let gap = 12.0 * self.scale;
        let fit_h = (area.h - gap * (rows.len() - 1) as f32) / rows.len() as f32;
        let row_h = fit_h.min(110.0 * self.scale);
        let size = fonts.body * self.scale;

        for (i, (key, value)) in rows.iter().enumerate() {
            let row = Rect::new(area.x, area.y + i as f32 * (row_h + gap), area.w, row_h);
            self.panel(row);
            let baseline = row.y + (row.h - size) / 2.0;
            let pad = 28.0 * self.scale;
            let accent = self.style.text(self.accent);
            let text = self.style.text(self.style.palette.text);
            self.text.draw(self.pixmap, key, row.x + pad, baseline, size, accent, 1.0, Align::Left);
            self.text.draw(
                self.pixmap,
                value,
                row.right() - pad,
                baseline,
                size,
                text,
                1.0,
                Align::Right,
            );
        }
    }

    fn progress(&mut self, area: Rect, items: &[(&str, f32)]) {
        if items.is_empty() {
            return;
        }
        let fonts = self.style.palette.fonts;
        let slot_h = area.h / items.len() as f32;
        let bar_h = (slot_h * 0.25).min(36.0 * self.scale);

        for (i, (label, fraction)) in items.iter().enumerate() {
            let y = area.y + i as f32 * slot_h;
            let text = self.style.text(self.style.palette.text);
            self.text.draw(
                self.pixmap,
                label,
                area.x,
                y,
                fonts.body * self.scale,
                text,
                1.0,
                Align::Left,
            );
            let pct = format!("{:.0}%", fraction.clamp(0.0, 1.0) * 100.0);
            self.text.draw(
                self.pixmap,
                &pct,
                area.right(),
                y,
                fonts.body * self.scale,
                text,
                1.0,
                Align::Right,
            );

            let track = Rect::new(area.x, y + fonts.body * self.scale * 1.4, area.w, bar_h);
            draw::fill_rounded(
                self.pixmap,
                track,
                bar_h / 2.0,
                self.style.shade(self.style.palette.panel),
                1.0,
            );
            let filled = Rect::new(track.x, track.y, track.w * fraction.clamp(0.0, 1.0), track.h);
            draw::fill_rounded(
                self.pixmap,
                filled,
                bar_h / 2.0,
                self.style.shade(self.accent),
                0.9,
            );
        }
    }

    fn bars(&mut self, area: Rect, values: &[f32], labels: &[&str]) {
        let fonts = self.style.palette.fonts;
        let label_h = fonts.label * self.scale * 1.6;
        let chart = Rect::new(area.x, area.y, area.w, (area.h - label_h).max(0.0));
        self.panel(area);
        let inner = chart.inset(24.0 * self.scale);
        let breathe = 0.9 + 0.1 * pulse(self.t, 0.25);

        for (i, rect) in inner.columns(values.len(), 24.0 * self.scale).into_iter().enumerate() {
            let value = values[i].clamp(0.0, 1.0) * breathe;
            let bar = Rect::new(rect.x, rect.bottom() - rect.h * value, rect.w, rect.h * value);
            draw::fill_rounded(
                self.pixmap,
                bar,
                8.0 * self.scale,
                self.style.shade(self.accent),
                0.8,
            );
            if let Some(label) = labels.get(i) {
                let dim = self.style.text(self.style.palette.text_dim);
                let (cx, _) = rect.center();
                self.text.draw(
                    self.pixmap,
                    label,
                    cx,
                    chart.bottom(),
                    fonts.label * self.scale,
                    dim,
                    1.0,
                    Align::Center,
                );
            }
        }
    }

    fn radar(&mut self, area: Rect, blips: &[(f32, f32)]) {
        let (cx, cy) = area.center();
        let radius = area.w.min(area.h) * 0.48;
        let ring = self.style.shade(self.accent);

        for i in 1..=4 {
            draw::stroke_circle(
                self.pixmap,
                cx,
                cy,
                radius * i as f32 / 4.0,
                2.0 * self.scale,
                ring,
                0.35,
            );
        }
        draw::line(self.pixmap, (cx - radius, cy), (cx + radius, cy), 1.0 * self.scale, ring, 0.25);
        draw::line(self.pixmap, (cx, cy - radius), (cx, cy + radius), 1.0 * self.scale, ring, 0.25);

        // One sweep every four seconds
        let sweep = (self.t * TAU / 4.0).rem_euclid(TAU);
        let tip = (cx + sweep.cos() * radius, cy + sweep.sin() * radius);
        let sweep_alpha = self.lively(0.9).max(0.2);
        draw::line(self.pixmap, (cx, cy), tip, 3.0 * self.scale, ring, sweep_alpha);

        for &(angle, dist) in blips {
            // Blips flare as the sweep passes and fade over the next revolution
            let behind = (sweep - angle).rem_euclid(TAU) / TAU;
            let alpha = 0.25 + 0.75 * self.lively(1.0 - behind);
            let (bx, by) = (cx + angle.cos() * radius * dist, cy + angle.sin() * radius * dist);
            draw::radial_glow(self.pixmap, bx, by, 22.0 * self.scale, ring, alpha * 0.6);
            draw::fill_circle(self.pixmap, bx, by, 6.0 * self.scale, ring, alpha);
        }
    }

    fn wave(&mut self, area: Rect, form: Waveform) {
        self.panel(area);
        let inner = area.inset(24.0 * self.scale);
        let mid = inner.y + inner.h / 2.0;
        let amp = inner.h * 0.4;
        let steps = 160;

        let points: Vec<(f32, f32)> = (0..=steps)
            .map(|i| {
                let u = i as f32 / steps as f32;
                let x = inner.x + u * inner.w;
                let y = match form {
                    Waveform::Ecg => {
                        // One beat per second scrolling left
                        let phase = (u * 3.0 + self.t).rem_euclid(1.0);
                        let spike = if (0.42..0.46).contains(&phase) {
                            -1.0
                        } else if (0.46..0.5).contains(&phase) {
                            0.6
                        } else {
                            0.08 * (phase * TAU * 2.0).sin()
                        };
                        mid + spike * amp
                    }
                    Waveform::Sine => mid + (u * TAU * 2.0 + self.t).sin() * amp * 0.6,
                    Waveform::Tide => mid - (u * TAU + self.t * 0.1).sin() * amp * 0.8,
                };
                (x, y)
            })
            .collect();

        draw::polyline(self.pixmap, &points, 3.0 * self.scale, self.style.shade(self.accent), 0.9);
    }

    fn orb(&mut self, area: Rect) {
        let (cx, cy) = area.center();
        let p = pulse(self.t, 0.2);
        let radius = area.w.min(area.h) * (0.3 + 0.08 * p);
        let color = self.style.shade(self.accent);
        let (halo, core) = (self.lively(0.35 * (0.5 + 0.5 * p)), 0.25 + self.lively(0.35));
        draw::radial_glow(self.pixmap, cx, cy, radius * 1.6, color, halo);
        draw::fill_circle(self.pixmap, cx, cy, radius * 0.5, color, core);
    }

    fn alarm_ring(&mut self, area: Rect) {
        let (cx, cy) = area.center();
        let max_r = area.w.min(area.h) * 0.45;
        let danger = self.style.shade(self.style.palette.danger);
        for k in 0..3 {
            let phase = ((self.t * 0.5) + k as f32 / 3.0).rem_euclid(1.0);
            let alpha = self.lively(1.0 - phase);
            draw::stroke_circle(
                self.pixmap,
                cx,
                cy,
                max_r * phase,
                4.0 * self.scale,
                danger,
                alpha,
            );
        }
        draw::fill_circle(self.pixmap, cx, cy, max_r * 0.12, danger, 0.9);
    }

    fn camera_feed(&mut self, area: Rect, label: &str) {
        self.panel(area);
        let inner = area.inset(16.0 * self.scale);
        let scan_y = inner.y + inner.h * (self.t * 0.3).rem_euclid(1.0);
        let line_color = self.style.shade(self.accent);
        let scan_alpha = self.lively(0.5);
        draw::line(
            self.pixmap,
            (inner.x, scan_y),
            (inner.right(), scan_y),
            2.0 * self.scale,
            line_color,
            scan_alpha,
        );

        let fonts = self.style.palette.fonts;
        let danger = self.style.shade(self.style.palette.danger);
        let live_alpha = 0.4 + 0.6 * pulse(self.t, 1.0);
        draw::fill_circle(
            self.pixmap,
            inner.x + 20.0 * self.scale,
            inner.y + 24.0 * self.scale,
            9.0 * self.scale,
            danger,
            live_alpha,
        );
        let text = self.style.text(self.style.palette.text);
        self.text.draw(
            self.pixmap,
            label,
            inner.x + 40.0 * self.scale,
            inner.y + 8.0 * self.scale,
            fonts.label * self.scale,
            text,
            1.0,
            Align::Left,
        );
    }

    fn route(&mut self, area: Rect) {
        self.panel(area);
        let inner = area.inset(40.0 * self.scale);
        let stops = [
            (inner.x, inner.bottom()),
            (inner.x + inner.w * 0.35, inner.y + inner.h * 0.3),
            (inner.x + inner.w * 0.65, inner.y + inner.h * 0.7),
            (inner.right(), inner.y),
        ];
        let color = self.style.shade(self.accent);
        draw::polyline(self.pixmap, &stops, 5.0 * self.scale, color, 0.7);
        for &(x, y) in &stops {
            draw::fill_circle(self.pixmap, x, y, 10.0 * self.scale, color, 0.9);
        }

        // Vehicle marker travels the route every twelve seconds
        let u = (self.t / 12.0).rem_euclid(1.0) * (stops.len() - 1) as f32;
        let seg = (u.floor() as usize).min(stops.len() - 2);
        let f = u - seg as f32;
        let (a, b) = (stops[seg], stops[seg + 1]);
        let pos = (a.0 + (b.0 - a.0) * f, a.1 + (b.1 - a.1) * f);
        let warning = self.style.shade(self.style.palette.warning);
        let halo = self.lively(0.7);
        draw::radial_glow(self.pixmap, pos.0, pos.1, 30.0 * self.scale, warning, halo);
        draw::fill_circle(self.pixmap, pos.0, pos.1, 12.0 * self.scale, warning, 1.0);
    }
}

fn split_rows(area: Rect, top_fraction: f32, gap: f32) -> (Rect, Rect) {
    let top_h = ((area.h - gap) * top_fraction).max(0.0);
    let bottom_h = (area.h - gap - top_h).max(0.0);
    (
        Rect::new(area.x, area.y, area.w, top_h),
        Rect::new(area.x, area.y + top_h + gap, area.w, bottom_h),
    )
}

fn split_cols(area: Rect, left_fraction: f32, gap: f32) -> (Rect, Rect) {
    let left_w = ((area.w - gap) * left_fraction).max(0.0);
    let right_w = (area.w - gap - left_w).max(0.0);
    (
        Rect::new(area.x, area.y, left_w, area.h),
        Rect::new(area.x + left_w + gap, area.y, right_w, area.h),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::presentation::{Mode, PresentationState, Theme};

    fn render(realm: RealmId, view: usize, mode: Mode, t: f32) -> Pixmap {
        let mut pixmap = Pixmap::new(480, 270).unwrap();
        let text = TextRenderer::blocks();
        let style = PresentationState::new(mode, Theme::Neon).snapshot();
        let mut canvas = RealmCanvas {
            pixmap: &mut pixmap,
            text: &text,
            style: &style,
            scale: 0.25,
            t,
            accent: realm.accent(),
        };
        draw_realm_content(&mut canvas, realm, view, Rect::new(10.0, 10.0, 460.0, 250.0));
        pixmap
    }

    #[test]
    fn every_view_draws_something() {
        for realm in RealmId::ALL {
            for view in 0..realm.num_views() {
                let pixmap = render(realm, view, Mode::Normal, 1.5);
                assert!(
                    pixmap.data().iter().any(|&b| b != 0),
                    "{} view {} rendered nothing",
                    realm.name(),
                    view
                );
            }
        }
    }

    #[test]
    fn content_is_a_function_of_time_and_view() {
        let a = render(RealmId::Aviation, 0, Mode::Study, 2.0);
        let b = render(RealmId::Aviation, 0, Mode::Study, 2.0);
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn splits_respect_gap() {
        let (top, bottom) = split_rows(Rect::new(0.0, 0.0, 100.0, 110.0), 0.5, 10.0);
        assert_eq!(top.h, 50.0);
        assert_eq!(bottom.y, 60.0);
        assert_eq!(bottom.h, 50.0);

        let (left, right) = split_cols(Rect::new(0.0, 0.0, 110.0, 10.0), 0.5, 10.0);
        assert_eq!(left.w, 50.0);
        assert_eq!(right.x, 60.0);
    }
}
