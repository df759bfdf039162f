//! Animation primitives for the living-wall effect
//!
//! Everything here is driven only by the `t`/`dt` arguments and the current
//! [`ModeConfig`]; nothing reads a clock. Multipliers scale outputs and never
//! feed back into a phase, so a mode change mid-pulse cannot cause a jump.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::presentation::ModeConfig;

/// Largest frame delta fed to any update step, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Default breathing frequency for glow halos (Hz)
pub const DEFAULT_PULSE_HZ: f32 = 0.8;

/// Hard cap on particles in one field
pub const MAX_PARTICLES: usize = 150;

/// Clamps a raw frame delta into `[0, max_dt]`
///
/// Stalls (window defocus, debugger pause) would otherwise teleport every
/// particle in a single step. Negative or NaN deltas become zero.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_nan() || dt <= 0.0 {
        return 0.0;
    }
    dt.min(max_dt)
}

/// Breathing pulse in `[0, 1]`: `0.5 + 0.5 * sin(2π·frequency·t)`
pub fn pulse(t: f32, frequency: f32) -> f32 {
    (0.5 + 0.5 * (TAU * frequency * t).sin()).clamp(0.0, 1.0)
}

/// Smoothstep easing for `t` in `[0, 1]`
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Static description of a glowing element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowSpec {
    /// Peak alpha before mode scaling (0..=255)
    pub base_alpha: f32,
    pub base_radius: f32,
    /// Extra radius reached at the top of the pulse
    pub radius_span: f32,
}

/// Resolved glow for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub alpha: u8,
    pub radius: f32,
}

/// Computes the glow for a pulse value under the given mode multipliers
///
/// Always produces a drawable result; deep sleep simply yields alpha 0.
pub fn glow(spec: GlowSpec, config: &ModeConfig, pulse_value: f32) -> Glow {
    let p = if pulse_value.is_nan() { 0.0 } else { pulse_value.clamp(0.0, 1.0) };
    let alpha = (spec.base_alpha * config.animation_intensity * p).round();
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 255.0) };
    Glow {
        alpha: alpha as u8,
        radius: (spec.base_radius + spec.radius_span * p).max(0.0),
    }
}

/// One ambient particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    /// Phase offset in seconds, used to de-synchronise twinkling
    pub phase: f32,
    pub base_alpha: f32,
}

impl Particle {
    /// Advances the particle and wraps it toroidally inside `width` x `height`
    pub fn update(&mut self, dt: f32, speed_multiplier: f32, width: f32, height: f32) {
        self.x = wrap(self.x + self.vx * speed_multiplier * dt, width);
        self.y = wrap(self.y + self.vy * speed_multiplier * dt, height);
    }

    /// Alpha to draw with under the current mode
    pub fn draw_alpha(&self, config: &ModeConfig) -> u8 {
        (self.base_alpha * config.circle_alpha_multiplier).round().clamp(0.0, 255.0) as u8
    }
}

fn wrap(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Fixed-size set of drifting particles
///
/// Particles are never added or removed after construction.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
}

impl ParticleField {
    /// Seeds `count` particles (capped at [`MAX_PARTICLES`]) deterministically
    pub fn new(count: usize, width: f32, height: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = count.min(MAX_PARTICLES);
        let width = width.max(1.0);
        let height = height.max(1.0);

        let particles = (0..count)
            .map(|_| {
                let speed: f32 = rng.random_range(6.0..28.0);
                let heading: f32 = rng.random_range(0.0..TAU);
                Particle {
                    x: rng.random_range(0.0..width),
                    y: rng.random_range(0.0..height),
                    vx: heading.cos() * speed,
                    vy: heading.sin() * speed,
                    radius: rng.random_range(1.5..4.5),
                    phase: rng.random_range(0.0..10.0),
                    base_alpha: rng.random_range(30.0..110.0),
                }
            })
            .collect();

        Self {
            particles,
            width,
            height,
        }
    }

    /// Steps every particle by `dt` seconds (already clamped by the caller)
    pub fn update(&mut self, dt: f32, config: &ModeConfig) {
        for particle in &mut self.particles {
            particle.update(dt, config.circle_speed_multiplier, self.width, self.height);
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// Horizontally scrolling message strip
///
/// Scroll distance accumulates from `dt` so a speed change never jumps the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    messages: Vec<String>,
    speed: f32,
    scrolled: f32,
}

impl Ticker {
    pub const SEPARATOR: &'static str = "  •  ";

    pub fn new(messages: Vec<String>, speed_px_per_sec: f32) -> Self {
        Self {
            messages,
            speed: speed_px_per_sec.max(0.0),
            scrolled: 0.0,
        }
    }

    /// The full strip text
    pub fn text(&self) -> String {
        self.messages.join(Self::SEPARATOR)
    }

    pub fn advance(&mut self, dt: f32, config: &ModeConfig) {
        self.scrolled += self.speed * config.circle_speed_multiplier * dt;
    }

    /// Left edge of the text for a strip `strip_width` wide
    ///
    /// Text enters from the right edge and wraps once fully off the left.
    pub fn offset(&self, strip_width: f32, text_width: f32) -> f32 {
        let cycle = (strip_width + text_width).max(1.0);
        strip_width - self.scrolled.rem_euclid(cycle)
    }
}
