//! Core geometry types
//!
//! All layout in the wall is expressed as fractions of the logical canvas so
//! that a resize or fullscreen toggle never changes the coordinate math.
//! These types resolve those fractions to pixel rectangles.

/// Logical canvas width every layout is designed against
pub const LOGICAL_WIDTH: u32 = 1920;
/// Logical canvas height every layout is designed against
pub const LOGICAL_HEIGHT: u32 = 1080;

/// Rectangle in canvas pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Creates a new rectangle
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Resolves a fractional placement against a canvas of `width` x `height`
    ///
    /// `fx`, `fy`, `fw`, `fh` are fractions of the canvas (0.0..=1.0).
    pub fn from_fractions(width: u32, height: u32, fx: f32, fy: f32, fw: f32, fh: f32) -> Self {
        let (cw, ch) = (width as f32, height as f32);
        Self::new(fx * cw, fy * ch, fw * cw, fh * ch)
    }

    /// Returns the right edge coordinate
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Returns the bottom edge coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Returns the center point
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrinks the rectangle by `amount` on every side (negative grows it)
    ///
    /// Width and height never go below zero.
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.w - amount * 2.0).max(0.0),
            (self.h - amount * 2.0).max(0.0),
        )
    }

    /// Splits the rectangle into `count` equal columns separated by `gap`
    pub fn columns(&self, count: usize, gap: f32) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let total_gap = gap * (count.saturating_sub(1)) as f32;
        let col_w = ((self.w - total_gap) / count as f32).max(0.0);
        (0..count)
            .map(|i| Rect::new(self.x + i as f32 * (col_w + gap), self.y, col_w, self.h))
            .collect()
    }
}

/// Scale factors mapping the logical 1920x1080 canvas to an actual surface
pub fn scale_for(width: u32, height: u32) -> f32 {
    let sx = width as f32 / LOGICAL_WIDTH as f32;
    let sy = height as f32 / LOGICAL_HEIGHT as f32;
    sx.min(sy).max(0.1)
}
