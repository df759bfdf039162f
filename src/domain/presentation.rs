//! Global presentation state: operating mode and visual theme
//!
//! The mode controls how bright and how lively the wall is, the theme picks
//! the color palette. Both cycle through fixed orders and are read by every
//! renderer through a per-frame [`FrameStyle`] snapshot.

use std::str::FromStr;

use serde::Deserialize;

/// RGB color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiplies every channel by `factor`, saturating at 0 and 255
    pub fn scale(self, factor: f32) -> Rgb {
        let ch = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

/// Operating mode of the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    Study,
    Sleep,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::Study, Mode::Sleep];

    /// Next mode in the fixed cycle Normal -> Study -> Sleep -> Normal
    pub fn next(self) -> Mode {
        match self {
            Mode::Normal => Mode::Study,
            Mode::Study => Mode::Sleep,
            Mode::Sleep => Mode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Study => "STUDY",
            Mode::Sleep => "SLEEP",
        }
    }

    /// Indicator color shown next to the mode label
    pub fn indicator(self) -> Rgb {
        match self {
            Mode::Normal => Rgb::new(0, 255, 200),
            Mode::Study => Rgb::new(255, 200, 100),
            Mode::Sleep => Rgb::new(150, 150, 200),
        }
    }
}

/// Visual theme of the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Neon,
    Minimal,
    Night,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Neon, Theme::Minimal, Theme::Night];

    /// Next theme in the fixed cycle Neon -> Minimal -> Night -> Neon
    pub fn next(self) -> Theme {
        match self {
            Theme::Neon => Theme::Minimal,
            Theme::Minimal => Theme::Night,
            Theme::Night => Theme::Neon,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Neon => "NEON",
            Theme::Minimal => "MINIMAL",
            Theme::Night => "NIGHT",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mode '{s}' (expected normal, study or sleep)"))
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}' (expected neon, minimal or night)"))
    }
}

/// Rendering multipliers derived from a [`Mode`]
///
/// Never stored; always recomputed with [`get_mode_config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    pub brightness: f32,
    pub circle_alpha_multiplier: f32,
    pub circle_speed_multiplier: f32,
    pub animation_intensity: f32,
    pub text_brightness: f32,
}

/// Multiplier table keyed by mode
///
/// Every field is non-increasing from Normal to Study to Sleep.
pub fn get_mode_config(mode: Mode) -> ModeConfig {
    match mode {
        Mode::Normal => ModeConfig {
            brightness: 1.0,
            circle_alpha_multiplier: 1.0,
            circle_speed_multiplier: 1.0,
            animation_intensity: 1.0,
            text_brightness: 1.0,
        },
        Mode::Study => ModeConfig {
            brightness: 0.7,
            circle_alpha_multiplier: 0.5,
            circle_speed_multiplier: 0.6,
            animation_intensity: 0.6,
            text_brightness: 0.9,
        },
        Mode::Sleep => ModeConfig {
            brightness: 0.3,
            circle_alpha_multiplier: 0.2,
            circle_speed_multiplier: 0.3,
            animation_intensity: 0.25,
            text_brightness: 0.5,
        },
    }
}

/// Font sizes (logical pixels at 1920x1080) for the text roles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub huge: f32,
    pub title: f32,
    pub subtitle: f32,
    pub body: f32,
    pub label: f32,
    pub ticker: f32,
}

/// Color palette and font table for a [`Theme`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub panel: Rgb,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub warning: Rgb,
    pub danger: Rgb,
    pub text: Rgb,
    pub text_dim: Rgb,
    pub fonts: FontSizes,
}

const BASE_FONTS: FontSizes = FontSizes {
    huge: 120.0,
    title: 72.0,
    subtitle: 42.0,
    body: 36.0,
    label: 30.0,
    ticker: 28.0,
};

/// Palette lookup keyed by theme
pub fn get_theme_palette(theme: Theme) -> Palette {
    match theme {
        Theme::Neon => Palette {
            background: Rgb::new(10, 10, 20),
            panel: Rgb::new(15, 15, 30),
            primary: Rgb::new(0, 255, 255),
            secondary: Rgb::new(255, 0, 255),
            accent: Rgb::new(0, 255, 128),
            warning: Rgb::new(255, 255, 0),
            danger: Rgb::new(255, 50, 50),
            text: Rgb::new(220, 220, 255),
            text_dim: Rgb::new(150, 150, 200),
            fonts: BASE_FONTS,
        },
        Theme::Minimal => Palette {
            background: Rgb::new(18, 18, 18),
            panel: Rgb::new(32, 32, 32),
            primary: Rgb::new(230, 230, 230),
            secondary: Rgb::new(160, 160, 160),
            accent: Rgb::new(120, 200, 255),
            warning: Rgb::new(240, 190, 90),
            danger: Rgb::new(230, 90, 90),
            text: Rgb::new(235, 235, 235),
            text_dim: Rgb::new(140, 140, 140),
            fonts: FontSizes {
                huge: 110.0,
                title: 64.0,
                ..BASE_FONTS
            },
        },
        Theme::Night => Palette {
            background: Rgb::new(5, 5, 10),
            panel: Rgb::new(12, 10, 18),
            primary: Rgb::new(200, 80, 60),
            secondary: Rgb::new(140, 60, 90),
            accent: Rgb::new(180, 120, 60),
            warning: Rgb::new(200, 150, 50),
            danger: Rgb::new(200, 40, 40),
            text: Rgb::new(190, 150, 130),
            text_dim: Rgb::new(120, 90, 80),
            fonts: FontSizes {
                huge: 130.0,
                title: 76.0,
                subtitle: 46.0,
                ..BASE_FONTS
            },
        },
    }
}

/// Per-frame snapshot of the presentation state
///
/// Taken once before rendering so a mode or theme change never lands
/// halfway through a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStyle {
    pub mode: Mode,
    pub theme: Theme,
    pub config: ModeConfig,
    pub palette: Palette,
}

impl FrameStyle {
    /// Palette color dimmed by the mode brightness
    pub fn shade(&self, color: Rgb) -> Rgb {
        color.scale(self.config.brightness)
    }

    /// Text color dimmed by the mode text brightness
    pub fn text(&self, color: Rgb) -> Rgb {
        color.scale(self.config.text_brightness)
    }
}

/// Process-wide presentation state owned by the screen controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresentationState {
    mode: Mode,
    theme: Theme,
}

impl PresentationState {
    pub fn new(mode: Mode, theme: Theme) -> Self {
        Self { mode, theme }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Advances to the next mode and returns it
    pub fn cycle_mode(&mut self) -> Mode {
        self.mode = self.mode.next();
        self.mode
    }

    /// Advances to the next theme and returns it
    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.next();
        self.theme
    }

    pub fn snapshot(&self) -> FrameStyle {
        FrameStyle {
            mode: self.mode,
            theme: self.theme,
            config: get_mode_config(self.mode),
            palette: get_theme_palette(self.theme),
        }
    }
}
