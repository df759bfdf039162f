use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::presentation::{Mode, Theme};

/// Runtime settings for the wall
///
/// Loaded from an optional TOML file; every field has a default and every
/// numeric field is clamped into a sane range by [`WallConfig::sanitized`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WallConfig {
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    pub particle_count: usize,
    pub pulse_frequency_hz: f32,
    pub event_window_secs: f32,
    pub max_dt_secs: f32,
    pub seed: u64,
    pub font_path: Option<PathBuf>,
    pub initial_mode: Mode,
    pub initial_theme: Theme,
    pub fullscreen: bool,
}

impl WallConfig {
    pub const DEFAULT_WIDTH: u32 = 1920;
    pub const DEFAULT_HEIGHT: u32 = 1080;
    pub const MIN_DIMENSION: u32 = 320;
    pub const MAX_DIMENSION: u32 = 7680;

    pub const DEFAULT_FPS: u32 = 60;
    pub const MIN_FPS: u32 = 10;
    pub const MAX_FPS: u32 = 240;

    pub const DEFAULT_PARTICLES: usize = 150;
    pub const MAX_PARTICLES: usize = 150;

    pub const DEFAULT_PULSE_HZ: f32 = 0.8;
    pub const MIN_PULSE_HZ: f32 = 0.05;
    pub const MAX_PULSE_HZ: f32 = 5.0;

    pub const DEFAULT_EVENT_WINDOW: f32 = 3.0;
    pub const MIN_EVENT_WINDOW: f32 = 0.5;
    pub const MAX_EVENT_WINDOW: f32 = 30.0;

    pub const DEFAULT_MAX_DT: f32 = 0.1;
    pub const MIN_MAX_DT: f32 = 0.01;
    pub const MAX_MAX_DT: f32 = 0.5;

    pub const DEFAULT_SEED: u64 = 0x6d6f_7469;

    /// Reads and sanitizes a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WallConfig =
            toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })?;
        Ok(config.sanitized())
    }

    /// Clamps every numeric field into its allowed range
    ///
    /// NaN floats fall back to their defaults.
    pub fn sanitized(mut self) -> Self {
        self.width = self.width.clamp(Self::MIN_DIMENSION, Self::MAX_DIMENSION);
        self.height = self.height.clamp(Self::MIN_DIMENSION, Self::MAX_DIMENSION);
        self.target_fps = self.target_fps.clamp(Self::MIN_FPS, Self::MAX_FPS);
        self.particle_count = self.particle_count.min(Self::MAX_PARTICLES);
        self.pulse_frequency_hz = clamp_or(
            self.pulse_frequency_hz,
            Self::MIN_PULSE_HZ,
            Self::MAX_PULSE_HZ,
            Self::DEFAULT_PULSE_HZ,
        );
        self.event_window_secs = clamp_or(
            self.event_window_secs,
            Self::MIN_EVENT_WINDOW,
            Self::MAX_EVENT_WINDOW,
            Self::DEFAULT_EVENT_WINDOW,
        );
        self.max_dt_secs = clamp_or(
            self.max_dt_secs,
            Self::MIN_MAX_DT,
            Self::MAX_MAX_DT,
            Self::DEFAULT_MAX_DT,
        );
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }

    pub fn event_window(&self) -> Duration {
        Duration::from_secs_f32(self.event_window_secs)
    }
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            target_fps: Self::DEFAULT_FPS,
            particle_count: Self::DEFAULT_PARTICLES,
            pulse_frequency_hz: Self::DEFAULT_PULSE_HZ,
            event_window_secs: Self::DEFAULT_EVENT_WINDOW,
            max_dt_secs: Self::DEFAULT_MAX_DT,
            seed: Self::DEFAULT_SEED,
            font_path: None,
            initial_mode: Mode::Normal,
            initial_theme: Theme::Neon,
            fullscreen: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config{}: {source}", describe_path(.path.as_deref()))]
    Parse {
        path: Option<PathBuf>,
        source: toml::de::Error,
    },
}

fn describe_path(path: Option<&Path>) -> String {
    path.map(|p| format!(" in {}", p.display())).unwrap_or_default()
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        return fallback;
    }
    value.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = WallConfig::from_toml_str("").unwrap();
        assert_eq!(config, WallConfig::default());
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(config.event_window(), Duration::from_secs(3));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = WallConfig::from_toml_str(
            r#"
            target_fps = 1000
            particle_count = 900
            pulse_frequency_hz = 0.0
            event_window_secs = 120.0
            max_dt_secs = 2.0
            width = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.target_fps, WallConfig::MAX_FPS);
        assert_eq!(config.particle_count, 150);
        assert_eq!(config.pulse_frequency_hz, WallConfig::MIN_PULSE_HZ);
        assert_eq!(config.event_window_secs, WallConfig::MAX_EVENT_WINDOW);
        assert_eq!(config.max_dt_secs, WallConfig::MAX_MAX_DT);
        assert_eq!(config.width, WallConfig::MIN_DIMENSION);
    }

    #[test]
    fn parses_mode_and_theme_names() {
        let config = WallConfig::from_toml_str(
            r#"
            initial_mode = "sleep"
            initial_theme = "night"
            fullscreen = false
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_mode, Mode::Sleep);
        assert_eq!(config.initial_theme, Theme::Night);
        assert!(!config.fullscreen);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = WallConfig::from_toml_str("brightness = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target_fps = 30\nfont_path = \"/tmp/wall.ttf\"").unwrap();

        let config = WallConfig::load(file.path()).unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.font_path, Some(PathBuf::from("/tmp/wall.ttf")));
    }

    #[test]
    fn invalid_file_reports_its_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target_fps = \"fast\"").unwrap();

        match WallConfig::load(file.path()) {
            Err(ConfigError::Parse { path: Some(path), .. }) => assert_eq!(path, file.path()),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = WallConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
