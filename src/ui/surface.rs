//! Display surfaces
//!
//! A [`DisplaySurface`] receives one finished pixmap per frame. The Win32
//! window in `platform` is one implementation; [`HeadlessSurface`] keeps
//! frames in memory and can write periodic PNG snapshots.

use std::path::PathBuf;

use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Display unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to present frame: {0}")]
    PresentFailed(String),

    #[error("Fullscreen toggle failed: {0}")]
    FullscreenFailed(String),

    #[error("Failed to write snapshot {path}: {message}")]
    SnapshotFailed { path: PathBuf, message: String },
}

/// Target the frame loop presents into
pub trait DisplaySurface {
    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Shows a finished frame; the pixmap matches `size()`
    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError>;

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError>;

    fn is_fullscreen(&self) -> bool;
}

/// Off-screen surface for headless runs and tests
#[derive(Debug)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    fullscreen: bool,
    frames_presented: u64,
    snapshot_dir: Option<PathBuf>,
    snapshot_every: u64,
    snapshots_written: Vec<PathBuf>,
    snapshot_failures: u64,
    last_frame: Option<Pixmap>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            fullscreen: false,
            frames_presented: 0,
            snapshot_dir: None,
            snapshot_every: 0,
            snapshots_written: Vec::new(),
            snapshot_failures: 0,
            last_frame: None,
        }
    }

    /// Saves every `every`-th presented frame (1-based) as a PNG in `dir`
    pub fn with_snapshots(mut self, dir: PathBuf, every: u64) -> Self {
        self.snapshot_dir = Some(dir);
        self.snapshot_every = every.max(1);
        self
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn last_frame(&self) -> Option<&Pixmap> {
        self.last_frame.as_ref()
    }

    pub fn snapshots_written(&self) -> &[PathBuf] {
        &self.snapshots_written
    }

    /// Snapshots that could not be written; the frames still count as presented
    pub fn snapshot_failures(&self) -> u64 {
        self.snapshot_failures
    }

    fn write_snapshot(&mut self, frame: &Pixmap) -> Result<(), SurfaceError> {
        let Some(dir) = &self.snapshot_dir else {
            return Ok(());
        };
        if self.frames_presented % self.snapshot_every != 0 {
            return Ok(());
        }

        let path = dir.join(format!("frame_{:06}.png", self.frames_presented));
        std::fs::create_dir_all(dir).map_err(|err| SurfaceError::SnapshotFailed {
            path: path.clone(),
            message: err.to_string(),
        })?;
        frame.save_png(&path).map_err(|err| SurfaceError::SnapshotFailed {
            path: path.clone(),
            message: err.to_string(),
        })?;

        tracing::debug!(path = %path.display(), "snapshot written");
        self.snapshots_written.push(path);
        Ok(())
    }
}

impl DisplaySurface for HeadlessSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Pixmap) -> Result<(), SurfaceError> {
        if (frame.width(), frame.height()) != (self.width, self.height) {
            return Err(SurfaceError::PresentFailed(format!(
                "frame is {}x{}, surface is {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }

        self.frames_presented += 1;
        self.last_frame = Some(frame.clone());

        if let Err(err) = self.write_snapshot(frame) {
            self.snapshot_failures += 1;
            if self.snapshot_failures == 1 {
                tracing::warn!(error = %err, "snapshot skipped");
            } else {
                tracing::debug!(error = %err, failed = self.snapshot_failures, "snapshot skipped");
            }
        }
        Ok(())
    }

    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), SurfaceError> {
        self.fullscreen = fullscreen;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_presented_frames() {
        let mut surface = HeadlessSurface::new(8, 4);
        let frame = Pixmap::new(8, 4).unwrap();
        surface.present(&frame).unwrap();
        surface.present(&frame).unwrap();
        assert_eq!(surface.frames_presented(), 2);
        assert!(surface.last_frame().is_some());
    }

    #[test]
    fn rejects_mismatched_frames() {
        let mut surface = HeadlessSurface::new(8, 4);
        let frame = Pixmap::new(4, 4).unwrap();
        assert!(matches!(surface.present(&frame), Err(SurfaceError::PresentFailed(_))));
        assert_eq!(surface.frames_presented(), 0);
    }

    #[test]
    fn writes_every_nth_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut surface = HeadlessSurface::new(8, 4).with_snapshots(dir.path().join("shots"), 2);
        let frame = Pixmap::new(8, 4).unwrap();
        for _ in 0..5 {
            surface.present(&frame).unwrap();
        }

        let written = surface.snapshots_written();
        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("frame_000002.png"));
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn unwritable_snapshot_still_presents_frame() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let mut surface = HeadlessSurface::new(8, 4).with_snapshots(blocker.join("shots"), 1);
        let frame = Pixmap::new(8, 4).unwrap();
        surface.present(&frame).unwrap();
        surface.present(&frame).unwrap();

        assert_eq!(surface.frames_presented(), 2);
        assert!(surface.last_frame().is_some());
        assert!(surface.snapshots_written().is_empty());
        assert_eq!(surface.snapshot_failures(), 2);
    }

    #[test]
    fn fullscreen_flag_is_tracked() {
        let mut surface = HeadlessSurface::new(8, 4);
        assert!(!surface.is_fullscreen());
        surface.set_fullscreen(true).unwrap();
        assert!(surface.is_fullscreen());
    }
}
