//! Launcher grid selection
//!
//! The home screen is a 3x3 grid of realm tiles. This module only tracks
//! which tile is selected and maps grid coordinates to realm slots; it is
//! pure and testable without a display.

use crate::domain::realm::RealmId;

/// Launcher grid rows
pub const GRID_ROWS: usize = 3;
/// Launcher grid columns
pub const GRID_COLS: usize = 3;
/// Total number of realm slots
pub const SLOT_COUNT: usize = GRID_ROWS * GRID_COLS;

/// Grid coordinates representing (row, col) position
///
/// Zero-based, starting from the top-left tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCoords {
    pub row: usize,
    pub col: usize,
}

impl GridCoords {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Coordinates of a slot index (row-major)
    pub fn from_slot(slot: usize) -> Self {
        let slot = slot % SLOT_COUNT;
        Self::new(slot / GRID_COLS, slot % GRID_COLS)
    }

    pub fn to_slot(self) -> usize {
        self.row * GRID_COLS + self.col
    }
}

/// Navigation directions shared by the launcher and realm sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Selection cursor over the nine launcher slots
///
/// LEFT/RIGHT move along the current row and UP/DOWN along the current
/// column; both wrap within that row or column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LauncherCursor {
    slot: usize,
}

impl LauncherCursor {
    pub fn new(slot: usize) -> Self {
        Self {
            slot: slot % SLOT_COUNT,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn coords(&self) -> GridCoords {
        GridCoords::from_slot(self.slot)
    }

    pub fn realm(&self) -> RealmId {
        // slot is always < SLOT_COUNT == RealmId::ALL.len()
        RealmId::ALL[self.slot]
    }

    pub fn navigate(&mut self, direction: NavigationDirection) {
        let GridCoords { row, col } = self.coords();
        let target = match direction {
            NavigationDirection::Left => GridCoords::new(row, (col + GRID_COLS - 1) % GRID_COLS),
            NavigationDirection::Right => GridCoords::new(row, (col + 1) % GRID_COLS),
            NavigationDirection::Up => GridCoords::new((row + GRID_ROWS - 1) % GRID_ROWS, col),
            NavigationDirection::Down => GridCoords::new((row + 1) % GRID_ROWS, col),
        };
        self.slot = target.to_slot();
    }

    /// Moves directly to a 0-based slot; out-of-range slots are ignored
    pub fn select(&mut self, slot: usize) {
        if slot < SLOT_COUNT {
            self.slot = slot;
        }
    }
}
