//! Grid and zoom state

use crate::{EditError, Result};
use serde::{Deserialize, Serialize};

/// Smallest zoom level in percent
pub const MIN_ZOOM: u32 = 10;

/// Largest zoom level in percent
pub const MAX_ZOOM: u32 = 200;

/// Zoom in/out increment in percent
pub const ZOOM_STEP: u32 = 10;

/// Editor grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub enabled: bool,
    /// Grid cell size in card pixels
    pub size: f64,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 20.0,
            snap: true,
        }
    }
}

impl GridSettings {
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn toggle_snap(&mut self) {
        self.snap = !self.snap;
    }

    /// Change the cell size; it must be positive
    pub fn set_size(&mut self, size: f64) -> Result<()> {
        if !(size.is_finite() && size > 0.0) {
            return Err(EditError::InvalidGridSize(size));
        }
        self.size = size;
        Ok(())
    }

    /// Whether snapping currently applies
    pub fn snaps(&self) -> bool {
        self.enabled && self.snap
    }

    /// Round a value to the nearest grid line when snapping applies
    pub fn snap_to_grid(&self, value: f64) -> f64 {
        if !self.snaps() {
            return value;
        }
        (value / self.size).round() * self.size
    }
}

/// Editor zoom level in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zoom(u32);

impl Default for Zoom {
    fn default() -> Self {
        Self(100)
    }
}

impl Zoom {
    /// Create a zoom level, clamped to the supported range
    pub fn new(percent: u32) -> Self {
        Self(percent.clamp(MIN_ZOOM, MAX_ZOOM))
    }

    pub fn percent(&self) -> u32 {
        self.0
    }

    /// Multiplier from card pixels to screen pixels
    pub fn factor(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn set(&mut self, percent: u32) {
        *self = Self::new(percent);
    }

    pub fn zoom_in(&mut self) {
        self.set(self.0.saturating_add(ZOOM_STEP));
    }

    pub fn zoom_out(&mut self) {
        self.set(self.0.saturating_sub(ZOOM_STEP));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_defaults() {
        let grid = GridSettings::default();
        assert!(grid.enabled && grid.snap);
        assert_eq!(grid.size, 20.0);
    }

    #[test]
    fn test_snap_rounds_to_nearest_line() {
        let mut grid = GridSettings::default();
        grid.set_size(10.0).unwrap();
        assert_eq!(grid.snap_to_grid(95.0), 100.0);
        assert_eq!(grid.snap_to_grid(94.0), 90.0);
    }

    #[test]
    fn test_snap_disabled() {
        let mut grid = GridSettings::default();
        grid.toggle_snap();
        assert_eq!(grid.snap_to_grid(95.0), 95.0);

        let mut grid = GridSettings::default();
        grid.toggle();
        assert_eq!(grid.snap_to_grid(33.0), 33.0);
    }

    #[test]
    fn test_invalid_grid_size() {
        let mut grid = GridSettings::default();
        assert!(grid.set_size(0.0).is_err());
        assert!(grid.set_size(f64::NAN).is_err());
        assert_eq!(grid.size, 20.0);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut zoom = Zoom::default();
        assert_eq!(zoom.percent(), 100);
        for _ in 0..20 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.percent(), MAX_ZOOM);
        for _ in 0..30 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.percent(), MIN_ZOOM);
        zoom.set(5);
        assert_eq!(zoom.percent(), 10);
        assert_eq!(Zoom::new(150).factor(), 1.5);
    }

    proptest! {
        #[test]
        fn prop_snap_is_idempotent(value in -10_000.0..10_000.0f64, size in 1u32..100) {
            let mut grid = GridSettings::default();
            grid.set_size(size as f64).unwrap();
            let once = grid.snap_to_grid(value);
            prop_assert_eq!(grid.snap_to_grid(once), once);
        }

        #[test]
        fn prop_zoom_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..50)) {
            let mut zoom = Zoom::default();
            for step in steps {
                if step { zoom.zoom_in() } else { zoom.zoom_out() }
            }
            prop_assert!((MIN_ZOOM..=MAX_ZOOM).contains(&zoom.percent()));
        }
    }
}
