use super::{TimelineLayout, ViewMode};

const MIN_PIXELS_PER_UNIT: f32 = 8.0;
const MAX_PIXELS_PER_UNIT: f32 = 240.0;
const ZOOM_STEP: f32 = 1.2;

/// Pixel mapping for a laid-out timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineViewport {
    pub view: ViewMode,
    /// Pixels per view unit (controls zoom level).
    pub pixels_per_unit: f32,
}

impl TimelineViewport {
    pub fn new(view: ViewMode, pixels_per_unit: f32) -> Self {
        Self {
            view,
            pixels_per_unit: pixels_per_unit.clamp(MIN_PIXELS_PER_UNIT, MAX_PIXELS_PER_UNIT),
        }
    }

    /// Convert a unit offset to an x-pixel offset from the axis start.
    pub fn units_to_x(&self, units: f64) -> f32 {
        units as f32 * self.pixels_per_unit
    }

    /// Convert a horizontal drag distance to whole calendar days.
    pub fn drag_days(&self, delta_x: f32) -> i64 {
        let units = f64::from(delta_x / self.pixels_per_unit);
        (units * self.view.days_per_unit()).round() as i64
    }

    /// Total width in pixels for the laid-out range.
    pub fn total_width(&self, layout: &TimelineLayout) -> f32 {
        self.units_to_x(layout.total_units)
    }

    pub fn zoom_in(&mut self) {
        self.pixels_per_unit = (self.pixels_per_unit * ZOOM_STEP).min(MAX_PIXELS_PER_UNIT);
    }

    pub fn zoom_out(&mut self) {
        self.pixels_per_unit = (self.pixels_per_unit / ZOOM_STEP).max(MIN_PIXELS_PER_UNIT);
    }
}

impl Default for TimelineViewport {
    fn default() -> Self {
        let view = ViewMode::default();
        Self::new(view, view.default_pixels_per_unit())
    }
}
