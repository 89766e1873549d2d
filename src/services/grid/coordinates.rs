//! Pixel ↔ minute mapping inside one hour cell.
//!
//! All functions here are pure: the same inputs always give the same
//! output, so the mapping can be tested without a grid or a store.

use crate::models::time_range::snap;

/// Map a vertical pixel offset inside an hour cell to a snapped minute of
/// the hour.
///
/// The raw minute is `round(offset / height * 60)`, then snapped to `tick`
/// (halves go to the even multiple) and clamped to `[0, 60 - tick]` so a drop near the
/// bottom edge never spills into the next hour.
pub fn pixel_to_minute(pixel_offset: f32, cell_height: f32, tick: u32) -> u32 {
    let tick = tick.clamp(1, 60);
    if !pixel_offset.is_finite() || !cell_height.is_finite() || cell_height <= 0.0 {
        return 0;
    }
    let raw = (pixel_offset.max(0.0) / cell_height * 60.0).round() as i32;
    snap(raw, tick).clamp(0, (60 - tick) as i32) as u32
}

/// Inverse of [`pixel_to_minute`] for rendering: top offset of `minute`
/// inside a cell of `cell_height` pixels.
pub fn minute_to_pixel(minute: u32, cell_height: f32) -> f32 {
    minute as f32 / 60.0 * cell_height
}

/// Convert an accumulated pointer delta into whole minutes. With the
/// default 60px hour one pixel is one minute.
pub fn pixel_delta_to_minutes(delta_px: f32, hour_height: f32) -> i32 {
    if !delta_px.is_finite() || !hour_height.is_finite() || hour_height <= 0.0 {
        return 0;
    }
    (delta_px / hour_height * 60.0).round() as i32
}

/// Mapper bound to one grid's cell height and tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    pub cell_height: f32,
    pub tick: u32,
}

impl CoordinateMapper {
    pub fn new(cell_height: f32, tick: u32) -> Self {
        Self { cell_height, tick }
    }

    pub fn pixel_to_minute(&self, pixel_offset: f32) -> u32 {
        pixel_to_minute(pixel_offset, self.cell_height, self.tick)
    }

    pub fn minute_to_pixel(&self, minute: u32) -> f32 {
        minute_to_pixel(minute, self.cell_height)
    }

    pub fn delta_to_minutes(&self, delta_px: f32) -> i32 {
        pixel_delta_to_minutes(delta_px, self.cell_height)
    }
}
