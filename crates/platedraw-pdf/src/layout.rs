//! Page layout solver.
//!
//! The drawable area is the A4 page minus the outer margins and the header
//! and footer bands. A part is placed by reserving its dimension lanes
//! first, scaling the raw extents uniformly into what remains, then
//! centering the resulting visual block (scaled part plus lanes) inside the
//! drawable area. That ordering is what keeps dimension text clear of the
//! margins, so it must not be reordered.

/// Points per millimeter.
pub const MM: f64 = 72.0 / 25.4;

/// A4 portrait page size in points.
pub const PAGE_WIDTH: f64 = 210.0 * MM;
pub const PAGE_HEIGHT: f64 = 297.0 * MM;

/// Outer margin on all four sides.
pub const MARGIN: f64 = 15.0 * MM;
/// Band reserved at the top of the page for the title and rule line.
pub const HEADER_BAND: f64 = 25.0 * MM;
/// Band reserved at the bottom of the page for the footer table.
pub const FOOTER_BAND: f64 = 25.0 * MM;

/// Lane between the outline and the chained hole dimensions.
pub const HOLE_DIM_LANE: f64 = 8.0 * MM;
/// Lane between the outline and the overall dimensions.
pub const TOTAL_DIM_LANE: f64 = 16.0 * MM;
/// Extension lines run this far past the dimension line.
pub const OVERSHOOT: f64 = 2.0 * MM;

/// Headroom factor applied after lane reservation.
pub const SHRINK: f64 = 0.95;

/// Width of the drawable area in points.
pub fn usable_width() -> f64 {
    PAGE_WIDTH - 2.0 * MARGIN
}

/// Height of the drawable area in points.
pub fn usable_height() -> f64 {
    PAGE_HEIGHT - HEADER_BAND - FOOTER_BAND
}

/// A solved placement for one part.
///
/// `scale` converts raw millimeters to page points. `block_x`/`block_y` is
/// the bottom-left corner of the centered visual block; the lanes are the
/// reservation the caller asked for, kept so per-shape code can offset its
/// drawing origin into the block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub block_x: f64,
    pub block_y: f64,
    pub lane_x: f64,
    pub lane_y: f64,
    pub scaled_w: f64,
    pub scaled_h: f64,
}

impl Placement {
    /// Drawing origin: block corner plus the full lane reservation.
    pub fn origin(&self) -> (f64, f64) {
        (self.block_x + self.lane_x, self.block_y + self.lane_y)
    }
}

/// Fit a part of raw extents `extent_x` x `extent_y` (mm) into the drawable
/// area while reserving `lane_x` and `lane_y` points for dimension text.
///
/// Callers guarantee strictly positive extents; the shape guards in the
/// page renderer reject invalid dimensions before layout runs.
pub fn solve(extent_x: f64, extent_y: f64, lane_x: f64, lane_y: f64) -> Placement {
    let usable_w = usable_width();
    let usable_h = usable_height();

    let scale = ((usable_w - lane_x) / extent_x).min((usable_h - lane_y) / extent_y) * SHRINK;
    let scaled_w = extent_x * scale;
    let scaled_h = extent_y * scale;

    let block_w = scaled_w + lane_x;
    let block_h = scaled_h + lane_y;
    let block_x = MARGIN + (usable_w - block_w) / 2.0;
    let block_y = FOOTER_BAND + (usable_h - block_h) / 2.0;

    Placement {
        scale,
        block_x,
        block_y,
        lane_x,
        lane_y,
        scaled_w,
        scaled_h,
    }
}
