//! Footprint resolution
//!
//! Converts a declared brick size and orientation into the grid cells the
//! brick occupies at its layer. This is the only place rotation semantics
//! live; every clearance and support check goes through it.

use crate::brick::{BrickSize, Orientation, Position};

/// Extents along the X and Y axes once the orientation is applied.
///
/// `AlongX` lays the brick's long side along X, so a 2x4 spans 4 cells in X
/// and 2 in Y; `AlongY` is the unrotated frame. Rotating 90° swaps the two
/// extents and nothing else; the anchor stays at the declared minimum
/// corner.
pub fn oriented_extents(size: BrickSize, orientation: Orientation) -> (u32, u32) {
    match orientation {
        Orientation::AlongX => (size.length, size.width),
        Orientation::AlongY => (size.width, size.length),
    }
}

/// Absolute `(x, y)` cells covered at the placement's layer.
///
/// Cells may fall outside the grid; bounds are the grid's concern, not the
/// resolver's.
pub fn footprint_cells(
    position: Position,
    size: BrickSize,
    orientation: Orientation,
) -> Vec<(i32, i32)> {
    let (x_extent, y_extent) = oriented_extents(size, orientation);
    let mut cells = Vec::with_capacity((x_extent * y_extent) as usize);
    for dx in 0..x_extent as i32 {
        for dy in 0..y_extent as i32 {
            cells.push((position.x + dx, position.y + dy));
        }
    }
    cells
}
