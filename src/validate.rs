//! Placement validation
//!
//! One strictly sequential pass over an ordered placement list. Order is
//! semantically significant: each placement is checked against the grid as
//! it exists at that point in the sequence, and only accepted placements
//! mark cells. The validator never reorders or retries on its own.

use crate::brick::{BrickPlacement, RejectReason, RejectedBrick};
use crate::footprint::footprint_cells;
use crate::grid::{Clearance, OccupancyGrid};
use serde::Serialize;

/// Outcome of validating one plan: what the consumer (rendering layer,
/// refinement loop) receives per pass.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub accepted: Vec<BrickPlacement>,
    pub rejected: Vec<RejectedBrick>,
    /// Snapshot of the grid after the pass; covers accepted placements only.
    #[serde(skip)]
    pub grid: OccupancyGrid,
}

impl ValidationReport {
    pub fn all_accepted(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Validate an ordered placement list against a freshly initialized grid.
///
/// Clearance is checked first (bounds violations before collisions), then
/// support. A later placement can be supported by or collide with an
/// earlier *accepted* placement only; rejects leave the grid untouched.
pub fn validate_placements(placements: &[BrickPlacement]) -> ValidationReport {
    let mut grid = OccupancyGrid::new();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for placement in placements {
        let cells = footprint_cells(placement.position, placement.size, placement.orientation);
        let z = placement.position.z;

        let reason = match grid.clearance(&cells, z) {
            Clearance::OutOfBounds => Some(RejectReason::OutOfBounds),
            Clearance::Collision => Some(RejectReason::Collision),
            Clearance::Clear => {
                if grid.is_supported(&cells, z) {
                    None
                } else {
                    Some(RejectReason::Unsupported)
                }
            }
        };

        match reason {
            Some(reason) => rejected.push(RejectedBrick {
                placement: placement.clone(),
                reason,
            }),
            None => {
                grid.mark(&cells, z);
                accepted.push(placement.clone());
            }
        }
    }

    ValidationReport {
        accepted,
        rejected,
        grid,
    }
}
