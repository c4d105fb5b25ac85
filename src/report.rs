//! Validation pass reporting
//!
//! Plain-text rendering of a validation outcome for the CLI, plus the JSON
//! shape for downstream tooling. This is the reference consumer of
//! `ValidationReport`; a graphical rendering layer would sit in the same
//! seat.

use crate::grid::{OccupancyGrid, GRID_HEIGHT, GRID_SIZE};
use crate::refine::{FinalBuild, RefinementOutcome};
use crate::validate::ValidationReport;
use serde::Serialize;

/// Human-readable summary: acceptance counts, every reject with its step
/// index and reason, and the occupied layers of the grid snapshot.
pub fn format_report(report: &ValidationReport) -> String {
    let total = report.accepted.len() + report.rejected.len();
    let mut out = format!(
        "Accepted {} of {} placement(s)\n",
        report.accepted.len(),
        total
    );

    if !report.rejected.is_empty() {
        out.push_str("\nRejected:\n");
        for rejected in &report.rejected {
            out.push_str(&format!(
                "  Step {}: {} ({})\n",
                rejected.sequence_index(),
                rejected.placement,
                rejected.reason
            ));
        }
    }

    let layers = format_grid(&report.grid);
    if !layers.is_empty() {
        out.push('\n');
        out.push_str(&layers);
    }
    out
}

/// Top-down view of one layer: `y` rows top to bottom, `#` occupied.
pub fn layer_view(grid: &OccupancyGrid, z: i32) -> String {
    let mut out = String::with_capacity(GRID_SIZE * (GRID_SIZE + 1));
    for y in (0..GRID_SIZE as i32).rev() {
        for x in 0..GRID_SIZE as i32 {
            out.push(if grid.occupied(x, y, z) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Views of every layer that has at least one occupied cell, ground first.
pub fn format_grid(grid: &OccupancyGrid) -> String {
    let mut out = String::new();
    for z in 0..GRID_HEIGHT as i32 {
        let view = layer_view(grid, z);
        if view.contains('#') {
            out.push_str(&format!("Layer {}:\n{}", z, view));
        }
    }
    out
}

/// JSON shape of a terminal refinement outcome.
#[derive(Serialize)]
struct JsonOutcome<'a> {
    status: &'static str,
    build: &'a FinalBuild,
    /// Occupied `(x, y, z)` cells of the final grid snapshot.
    occupied_cells: Vec<(usize, usize, usize)>,
}

pub fn outcome_to_json(outcome: &RefinementOutcome) -> anyhow::Result<String> {
    let build = outcome.build();
    let json = JsonOutcome {
        status: if outcome.is_accepted() {
            "accepted"
        } else {
            "refinement_exhausted"
        },
        build,
        occupied_cells: build.report.grid.occupied_cells(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::{BrickPlacement, BrickSize, Orientation, Position};
    use crate::validate::validate_placements;

    fn placement(step: u32, pos: (i32, i32, i32)) -> BrickPlacement {
        BrickPlacement {
            sequence_index: step,
            size: BrickSize::new(1, 2),
            color: "red".to_string(),
            brick_type: "brick".to_string(),
            position: Position::new(pos.0, pos.1, pos.2),
            orientation: Orientation::AlongX,
        }
    }

    #[test]
    fn test_format_report_lists_rejects() {
        let report = validate_placements(&[placement(1, (0, 0, 0)), placement(2, (4, 4, 5))]);
        let text = format_report(&report);
        assert!(text.contains("Accepted 1 of 2"));
        assert!(text.contains("Step 2"));
        assert!(text.contains("floating"));
    }

    #[test]
    fn test_layer_view_shape() {
        let report = validate_placements(&[placement(1, (0, 0, 0))]);
        let view = layer_view(&report.grid, 0);
        assert_eq!(view.lines().count(), GRID_SIZE);
        assert!(view.lines().all(|l| l.len() == GRID_SIZE));
        // (0,0) and (1,0) occupied: bottom row starts with two '#'.
        assert!(view.lines().last().unwrap().starts_with("##."));
    }

    #[test]
    fn test_format_grid_skips_empty_layers() {
        let report = validate_placements(&[placement(1, (0, 0, 0))]);
        let text = format_grid(&report.grid);
        assert!(text.contains("Layer 0:"));
        assert!(!text.contains("Layer 1:"));
    }
}
