//! Brick placement data model
//!
//! The types that flow through the parse → validate → refine pipeline.
//! `color` and `brick_type` are carried for reporting only; validation
//! decisions depend solely on size, position, and orientation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Footprint of a brick in its unrotated reference frame: studs-wide × studs-long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickSize {
    pub width: u32,
    pub length: u32,
}

impl BrickSize {
    pub fn new(width: u32, length: u32) -> Self {
        Self { width, length }
    }
}

impl fmt::Display for BrickSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.length)
    }
}

/// Anchor cell of a placement. `z` is the layer index; layer 0 is ground.
///
/// Coordinates are signed so that out-of-range input from the generator can
/// be represented and rejected instead of wrapping or panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Which grid axis the brick's long side (`length`) runs along.
///
/// This is the canonical internal representation; both orientation
/// vocabularies the generator emits (`horizontal`/`vertical` and the
/// compass directions) normalize onto it via [`Orientation::from_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    AlongX,
    AlongY,
}

/// An orientation token outside the closed set.
///
/// Surfaces as a parse-time skip for the offending step line, never as a
/// pipeline failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOrientation(pub String);

impl fmt::Display for InvalidOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown orientation token: {:?}", self.0)
    }
}

impl std::error::Error for InvalidOrientation {}

impl Orientation {
    /// Normalize a generator-emitted orientation token.
    ///
    /// Accepts both the two-way vocabulary (`horizontal`/`vertical`) and the
    /// four-way compass one (`north`/`east`/`south`/`west`). With a
    /// minimum-corner anchor, 180° rotations cover identical cells, so the
    /// compass pairs collapse onto the axis pair.
    pub fn from_token(token: &str) -> Result<Self, InvalidOrientation> {
        match token.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "east" | "west" => Ok(Orientation::AlongX),
            "vertical" | "north" | "south" => Ok(Orientation::AlongY),
            _ => Err(InvalidOrientation(token.trim().to_string())),
        }
    }

    /// The 90° rotation of this orientation. Its own inverse.
    pub fn rotated(self) -> Self {
        match self {
            Orientation::AlongX => Orientation::AlongY,
            Orientation::AlongY => Orientation::AlongX,
        }
    }

    /// Token used when echoing a placement back to the generator.
    pub fn token(&self) -> &'static str {
        match self {
            Orientation::AlongX => "horizontal",
            Orientation::AlongY => "vertical",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One requested unit of construction, in instruction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickPlacement {
    /// 1-based step number from the source instructions, used for reporting.
    pub sequence_index: u32,
    pub size: BrickSize,
    pub color: String,
    pub brick_type: String,
    pub position: Position,
    pub orientation: Orientation,
}

impl fmt::Display for BrickPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} at {}, facing {}",
            self.size, self.color, self.brick_type, self.position, self.orientation
        )
    }
}

/// Why the validator refused a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Footprint (or layer) extends past the grid bounds.
    OutOfBounds,
    /// Footprint overlaps an already-accepted placement on the same layer.
    Collision,
    /// Above ground with no occupied stud directly beneath any covered cell.
    Unsupported,
}

impl RejectReason {
    /// Human-readable form, quoted verbatim in correction requests.
    pub fn describe(&self) -> &'static str {
        match self {
            RejectReason::OutOfBounds => "extends outside the 10x10 build area",
            RejectReason::Collision => "overlaps a brick already placed on that layer",
            RejectReason::Unsupported => "is floating with no support underneath",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A placement the validator refused, with the reason. Produced only by the
/// validator; consumed by the correction-request builder and the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedBrick {
    pub placement: BrickPlacement,
    pub reason: RejectReason,
}

impl RejectedBrick {
    pub fn sequence_index(&self) -> u32 {
        self.placement.sequence_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_two_way_tokens() {
        assert_eq!(Orientation::from_token("horizontal"), Ok(Orientation::AlongX));
        assert_eq!(Orientation::from_token("VERTICAL"), Ok(Orientation::AlongY));
        assert_eq!(Orientation::from_token("  Horizontal "), Ok(Orientation::AlongX));
    }

    #[test]
    fn test_orientation_compass_tokens_collapse() {
        assert_eq!(Orientation::from_token("east"), Ok(Orientation::AlongX));
        assert_eq!(Orientation::from_token("west"), Ok(Orientation::AlongX));
        assert_eq!(Orientation::from_token("north"), Ok(Orientation::AlongY));
        assert_eq!(Orientation::from_token("South"), Ok(Orientation::AlongY));
    }

    #[test]
    fn test_orientation_rejects_unknown_token() {
        let err = Orientation::from_token("diagonal").unwrap_err();
        assert_eq!(err, InvalidOrientation("diagonal".to_string()));
    }

    #[test]
    fn test_orientation_rotated_is_involution() {
        assert_eq!(Orientation::AlongX.rotated(), Orientation::AlongY);
        assert_eq!(Orientation::AlongX.rotated().rotated(), Orientation::AlongX);
    }

    #[test]
    fn test_reject_reasons_are_distinct() {
        let reasons = [
            RejectReason::OutOfBounds,
            RejectReason::Collision,
            RejectReason::Unsupported,
        ];
        for (i, a) in reasons.iter().enumerate() {
            for b in reasons.iter().skip(i + 1) {
                assert_ne!(a.describe(), b.describe());
            }
        }
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(BrickSize::new(2, 4).to_string(), "2x4");
        assert_eq!(Position::new(0, 3, 1).to_string(), "(0,3,1)");
    }
}
