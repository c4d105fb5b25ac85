//! Brickwright library crate
//!
//! Core pipeline for assembling and validating brick build instructions:
//! parse free-form generator text into ordered placements, validate each
//! placement against a bounded occupancy grid, and drive the correction
//! loop when placements are rejected. The binary is thin plumbing over
//! these modules.

pub mod brick;
pub mod config;
pub mod feedback;
pub mod footprint;
pub mod generator;
pub mod grid;
pub mod parse;
pub mod refine;
pub mod report;
pub mod validate;
