//! # Constants for the ray-file formats
//!
//! This module centralizes the **file-format constants** and default sampler
//! parameters used throughout the `rayset` library.
//!
//! ## Overview
//!
//! - Legal binary file identifiers and the fixed header size
//! - The description literal stamped into headers written by this crate
//! - Default angular grid dimensions and flux floor for the subsampler
//! - Progress reporting stride for streaming stages

// -------------------------------------------------------------------------------------------------
// Binary file layout
// -------------------------------------------------------------------------------------------------

/// Identifier of ray files produced by the vendor simulation tools.
pub const IDENTIFIER_CLASSIC: i32 = 1010;

/// Identifier written into every binary header produced by this crate.
pub const IDENTIFIER_SUBSAMPLED: i32 = 8675309;

/// Byte length of the fixed little-endian binary header.
///
/// `2×i32 + 100 bytes + 7×f32 + i32 + 3×f32 + 3×f32 + 3×f32 + 4×f32 + 4×i32`
pub const HEADER_SIZE: usize = 208;

/// Byte length of the free-text description field inside the header.
pub const DESCRIPTION_SIZE: usize = 100;

/// Description stamped into binary headers written by the subsampler.
pub const OUTPUT_DESCRIPTION: &str = "Subsampled LUXEON Z ray file";

// -------------------------------------------------------------------------------------------------
// Subsampler defaults
// -------------------------------------------------------------------------------------------------

/// Default number of polar-angle bins of the stratified sampling grid.
pub const DEFAULT_THETA_BINS: usize = 90;

/// Default number of azimuth bins of the stratified sampling grid.
pub const DEFAULT_PHI_BINS: usize = 180;

/// Default replacement value for scaled flux that is non-finite or ≤ 0.
///
/// Small enough to be negligible in aggregate, large enough to keep
/// downstream optical tools numerically stable.
pub const DEFAULT_FLUX_FLOOR: f64 = 1e-30;

/// Epsilon floor applied to direction-vector lengths before normalization.
pub const DIRECTION_EPSILON: f64 = 1e-12;

// -------------------------------------------------------------------------------------------------
// Observability
// -------------------------------------------------------------------------------------------------

/// Records between two progress ticks on streaming stages.
pub const PROGRESS_STRIDE: usize = 10_000;
