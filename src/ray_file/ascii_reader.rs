//! # ASCII ray-file reader
//!
//! Utilities to load the whitespace-separated ASCII ray layout and turn it
//! into the contiguous ray arena consumed by the subsampler.
//!
//! ## Overview
//! -----------------
//! This module provides:
//! - [`AsciiHeader`] – The four numeric fields of the ASCII header line.
//! - [`AsciiRay`] – One parsed 7-field ray line (`f64` throughout, matching
//!   the precision the flux arithmetic is carried in).
//! - [`AsciiRaySet`] – The header plus the arena of all valid ray lines.
//!
//! ## Header-line detection
//! -----------------
//! The header is **not** at a fixed line index: files in the wild carry
//! leading blank or annotation lines. The reader performs a linear scan for
//! the first line satisfying an explicit predicate (exactly 4 whitespace
//! tokens, the first of which is a non-negative integer literal) and fails
//! with the typed [`RaySetError::NoHeaderFound`] when no line matches.
//!
//! ## Ray-line filtering
//! -----------------
//! Every line after the header with exactly 7 whitespace tokens is a ray
//! line; lines with any other token count (blank lines, comments, 8-field
//! spectral records) are skipped. A 7-token line whose fields do not parse
//! as numbers is a structural error ([`RaySetError::InvalidNumericField`]),
//! not a skip: silently dropping it would bias the sampled set.
//!
//! ## See also
//! ------------
//! * [`crate::subsample::subsample`] – The consumer of [`AsciiRaySet`].
//! * [`crate::convert::convert_to_ascii`] – The producer of this layout.

use camino::Utf8Path;

use crate::constants::PROGRESS_STRIDE;
use crate::progress::ProgressObserver;
use crate::rayset_errors::RaySetError;

/// Numeric fields of the ASCII header line:
/// `"<ray_count> <dimension_units> <ray_format_type> <flux_type>"`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AsciiHeader {
    /// Ray count declared by the producer of the file.
    pub ray_count: usize,
    /// Integer code of the spatial unit system.
    pub dimension_units: i32,
    /// Record layout selector carried over from the binary format.
    pub ray_format_type: i32,
    /// Flux encoding carried over from the binary format.
    pub flux_type: i32,
}

impl AsciiHeader {
    /// Parse an already-matched header line into its four numeric fields.
    fn parse_line(line: &str) -> Result<Self, RaySetError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        debug_assert_eq!(tokens.len(), 4);
        let numeric = |token: &str| -> Result<i32, RaySetError> {
            token
                .parse()
                .map_err(|_| RaySetError::InvalidNumericField(token.to_string()))
        };
        Ok(AsciiHeader {
            ray_count: tokens[0]
                .parse()
                .map_err(|_| RaySetError::InvalidNumericField(tokens[0].to_string()))?,
            dimension_units: numeric(tokens[1])?,
            ray_format_type: numeric(tokens[2])?,
            flux_type: numeric(tokens[3])?,
        })
    }

    /// Render the header line for a subsampled output of `ray_count` rays.
    pub fn to_line_with_count(&self, ray_count: usize) -> String {
        format!(
            "{ray_count} {} {} {}",
            self.dimension_units, self.ray_format_type, self.flux_type
        )
    }
}

/// One parsed ASCII ray line.
///
/// Values are `f64`: flux scaling and aggregation run in double precision
/// and only narrow to `f32` at the binary output boundary.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct AsciiRay {
    /// Ray origin `(x, y, z)`.
    pub position: [f64; 3],
    /// Direction cosines `(l, m, n)`, as found in the file.
    pub direction: [f64; 3],
    /// Radiant flux attributed to the ray.
    pub flux: f64,
}

/// Header-line predicate: exactly 4 tokens, first token a non-negative
/// integer literal.
fn is_header_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let first_is_count = tokens
        .next()
        .is_some_and(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()));
    first_is_count && tokens.count() == 3
}

/// Parse one candidate ray line.
///
/// Return
/// ----------
/// * `Ok(None)` when the line does not have exactly 7 tokens (not a ray
///   line), `Ok(Some(ray))` on success, or
///   [`RaySetError::InvalidNumericField`] for a 7-token line with a
///   non-numeric field.
fn parse_ray_line(line: &str) -> Result<Option<AsciiRay>, RaySetError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 7 {
        return Ok(None);
    }
    let mut values = [0.0f64; 7];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse()
            .map_err(|_| RaySetError::InvalidNumericField(token.to_string()))?;
    }
    Ok(Some(AsciiRay {
        position: [values[0], values[1], values[2]],
        direction: [values[3], values[4], values[5]],
        flux: values[6],
    }))
}

/// An ASCII ray file materialized in memory: the header fields plus the
/// contiguous arena of all valid ray lines, in file order.
#[derive(Debug, Clone)]
pub struct AsciiRaySet {
    /// Parsed header-line fields.
    pub header: AsciiHeader,
    /// All valid rays, in the order they appear in the file.
    pub rays: Vec<AsciiRay>,
}

impl AsciiRaySet {
    /// Load an ASCII ray file from disk.
    ///
    /// Emits scan progress in `0..50` every
    /// [`PROGRESS_STRIDE`] lines.
    ///
    /// Arguments
    /// -----------------
    /// * `path`: The ASCII ray file to read.
    /// * `observer`: Receiver for scan progress ticks.
    ///
    /// Return
    /// ----------
    /// * The materialized set, or [`RaySetError::NoHeaderFound`] /
    ///   [`RaySetError::InvalidNumericField`] / [`RaySetError::IoError`].
    pub fn load(
        path: &Utf8Path,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Self, RaySetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_text(&content, observer)
    }

    /// Parse an ASCII ray file already read into memory.
    pub fn from_text(
        content: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Self, RaySetError> {
        let lines: Vec<&str> = content.lines().collect();
        let header_index = lines
            .iter()
            .position(|line| is_header_line(line))
            .ok_or(RaySetError::NoHeaderFound)?;
        let header = AsciiHeader::parse_line(lines[header_index])?;

        let body = &lines[header_index + 1..];
        let total = body.len().max(1);
        let mut rays = Vec::new();
        for (i, line) in body.iter().enumerate() {
            if i % PROGRESS_STRIDE == 0 {
                observer.progress((i * 50 / total) as u32);
            }
            if let Some(ray) = parse_ray_line(line)? {
                rays.push(ray);
            }
        }
        Ok(AsciiRaySet { header, rays })
    }

    /// Scan a file and report its header fields and usable ray count,
    /// without keeping the rays.
    ///
    /// This is the cheap pre-flight used by callers to display
    /// "Ray count: N" before committing to an operation.
    pub fn scan(path: &Utf8Path) -> Result<(AsciiHeader, usize), RaySetError> {
        let set = Self::load(path, &mut crate::progress::SilentProgress)?;
        Ok((set.header, set.rays.len()))
    }

    /// Fail with [`RaySetError::InsufficientRays`] unless the arena holds at
    /// least `requested` rays.
    pub fn require_at_least(&self, requested: usize) -> Result<(), RaySetError> {
        if self.rays.len() < requested {
            return Err(RaySetError::InsufficientRays {
                available: self.rays.len(),
                requested,
            });
        }
        Ok(())
    }
}
