//! Flux rescaling and sanitization.
//!
//! Downsampling a ray set conserves aggregate flux by scaling every
//! surviving ray's flux by `original_count / target_count`. Scaled values
//! that are non-finite or ≤ 0 are replaced with a configurable floor rather
//! than rejected: downstream optical tools require every ray to carry a
//! finite positive flux, and dropping the ray would bias the sample.

/// Flux rescaling for a reduced ray set.
#[derive(Debug, Clone, Copy)]
pub struct FluxScale {
    factor: f64,
    floor: f64,
}

impl FluxScale {
    /// Build the scale for reducing `original_count` declared rays to
    /// `target_count` sampled rays.
    ///
    /// `original_count` is the count declared by the input header, not the
    /// number of valid ray lines; the two can differ in files that were
    /// hand-edited, and the declared count is what the flux totals refer to.
    pub fn new(original_count: usize, target_count: usize, floor: f64) -> Self {
        Self {
            factor: original_count as f64 / target_count as f64,
            floor,
        }
    }

    /// The multiplicative factor applied to each surviving ray's flux.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Scale and sanitize one flux value.
    pub fn apply(&self, flux: f64) -> f64 {
        self.sanitize(flux * self.factor)
    }

    /// Replace a non-finite or non-positive flux with the floor value.
    ///
    /// Applied independently at write time for every output format, so a
    /// value that survives scaling but degrades later is still caught.
    pub fn sanitize(&self, flux: f64) -> f64 {
        if !flux.is_finite() || flux <= 0.0 {
            self.floor
        } else {
            flux
        }
    }
}
