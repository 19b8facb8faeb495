//! Angular binning and quota allocation for stratified subsampling.
//!
//! Rays are grouped by direction into a fixed (θ, φ) grid: θ is the polar
//! angle `acos(n)` of the normalized direction, mapped linearly from
//! `[0, π]` onto the polar bins; φ is `atan2(m, l)`, shifted from `[-π, π]`
//! onto `[0, 2π]` and mapped onto the azimuth bins. Each populated bin
//! accumulates the sum of the non-negative flux of its rays.
//!
//! Sample quotas are allocated per bin proportionally to accumulated flux
//! (falling back to population counts when the total flux is zero), clamped
//! to `1..=population`, then reconciled to sum exactly to the target.
//!
//! Bins hold `u32` indices into the caller's contiguous ray arena; no ray
//! data is copied per bin. Accumulation uses an `ahash` map keyed by bin
//! index, and the populated bins are handed out key-sorted so that a seeded
//! RNG downstream yields reproducible output.

use std::collections::HashMap;
use std::f64::consts::PI;

use ahash::RandomState;
use itertools::Itertools;

use crate::constants::{
    DEFAULT_FLUX_FLOOR, DEFAULT_PHI_BINS, DEFAULT_THETA_BINS, DIRECTION_EPSILON,
};
use crate::ray_file::AsciiRay;

/// Tunable parameters of the subsampler.
///
/// The defaults match the production grid (90 × 180 over (θ, φ)) and the
/// `1e-30` flux floor; tests exercise the allocator with much smaller
/// synthetic grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerConfig {
    /// Number of polar-angle bins over `[0, π]`.
    pub theta_bins: usize,
    /// Number of azimuth bins over `[0, 2π]`.
    pub phi_bins: usize,
    /// Replacement value for scaled flux that is non-finite or ≤ 0.
    pub flux_floor: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            theta_bins: DEFAULT_THETA_BINS,
            phi_bins: DEFAULT_PHI_BINS,
            flux_floor: DEFAULT_FLUX_FLOOR,
        }
    }
}

impl SamplerConfig {
    pub fn with_grid(mut self, theta_bins: usize, phi_bins: usize) -> Self {
        self.theta_bins = theta_bins;
        self.phi_bins = phi_bins;
        self
    }

    pub fn with_flux_floor(mut self, floor: f64) -> Self {
        self.flux_floor = floor;
        self
    }
}

/// One populated cell of the (θ, φ) grid.
#[derive(Debug, Clone)]
pub(crate) struct Bin {
    /// `(theta_index, phi_index)` of this cell.
    pub key: (usize, usize),
    /// Indices into the ray arena, in file order.
    pub rays: Vec<u32>,
    /// Sum of the non-negative flux of the member rays.
    pub flux: f64,
}

/// The populated bins of a ray arena, key-sorted.
#[derive(Debug)]
pub(crate) struct BinGrid {
    bins: Vec<Bin>,
}

/// Map a direction vector to its `(theta_index, phi_index)` cell.
///
/// The vector is normalized locally (length floored at
/// [`DIRECTION_EPSILON`] to guard the degenerate zero vector) and `n` is
/// clamped to `[-1, 1]` before `acos`; the caller's stored direction is
/// never mutated.
fn bin_index(direction: [f64; 3], config: &SamplerConfig) -> (usize, usize) {
    let [l, m, n] = direction;
    let length = (l * l + m * m + n * n).sqrt().max(DIRECTION_EPSILON);
    let (l, m, n) = (l / length, m / length, n / length);
    let n = n.clamp(-1.0, 1.0);

    let theta = n.acos();
    let theta_index =
        (((theta / PI) * config.theta_bins as f64) as usize).min(config.theta_bins - 1);

    let phi = m.atan2(l);
    let phi_norm = (phi + PI) / (2.0 * PI);
    let phi_index = ((phi_norm * config.phi_bins as f64) as usize).min(config.phi_bins - 1);

    (theta_index, phi_index)
}

impl BinGrid {
    /// Assign every arena ray to its cell and accumulate per-bin flux.
    pub fn build(rays: &[AsciiRay], config: &SamplerConfig) -> Self {
        let mut cells: HashMap<(usize, usize), Bin, RandomState> = HashMap::default();
        for (index, ray) in rays.iter().enumerate() {
            let key = bin_index(ray.direction, config);
            let bin = cells.entry(key).or_insert_with(|| Bin {
                key,
                rays: Vec::new(),
                flux: 0.0,
            });
            bin.rays.push(index as u32);
            bin.flux += ray.flux.max(0.0);
        }
        let bins = cells
            .into_values()
            .sorted_by_key(|bin| bin.key)
            .collect();
        Self { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Allocate per-bin sample quotas summing to exactly `target` whenever
    /// the total population allows it.
    ///
    /// Quotas start proportional to accumulated flux (or to population when
    /// the total flux is zero), are clamped to `1..=population`, then
    /// reconciled: while the sum exceeds the target the currently-largest
    /// quota is decremented (kept ≥ 1); while it falls short the bin with
    /// the most spare capacity (`population − quota`) is incremented. Ties
    /// resolve to the lowest bin key. If every quota is already 1 and there
    /// are more populated bins than `target`, the excess remains and the
    /// sampler truncates after collection.
    ///
    /// Return
    /// ----------
    /// * Quotas aligned with [`Self::bins`] order.
    pub fn allocate(&self, target: usize) -> Vec<usize> {
        let total_flux: f64 = self.bins.iter().map(|bin| bin.flux).sum();
        let mut quotas: Vec<usize> = if total_flux > 0.0 {
            self.bins
                .iter()
                .map(|bin| (target as f64 * (bin.flux / total_flux)).round() as usize)
                .collect()
        } else {
            let total_count: usize = self.bins.iter().map(|bin| bin.rays.len()).sum();
            self.bins
                .iter()
                .map(|bin| {
                    (target as f64 * (bin.rays.len() as f64 / total_count.max(1) as f64)).round()
                        as usize
                })
                .collect()
        };

        for (quota, bin) in quotas.iter_mut().zip(&self.bins) {
            *quota = (*quota).max(1).min(bin.rays.len());
        }

        let mut total: usize = quotas.iter().sum();
        while total > target {
            // Currently-largest quota still above 1; first occurrence wins ties.
            let mut largest: Option<usize> = None;
            for (i, &quota) in quotas.iter().enumerate() {
                if quota > 1 && largest.is_none_or(|j| quota > quotas[j]) {
                    largest = Some(i);
                }
            }
            let Some(largest) = largest else { break };
            quotas[largest] -= 1;
            total -= 1;
        }
        while total < target {
            // Most spare capacity; first occurrence wins ties.
            let mut best: Option<usize> = None;
            let mut best_spare = 0;
            for (i, &quota) in quotas.iter().enumerate() {
                let spare = self.bins[i].rays.len() - quota;
                if spare > best_spare {
                    best_spare = spare;
                    best = Some(i);
                }
            }
            let Some(best) = best else { break };
            quotas[best] += 1;
            total += 1;
        }
        quotas
    }
}
