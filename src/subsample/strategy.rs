//! Ray-selection strategies.
//!
//! Both strategies pick indices into the caller's ray arena, without
//! replacement, and guarantee exactly `target` selections whenever the pool
//! is large enough (the caller checks that precondition up front).
//!
//! * [`SampleMethod::Random`] – uniform over the whole pool.
//! * [`SampleMethod::AngularStratified`] – quotas per (θ, φ) direction bin,
//!   proportional to accumulated flux, so aggressive downsampling preserves
//!   the angular/flux structure of the source. See
//!   [`crate::subsample::binning`] for the grid and allocation rules.

use std::collections::HashSet;

use ahash::RandomState;
use rand::seq::index;
use rand::Rng;

use crate::ray_file::AsciiRay;

use super::binning::{BinGrid, SamplerConfig};

/// Strategy used to reduce a ray set to the target count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMethod {
    /// Uniform sampling without replacement over the whole pool.
    Random,
    /// Flux-weighted stratified sampling over direction bins.
    AngularStratified,
}

/// Select `target` arena indices according to `method`.
///
/// Arguments
/// -----------------
/// * `rays`: The contiguous ray arena.
/// * `target`: Number of rays to select; must not exceed `rays.len()`.
/// * `method`: Selection strategy.
/// * `config`: Grid dimensions for the stratified strategy.
/// * `rng`: Source of randomness; pass a seeded [`rand::rngs::StdRng`] for
///   reproducible selections.
///
/// Return
/// ----------
/// * Exactly `target` distinct indices into `rays` (for a non-empty pool of
///   at least `target` rays).
pub(crate) fn select_rays(
    rays: &[AsciiRay],
    target: usize,
    method: SampleMethod,
    config: &SamplerConfig,
    rng: &mut impl Rng,
) -> Vec<u32> {
    match method {
        SampleMethod::Random => sample_uniform(rays.len(), target, rng),
        SampleMethod::AngularStratified => sample_stratified(rays, target, config, rng),
    }
}

/// Uniform sampling without replacement of `target` indices from a pool of
/// `pool_len`, capped at the pool size.
fn sample_uniform(pool_len: usize, target: usize, rng: &mut impl Rng) -> Vec<u32> {
    index::sample(rng, pool_len, target.min(pool_len))
        .iter()
        .map(|i| i as u32)
        .collect()
}

/// Flux-weighted stratified sampling.
///
/// Bins the arena by direction, allocates per-bin quotas, samples each bin
/// uniformly without replacement, then corrects residual rounding: a surplus
/// is truncated, a shortfall is padded uniformly from the still-unselected
/// remainder of the pool.
fn sample_stratified(
    rays: &[AsciiRay],
    target: usize,
    config: &SamplerConfig,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let grid = BinGrid::build(rays, config);
    if grid.is_empty() {
        return sample_uniform(rays.len(), target, rng);
    }

    let quotas = grid.allocate(target);
    let mut selected: Vec<u32> = Vec::with_capacity(target);
    for (bin, quota) in grid.bins().iter().zip(quotas) {
        if quota == 0 {
            continue;
        }
        if quota >= bin.rays.len() {
            selected.extend_from_slice(&bin.rays);
        } else {
            selected.extend(index::sample(rng, bin.rays.len(), quota).iter().map(|i| bin.rays[i]));
        }
    }

    if selected.len() > target {
        selected.truncate(target);
    } else if selected.len() < target {
        let chosen: HashSet<u32, RandomState> = selected.iter().copied().collect();
        let remaining: Vec<u32> = (0..rays.len() as u32)
            .filter(|index| !chosen.contains(index))
            .collect();
        let need = (target - selected.len()).min(remaining.len());
        if need > 0 {
            selected.extend(index::sample(rng, remaining.len(), need).iter().map(|i| remaining[i]));
        }
    }
    selected
}

#[cfg(test)]
mod strategy_test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn ray(direction: [f64; 3], flux: f64) -> AsciiRay {
        AsciiRay {
            position: [0.0; 3],
            direction,
            flux,
        }
    }

    fn pool(len: usize) -> Vec<AsciiRay> {
        (0..len)
            .map(|i| {
                let phi = i as f64 * 0.1;
                ray([phi.cos(), phi.sin(), ((i % 21) as f64 - 10.0) / 10.0], 1.0)
            })
            .collect()
    }

    #[test]
    fn random_selects_exactly_target_distinct_indices() {
        let rays = pool(250);
        let mut rng = StdRng::seed_from_u64(7);
        let selected = select_rays(&rays, 40, SampleMethod::Random, &SamplerConfig::default(), &mut rng);
        assert_eq!(selected.len(), 40);
        let distinct: HashSet<u32, RandomState> = selected.iter().copied().collect();
        assert_eq!(distinct.len(), 40);
        assert!(selected.iter().all(|&i| (i as usize) < rays.len()));
    }

    #[test]
    fn random_takes_the_whole_pool_at_full_target() {
        let rays = pool(12);
        let mut rng = StdRng::seed_from_u64(7);
        let mut selected =
            select_rays(&rays, 12, SampleMethod::Random, &SamplerConfig::default(), &mut rng);
        selected.sort_unstable();
        assert_eq!(selected, (0..12).collect::<Vec<u32>>());
    }

    #[test]
    fn stratified_selects_exactly_target_distinct_indices() {
        let rays = pool(500);
        let config = SamplerConfig::default().with_grid(6, 6);
        for target in [1, 13, 250, 499, 500] {
            let mut rng = StdRng::seed_from_u64(42);
            let selected =
                select_rays(&rays, target, SampleMethod::AngularStratified, &config, &mut rng);
            assert_eq!(selected.len(), target, "target {target}");
            let distinct: HashSet<u32, RandomState> = selected.iter().copied().collect();
            assert_eq!(distinct.len(), target, "target {target}");
        }
    }

    #[test]
    fn stratified_is_reproducible_with_a_seeded_rng() {
        let rays = pool(300);
        let config = SamplerConfig::default().with_grid(4, 8);
        let mut first = StdRng::seed_from_u64(99);
        let mut second = StdRng::seed_from_u64(99);
        assert_eq!(
            select_rays(&rays, 50, SampleMethod::AngularStratified, &config, &mut first),
            select_rays(&rays, 50, SampleMethod::AngularStratified, &config, &mut second),
        );
    }

    #[test]
    fn stratified_favors_high_flux_bins() {
        // 100 rays up with flux 99, 100 rays down with flux 1 in total.
        let mut rays: Vec<AsciiRay> = (0..100).map(|_| ray([0.0, 0.0, 1.0], 0.99)).collect();
        rays.extend((0..100).map(|_| ray([0.0, 0.0, -1.0], 0.01)));
        let config = SamplerConfig::default().with_grid(2, 2);
        let mut rng = StdRng::seed_from_u64(5);
        let selected =
            select_rays(&rays, 20, SampleMethod::AngularStratified, &config, &mut rng);
        let upward = selected.iter().filter(|&&i| i < 100).count();
        assert_eq!(selected.len(), 20);
        // Flux-proportional allocation: ~99% of the quota goes upward, and
        // the downward bin keeps its guaranteed single ray.
        assert_eq!(upward, 19);
    }

    #[test]
    fn capped_quotas_still_reach_target_exactly() {
        // Nearly all flux sits in a bin of 2 rays; its quota is capped at
        // the population and the shortfall spills into the other bin.
        let mut rays: Vec<AsciiRay> = (0..2).map(|_| ray([0.0, 0.0, 1.0], 1000.0)).collect();
        rays.extend((0..30).map(|_| ray([0.0, 0.0, -1.0], 1e-6)));
        let config = SamplerConfig::default().with_grid(2, 2);
        let mut rng = StdRng::seed_from_u64(11);
        let selected =
            select_rays(&rays, 20, SampleMethod::AngularStratified, &config, &mut rng);
        assert_eq!(selected.len(), 20);
        let distinct: HashSet<u32, RandomState> = selected.iter().copied().collect();
        assert_eq!(distinct.len(), 20);
    }

    #[test]
    fn more_populated_bins_than_target_truncates_to_target() {
        // Every quota is pinned at 1, so collection overshoots and the
        // surplus is cut.
        let rays = vec![
            ray([0.0, 0.0, 1.0], 1.0),
            ray([0.0, 0.0, -1.0], 1.0),
            ray([1.0, 0.0, 0.0], 1.0),
        ];
        let config = SamplerConfig::default().with_grid(4, 2);
        let mut rng = StdRng::seed_from_u64(3);
        let selected =
            select_rays(&rays, 2, SampleMethod::AngularStratified, &config, &mut rng);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn empty_pool_yields_empty_selection() {
        let mut rng = StdRng::seed_from_u64(1);
        let selected = select_rays(
            &[],
            0,
            SampleMethod::AngularStratified,
            &SamplerConfig::default(),
            &mut rng,
        );
        assert!(selected.is_empty());
    }
}
