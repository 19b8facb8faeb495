//! # Ray-set subsampling
//!
//! Reduces an ASCII ray set to a smaller target count while conserving
//! aggregate flux, then writes one of three output encodings. The operation
//! is a linear pipeline (load, select, scale, write) aborting on the
//! first error; each stage boundary emits its status text and milestone
//! progress tick (0/50/60/100, with finer ticks inside streaming stages).
//!
//! Modules
//! -----------------
//! * [`binning`] – (θ, φ) direction grid, per-bin flux accumulation, quota
//!   allocation and exact-count reconciliation.
//! * [`strategy`] – Uniform and flux-stratified selection over the arena.
//! * [`flux`] – Flux rescaling and the write-time sanitization floor.
//! * [`writer`] – Native ASCII, TracePro-style ASCII, and native binary
//!   encoders.
//!
//! Input constraints
//! -----------------
//! Only the ASCII layout is accepted: a binary `.dat` path fails fast with
//! [`RaySetError::UnsupportedInputForOperation`] before any output file is
//! touched (convert it first via [`crate::convert::convert_to_ascii`]), and
//! so does an ASCII file whose header declares the spectral 8-field record
//! layout, which this pipeline does not sample.
//!
//! Quick-Start
//! -----------------
//! ```rust,no_run
//! use camino::Utf8Path;
//! use rand::SeedableRng;
//! use rayset::progress::SilentProgress;
//! use rayset::subsample::{subsample, OutputFormat, SampleMethod, SamplerConfig};
//!
//! # fn run() -> Result<(), rayset::rayset_errors::RaySetError> {
//! let mut rng = rand::rngs::StdRng::from_os_rng();
//! subsample(
//!     Utf8Path::new("rays.txt"),
//!     100_000,
//!     Utf8Path::new("rays_100k.txt"),
//!     OutputFormat::Ascii,
//!     SampleMethod::AngularStratified,
//!     &SamplerConfig::default(),
//!     &mut rng,
//!     &mut SilentProgress,
//! )?;
//! # Ok(()) }
//! ```

use camino::Utf8Path;
use rand::Rng;

use crate::constants::PROGRESS_STRIDE;
use crate::progress::ProgressObserver;
use crate::ray_file::{AsciiRay, AsciiRaySet};
use crate::rayset_errors::RaySetError;

pub mod binning;
pub mod flux;
pub mod strategy;
pub mod writer;

pub use binning::SamplerConfig;
pub use strategy::SampleMethod;
pub use writer::OutputFormat;

use flux::FluxScale;
use strategy::select_rays;
use writer::write_output;

/// Subsample an ASCII ray file down to `target_rays` rays.
///
/// Selects rays by `method`, rescales each survivor's flux by
/// `original_count / target_rays` (sanitized to the configured floor), and
/// writes the result in `format`. Whenever the input pool holds at least
/// `target_rays` valid rays, the output holds exactly `target_rays`: an
/// exact equality, for both methods.
///
/// Arguments
/// -----------------
/// * `input`: ASCII ray file; a `.dat` path is rejected.
/// * `target_rays`: Requested output ray count, > 0.
/// * `output`: Destination file (truncated if it exists).
/// * `format`: Output encoding.
/// * `method`: Selection strategy.
/// * `config`: Grid dimensions and flux floor.
/// * `rng`: Source of randomness; seed it for reproducible selections.
/// * `observer`: Receiver for progress ticks and stage status text.
///
/// Return
/// ----------
/// * `Ok(())` on full success, otherwise the first error: the input guards
///   ([`RaySetError::UnsupportedInputForOperation`]), a structural read
///   error ([`RaySetError::NoHeaderFound`],
///   [`RaySetError::InvalidNumericField`]),
///   [`RaySetError::InsufficientRays`], or [`RaySetError::IoError`]. A
///   failure after the output file was opened leaves the partial file in
///   place; treat failure as "output invalid".
///
/// See also
/// ------------
/// * [`crate::convert::convert_to_ascii`] – Produces the ASCII input from a
///   binary ray file.
#[allow(clippy::too_many_arguments)]
pub fn subsample(
    input: &Utf8Path,
    target_rays: usize,
    output: &Utf8Path,
    format: OutputFormat,
    method: SampleMethod,
    config: &SamplerConfig,
    rng: &mut impl Rng,
    observer: &mut dyn ProgressObserver,
) -> Result<(), RaySetError> {
    observer.progress(0);
    observer.status("Loading file...");

    if input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dat"))
    {
        return Err(RaySetError::UnsupportedInputForOperation(
            "Binary .dat not supported for subsampling. Convert to ASCII .txt first.".to_string(),
        ));
    }

    let set = AsciiRaySet::load(input, observer)?;
    if set.header.ray_format_type == 2 {
        return Err(RaySetError::UnsupportedInputForOperation(
            "spectral ray files (ray_format_type 2) cannot be subsampled".to_string(),
        ));
    }
    set.require_at_least(target_rays)?;

    observer.status("Subsampling...");
    observer.progress(50);
    let selected = select_rays(&set.rays, target_rays, method, config, rng);

    observer.status("Scaling fluxes...");
    let scale = FluxScale::new(set.header.ray_count, target_rays, config.flux_floor);
    let total = target_rays.max(1);
    let mut sampled: Vec<AsciiRay> = Vec::with_capacity(selected.len());
    for (i, &index) in selected.iter().enumerate() {
        if i % PROGRESS_STRIDE == 0 {
            observer.progress((50 + i * 10 / total) as u32);
        }
        let mut ray = set.rays[index as usize];
        ray.flux = scale.apply(ray.flux);
        sampled.push(ray);
    }

    observer.status("Saving file...");
    observer.progress(60);
    write_output(format, input, output, &set.header, &sampled, &scale, observer)?;

    observer.progress(100);
    observer.status("Done!");
    Ok(())
}
