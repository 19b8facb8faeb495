//! Single ray-record codec.
//!
//! A ray record is 7 little-endian `f32` values (`x y z l m n flux`) in the
//! generic layout, or 8 (`… wavelength`) in the spectral-aware layout. The
//! same record renders to one ASCII line: six fixed-point fields, flux in
//! scientific notation, and an optional trailing fixed-point wavelength.
//!
//! The scientific notation matches printf `%.6e` (six fractional digits,
//! sign and at least two digits in the exponent) because the ASCII files are
//! consumed by tools that parse exactly that shape; Rust's `{:e}` differs,
//! so [`format_sci`] post-processes the exponent.

use nom::{number::complete::le_f32, IResult};

/// One simulated light ray: position, direction cosines, radiant flux, and
/// an optional per-ray wavelength (spectral-aware binary layout only).
///
/// Direction cosines are stored as found in the source file; they are not
/// required to be normalized here. The subsampler normalizes a local copy
/// before angular binning.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RayRecord {
    /// Ray origin `(x, y, z)`.
    pub position: [f32; 3],
    /// Direction cosines `(l, m, n)`.
    pub direction: [f32; 3],
    /// Radiant flux attributed to the ray.
    pub flux: f32,
    /// Per-ray wavelength, present only in the 8-float layout.
    pub wavelength: Option<f32>,
}

impl RayRecord {
    /// On-disk byte length of one record.
    pub fn byte_len(with_wavelength: bool) -> usize {
        if with_wavelength {
            32
        } else {
            28
        }
    }

    /// Parse one binary record from the start of `input`.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: Bytes positioned at a record boundary.
    /// * `with_wavelength`: `true` for the 8-float spectral layout.
    ///
    /// Return
    /// ----------
    /// * `(remaining, record)` on success; a nom error when `input` holds
    ///   fewer bytes than one record.
    pub fn parse(input: &[u8], with_wavelength: bool) -> IResult<&[u8], Self> {
        let (input, x) = le_f32(input)?;
        let (input, y) = le_f32(input)?;
        let (input, z) = le_f32(input)?;
        let (input, l) = le_f32(input)?;
        let (input, m) = le_f32(input)?;
        let (input, n) = le_f32(input)?;
        let (input, flux) = le_f32(input)?;
        let (input, wavelength) = if with_wavelength {
            let (input, w) = le_f32(input)?;
            (input, Some(w))
        } else {
            (input, None)
        };
        Ok((
            input,
            RayRecord {
                position: [x, y, z],
                direction: [l, m, n],
                flux,
                wavelength,
            },
        ))
    }

    /// Serialize to the exact on-disk byte layout (7 or 8 floats).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::byte_len(self.wavelength.is_some()));
        for value in self.position.iter().chain(self.direction.iter()) {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&self.flux.to_le_bytes());
        if let Some(wavelength) = self.wavelength {
            out.extend_from_slice(&wavelength.to_le_bytes());
        }
        out
    }

    /// Render the ASCII line body for this record, without line terminator.
    ///
    /// Six position/direction fields with 6 fixed decimal digits, flux in
    /// `%.6e` scientific notation, and the wavelength (when present) as a
    /// trailing fixed-point field.
    pub fn to_ascii_line(&self) -> String {
        let [x, y, z] = self.position;
        let [l, m, n] = self.direction;
        let mut line = format!(
            "{x:.6} {y:.6} {z:.6} {l:.6} {m:.6} {n:.6} {}",
            format_sci(f64::from(self.flux), false)
        );
        if let Some(wavelength) = self.wavelength {
            line.push_str(&format!(" {wavelength:.6}"));
        }
        line
    }
}

/// Format `value` like printf `%.6e` (lowercase) or `%.6E` (uppercase).
///
/// Rust's `{:.6e}` writes `1.234560e-1`; the files this crate emits need the
/// printf shape `1.234560e-01` with a signed, two-digit-minimum exponent.
pub(crate) fn format_sci(value: f64, uppercase: bool) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let rendered = format!("{value:.6e}");
    let (mantissa, exponent) = rendered
        .split_once('e')
        .expect("{:e} output always contains an exponent");
    let exponent: i32 = exponent.parse().expect("{:e} exponent is an integer");
    let marker = if uppercase { 'E' } else { 'e' };
    format!("{mantissa}{marker}{exponent:+03}")
}
