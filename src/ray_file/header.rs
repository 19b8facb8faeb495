//! Binary ray-file header parsing and serialization.
//!
//! The header is a fixed 208-byte little-endian record at the start of every
//! binary ray file. This module provides a parser for it, field validation
//! against the format rules, and the byte-exact inverse serialization used
//! when writing native binary output.
//!
//! # What the header contains
//!
//! * **`identifier`**: 32-bit file tag; legal values are `1010` (vendor
//!   files) and `8675309` (files written by this crate).
//! * **`ray_count`**: Number of fixed-size ray records following the header.
//! * **`description`**: 100 bytes of free text, NUL-padded.
//! * **`source_flux` / `ray_set_flux`**: Aggregate radiant flux of the
//!   source and of the stored ray set.
//! * **`wavelength`**, **`azimuth_beg..end`**, **`polar_beg..end`**:
//!   Spectral/angular metadata of the emitting source.
//! * **`dimension_units`**: Integer code for the spatial unit system.
//! * **`location` / `rotation` / `scale`**: Source placement vectors.
//! * **`ray_format_type`**: `0` = generic 7-float records, `2` =
//!   spectral-aware 8-float records (per-ray wavelength).
//! * **`flux_type`**: `0` = monochrome, `1` = spectral; `1` is only legal
//!   when `ray_format_type` is `0`.
//!
//! # Validation
//!
//! [`RayFileHeader::validate`] enforces the identifier and format/flux-type
//! rules and returns the typed error naming the offending value. Parsing and
//! validation are separate steps so a caller can still inspect a header that
//! fails validation.

use nom::{
    bytes::complete::take,
    number::complete::{le_f32, le_i32},
    IResult,
};

use crate::constants::{
    DESCRIPTION_SIZE, HEADER_SIZE, IDENTIFIER_CLASSIC, IDENTIFIER_SUBSAMPLED,
};
use crate::rayset_errors::RaySetError;

/// In-memory representation of the fixed binary ray-file header.
///
/// Field order mirrors the on-disk layout. The `description` is trimmed of
/// NUL padding on parse and re-padded on serialization.
#[derive(Debug, PartialEq, Clone)]
pub struct RayFileHeader {
    /// File tag; `1010` or `8675309`.
    pub identifier: i32,
    /// Number of ray records following the header.
    pub ray_count: i32,
    /// Free-text description, at most 100 bytes on disk.
    pub description: String,
    /// Total radiant flux of the emitting source.
    pub source_flux: f32,
    /// Total radiant flux carried by the stored ray set.
    pub ray_set_flux: f32,
    /// Source wavelength in micrometers; `0.0` when not applicable.
    pub wavelength: f32,
    /// Start of the azimuth emission range, degrees.
    pub azimuth_beg: f32,
    /// End of the azimuth emission range, degrees.
    pub azimuth_end: f32,
    /// Start of the polar emission range, degrees.
    pub polar_beg: f32,
    /// End of the polar emission range, degrees.
    pub polar_end: f32,
    /// Integer code of the spatial unit system.
    pub dimension_units: i32,
    /// Source location vector.
    pub location: [f32; 3],
    /// Source rotation vector.
    pub rotation: [f32; 3],
    /// Source scale vector.
    pub scale: [f32; 3],
    /// Four floats reserved by the format, carried through untouched.
    pub unused: [f32; 4],
    /// Record layout selector: `0` = 7 floats, `2` = 8 floats.
    pub ray_format_type: i32,
    /// Flux encoding: `0` = monochrome, `1` = spectral (format 0 only).
    pub flux_type: i32,
    /// Reserved field, zero in every observed file.
    pub reserved_1: i32,
    /// Reserved field, zero in every observed file.
    pub reserved_2: i32,
}

fn le_f32_array<const N: usize>(input: &[u8]) -> IResult<&[u8], [f32; N]> {
    let mut out = [0.0f32; N];
    let mut rest = input;
    for slot in &mut out {
        let (next, value) = le_f32(rest)?;
        *slot = value;
        rest = next;
    }
    Ok((rest, out))
}

impl RayFileHeader {
    /// Parse the fixed 208-byte header from the start of `input`.
    ///
    /// Arguments
    /// -----------------
    /// * `input`: A byte slice starting at the beginning of the file, at
    ///   least [`HEADER_SIZE`] bytes long.
    ///
    /// Return
    /// ----------
    /// * An [`IResult`] of `(remaining, header)`. On success `remaining`
    ///   points past the header; the description is trimmed of NUL padding.
    ///
    /// See also
    /// ------------
    /// * [`Self::validate`] – Field validation against the format rules.
    /// * [`Self::to_bytes`] – Byte-exact inverse.
    pub fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, identifier) = le_i32(input)?;
        let (input, ray_count) = le_i32(input)?;
        let (input, description) = take(DESCRIPTION_SIZE)(input)?;
        let (input, source_flux) = le_f32(input)?;
        let (input, ray_set_flux) = le_f32(input)?;
        let (input, wavelength) = le_f32(input)?;
        let (input, azimuth_beg) = le_f32(input)?;
        let (input, azimuth_end) = le_f32(input)?;
        let (input, polar_beg) = le_f32(input)?;
        let (input, polar_end) = le_f32(input)?;
        let (input, dimension_units) = le_i32(input)?;
        let (input, location) = le_f32_array::<3>(input)?;
        let (input, rotation) = le_f32_array::<3>(input)?;
        let (input, scale) = le_f32_array::<3>(input)?;
        let (input, unused) = le_f32_array::<4>(input)?;
        let (input, ray_format_type) = le_i32(input)?;
        let (input, flux_type) = le_i32(input)?;
        let (input, reserved_1) = le_i32(input)?;
        let (input, reserved_2) = le_i32(input)?;
        Ok((
            input,
            RayFileHeader {
                identifier,
                ray_count,
                description: String::from_utf8_lossy(description)
                    .trim_end_matches('\0')
                    .trim()
                    .to_string(),
                source_flux,
                ray_set_flux,
                wavelength,
                azimuth_beg,
                azimuth_end,
                polar_beg,
                polar_end,
                dimension_units,
                location,
                rotation,
                scale,
                unused,
                ray_format_type,
                flux_type,
                reserved_1,
                reserved_2,
            },
        ))
    }

    /// Check identifier, format-type, and flux-type rules.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` when all fields are legal, otherwise the typed error
    ///   carrying the offending value:
    ///   [`RaySetError::UnknownIdentifier`] unless `identifier ∈ {1010, 8675309}`,
    ///   [`RaySetError::UnknownFormatType`] unless `ray_format_type ∈ {0, 2}`,
    ///   [`RaySetError::UnknownFluxType`] when the flux type is illegal for
    ///   the record format (`{0, 1}` for format 0, `0` for format 2).
    pub fn validate(&self) -> Result<(), RaySetError> {
        if self.identifier != IDENTIFIER_CLASSIC && self.identifier != IDENTIFIER_SUBSAMPLED {
            return Err(RaySetError::UnknownIdentifier(self.identifier));
        }
        match self.ray_format_type {
            0 => {
                if self.flux_type != 0 && self.flux_type != 1 {
                    return Err(RaySetError::UnknownFluxType(self.flux_type));
                }
            }
            2 => {
                if self.flux_type != 0 {
                    return Err(RaySetError::UnknownFluxType(self.flux_type));
                }
            }
            other => return Err(RaySetError::UnknownFormatType(other)),
        }
        Ok(())
    }

    /// Number of `f32` values in each ray record described by this header.
    pub fn ray_floats(&self) -> usize {
        if self.ray_format_type == 2 {
            8
        } else {
            7
        }
    }

    /// Serialize to the exact on-disk byte layout.
    ///
    /// The description is truncated to 100 bytes and NUL-padded. The result
    /// is always [`HEADER_SIZE`] bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        out.extend_from_slice(&self.identifier.to_le_bytes());
        out.extend_from_slice(&self.ray_count.to_le_bytes());

        let mut description = [0u8; DESCRIPTION_SIZE];
        let bytes = self.description.as_bytes();
        let len = bytes.len().min(DESCRIPTION_SIZE);
        description[..len].copy_from_slice(&bytes[..len]);
        out.extend_from_slice(&description);

        for value in [
            self.source_flux,
            self.ray_set_flux,
            self.wavelength,
            self.azimuth_beg,
            self.azimuth_end,
            self.polar_beg,
            self.polar_end,
        ] {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&self.dimension_units.to_le_bytes());
        for vector in [&self.location, &self.rotation, &self.scale] {
            for value in vector.iter() {
                out.extend_from_slice(&value.to_le_bytes());
            }
        }
        for value in self.unused.iter() {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out.extend_from_slice(&self.ray_format_type.to_le_bytes());
        out.extend_from_slice(&self.flux_type.to_le_bytes());
        out.extend_from_slice(&self.reserved_1.to_le_bytes());
        out.extend_from_slice(&self.reserved_2.to_le_bytes());
        debug_assert_eq!(out.len(), HEADER_SIZE);
        out
    }
}

#[cfg(test)]
mod header_test {
    use super::*;

    fn sample_header() -> RayFileHeader {
        RayFileHeader {
            identifier: IDENTIFIER_CLASSIC,
            ray_count: 42,
            description: "LED die, 5500K bin".to_string(),
            source_flux: 12.5,
            ray_set_flux: 11.25,
            wavelength: 0.55,
            azimuth_beg: 0.0,
            azimuth_end: 360.0,
            polar_beg: 0.0,
            polar_end: 90.0,
            dimension_units: 4,
            location: [0.0, 0.0, 1.5],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
            unused: [0.0; 4],
            ray_format_type: 0,
            flux_type: 1,
            reserved_1: 0,
            reserved_2: 0,
        }
    }

    #[test]
    fn serialized_size_is_fixed() {
        assert_eq!(sample_header().to_bytes().len(), HEADER_SIZE);
    }

    #[test]
    fn parse_inverts_to_bytes() {
        let header = sample_header();
        let bytes = header.to_bytes();
        let (rest, parsed) = RayFileHeader::parse(&bytes).expect("valid header bytes");
        assert!(rest.is_empty());
        assert_eq!(parsed, header);
    }

    #[test]
    fn description_is_trimmed_of_padding() {
        let bytes = sample_header().to_bytes();
        let (_, parsed) = RayFileHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.description, "LED die, 5500K bin");
    }

    #[test]
    fn parse_fails_on_short_input() {
        let bytes = sample_header().to_bytes();
        assert!(RayFileHeader::parse(&bytes[..HEADER_SIZE - 1]).is_err());
    }

    #[test]
    fn validate_accepts_both_identifiers() {
        let mut header = sample_header();
        assert_eq!(header.validate(), Ok(()));
        header.identifier = IDENTIFIER_SUBSAMPLED;
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unknown_identifier() {
        let mut header = sample_header();
        header.identifier = 9999;
        assert_eq!(header.validate(), Err(RaySetError::UnknownIdentifier(9999)));
    }

    #[test]
    fn validate_rejects_unknown_format_type() {
        let mut header = sample_header();
        header.ray_format_type = 1;
        header.flux_type = 0;
        assert_eq!(header.validate(), Err(RaySetError::UnknownFormatType(1)));
    }

    #[test]
    fn validate_rejects_spectral_flux_on_spectral_format() {
        let mut header = sample_header();
        header.ray_format_type = 2;
        header.flux_type = 1;
        assert_eq!(header.validate(), Err(RaySetError::UnknownFluxType(1)));
        header.flux_type = 0;
        assert_eq!(header.validate(), Ok(()));
        assert_eq!(header.ray_floats(), 8);
    }

    #[test]
    fn validate_rejects_unknown_flux_type_on_generic_format() {
        let mut header = sample_header();
        header.flux_type = 3;
        assert_eq!(header.validate(), Err(RaySetError::UnknownFluxType(3)));
    }
}
