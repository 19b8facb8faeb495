//! Output encodings for a subsampled ray set.
//!
//! All three writers consume the already-sampled, already-scaled ray set
//! plus the input header fields, and sanitize flux once more at write time
//! so no encoding can emit a non-finite or non-positive value.
//!
//! * **Native ASCII** – header line with the ray count replaced by the
//!   target, then one 7-field line per ray.
//! * **TracePro-style ASCII** – the foreign tool's fixed preamble followed
//!   by all 7 fields in uppercase scientific notation.
//! * **Native binary** – a rebuilt fixed header (identifier forced to
//!   [`IDENTIFIER_SUBSAMPLED`], description forced to
//!   [`OUTPUT_DESCRIPTION`], both flux totals set to the sum of the
//!   sanitized output flux) followed by one 7-float record per ray.

use std::fs::File;
use std::io::{BufWriter, Write};

use camino::Utf8Path;

use crate::constants::{IDENTIFIER_SUBSAMPLED, OUTPUT_DESCRIPTION, PROGRESS_STRIDE};
use crate::progress::ProgressObserver;
use crate::ray_file::record::format_sci;
use crate::ray_file::{AsciiHeader, AsciiRay, RayFileHeader, RayRecord};
use crate::rayset_errors::RaySetError;

use super::flux::FluxScale;

/// Encoding of the subsampled output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The native ASCII ray layout.
    Ascii,
    /// The foreign illumination tool's plain-text layout.
    TraceProAscii,
    /// The native binary layout (fixed header + 7-float records).
    NativeBinary,
}

/// Write the sampled, scaled ray set in the requested encoding.
///
/// `input` is only embedded in the TracePro preamble; `header` carries the
/// unit/format fields of the source file. Progress ticks cover the
/// streaming encoders (TracePro, binary) in `60..100`.
pub(crate) fn write_output(
    format: OutputFormat,
    input: &Utf8Path,
    output: &Utf8Path,
    header: &AsciiHeader,
    rays: &[AsciiRay],
    scale: &FluxScale,
    observer: &mut dyn ProgressObserver,
) -> Result<(), RaySetError> {
    match format {
        OutputFormat::Ascii => write_ascii(output, header, rays),
        OutputFormat::TraceProAscii => {
            write_tracepro(input, output, header.ray_count, rays, scale, observer)
        }
        OutputFormat::NativeBinary => write_binary(output, header, rays, scale, observer),
    }
}

fn write_ascii(
    output: &Utf8Path,
    header: &AsciiHeader,
    rays: &[AsciiRay],
) -> Result<(), RaySetError> {
    let mut writer = BufWriter::new(File::create(output)?);
    writeln!(writer, "{}", header.to_line_with_count(rays.len()))?;
    for ray in rays {
        let [x, y, z] = ray.position;
        let [l, m, n] = ray.direction;
        writeln!(
            writer,
            "{x:.6} {y:.6} {z:.6} {l:.6} {m:.6} {n:.6} {}",
            format_sci(ray.flux, false)
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_tracepro(
    input: &Utf8Path,
    output: &Utf8Path,
    requested: usize,
    rays: &[AsciiRay],
    scale: &FluxScale,
    observer: &mut dyn ProgressObserver,
) -> Result<(), RaySetError> {
    let mut writer = BufWriter::new(File::create(output)?);
    writeln!(writer, "!! Source file: {input}")?;
    writeln!(
        writer,
        "# NbrRays Requested: {requested},  NbrRays Generated: {}",
        rays.len()
    )?;
    // The foreign format's generic angular range and identity transforms.
    writeln!(
        writer,
        "Angular Range PolarBeg:   0.0000, PolarEnd: 180.0000, AzimuthBeg:   0.0000, AzimuthEnd: 360.0000"
    )?;
    writeln!(writer, "Rotation AboutX   0.0000, AboutY   0.0000, AboutZ   0.0000")?;
    writeln!(writer, "Translation X   0.0000, Y   0.0000, Z   0.0000")?;
    writeln!(writer, "Scale X   1.0000, Y   1.0000, Z   1.0000")?;
    writeln!(writer, "Conversion Factor From Meters   1.0000")?;
    writeln!(writer, "X Pos Y Pos Z Pos X Vec Y Vec Z Vec Inc Flux")?;

    let total = rays.len().max(1);
    for (i, ray) in rays.iter().enumerate() {
        if i % PROGRESS_STRIDE == 0 {
            observer.progress((60 + i * 40 / total) as u32);
        }
        let [x, y, z] = ray.position;
        let [l, m, n] = ray.direction;
        let flux = scale.sanitize(ray.flux);
        writeln!(
            writer,
            "{} {} {} {} {} {} {} ",
            format_sci(x, true),
            format_sci(y, true),
            format_sci(z, true),
            format_sci(l, true),
            format_sci(m, true),
            format_sci(n, true),
            format_sci(flux, true),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn write_binary(
    output: &Utf8Path,
    header: &AsciiHeader,
    rays: &[AsciiRay],
    scale: &FluxScale,
    observer: &mut dyn ProgressObserver,
) -> Result<(), RaySetError> {
    let sum_flux: f64 = rays.iter().map(|ray| ray.flux).sum();
    let file_header = RayFileHeader {
        identifier: IDENTIFIER_SUBSAMPLED,
        ray_count: rays.len() as i32,
        description: OUTPUT_DESCRIPTION.to_string(),
        source_flux: sum_flux as f32,
        ray_set_flux: sum_flux as f32,
        wavelength: 0.0,
        azimuth_beg: 0.0,
        azimuth_end: 0.0,
        polar_beg: 0.0,
        polar_end: 0.0,
        dimension_units: header.dimension_units,
        location: [0.0; 3],
        rotation: [0.0; 3],
        scale: [1.0; 3],
        unused: [0.0; 4],
        ray_format_type: header.ray_format_type,
        flux_type: header.flux_type,
        reserved_1: 0,
        reserved_2: 0,
    };

    let mut writer = BufWriter::new(File::create(output)?);
    writer.write_all(&file_header.to_bytes())?;

    let total = rays.len().max(1);
    for (i, ray) in rays.iter().enumerate() {
        if i % PROGRESS_STRIDE == 0 {
            observer.progress((60 + i * 40 / total) as u32);
        }
        let flux = scale.sanitize(ray.flux);
        let record = RayRecord {
            position: [
                ray.position[0] as f32,
                ray.position[1] as f32,
                ray.position[2] as f32,
            ],
            direction: [
                ray.direction[0] as f32,
                ray.direction[1] as f32,
                ray.direction[2] as f32,
            ],
            flux: flux as f32,
            wavelength: None,
        };
        writer.write_all(&record.to_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod writer_test {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::constants::HEADER_SIZE;
    use crate::progress::SilentProgress;

    fn sample_rays() -> Vec<AsciiRay> {
        vec![
            AsciiRay {
                position: [0.1, 0.2, 0.3],
                direction: [0.0, 0.0, 1.0],
                flux: 0.25,
            },
            AsciiRay {
                position: [-1.0, 0.0, 2.0],
                direction: [0.0, 0.6, 0.8],
                flux: 1.5,
            },
        ]
    }

    fn sample_header() -> AsciiHeader {
        AsciiHeader {
            ray_count: 200,
            dimension_units: 4,
            ray_format_type: 0,
            flux_type: 0,
        }
    }

    fn out_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
    }

    #[test]
    fn ascii_output_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = out_path(&dir, "out.txt");
        write_ascii(&path, &sample_header(), &sample_rays()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "2 4 0 0");
        assert_eq!(
            lines[1],
            "0.100000 0.200000 0.300000 0.000000 0.000000 1.000000 2.500000e-01"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn tracepro_output_preamble_and_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = out_path(&dir, "out.dat");
        let scale = FluxScale::new(200, 2, 1e-30);
        let input = Utf8PathBuf::from("source.txt");
        write_tracepro(&input, &path, 200, &sample_rays(), &scale, &mut SilentProgress).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "!! Source file: source.txt");
        assert_eq!(lines[1], "# NbrRays Requested: 200,  NbrRays Generated: 2");
        assert_eq!(
            lines[2],
            "Angular Range PolarBeg:   0.0000, PolarEnd: 180.0000, AzimuthBeg:   0.0000, AzimuthEnd: 360.0000"
        );
        assert_eq!(lines[7], "X Pos Y Pos Z Pos X Vec Y Vec Z Vec Inc Flux");
        assert_eq!(
            lines[8],
            "1.000000E-01 2.000000E-01 3.000000E-01 0.000000E+00 0.000000E+00 1.000000E+00 2.500000E-01 "
        );
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn binary_output_rebuilds_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = out_path(&dir, "out.dat");
        let scale = FluxScale::new(200, 2, 1e-30);
        write_binary(&path, &sample_header(), &sample_rays(), &scale, &mut SilentProgress)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 2 * RayRecord::byte_len(false));

        let (rest, parsed) = RayFileHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.identifier, IDENTIFIER_SUBSAMPLED);
        assert_eq!(parsed.ray_count, 2);
        assert_eq!(parsed.description, OUTPUT_DESCRIPTION);
        assert_eq!(parsed.source_flux, 1.75);
        assert_eq!(parsed.ray_set_flux, 1.75);
        assert_eq!(parsed.dimension_units, 4);
        assert_eq!(parsed.scale, [1.0, 1.0, 1.0]);
        assert_eq!(parsed.validate(), Ok(()));

        let (_, first) = RayRecord::parse(rest, false).unwrap();
        assert_eq!(first.flux, 0.25);
        assert_eq!(first.position, [0.1, 0.2, 0.3]);
    }

    #[test]
    fn binary_output_sanitizes_flux_at_write_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = out_path(&dir, "out.dat");
        let scale = FluxScale::new(10, 1, 1e-30);
        let rays = vec![AsciiRay {
            position: [0.0; 3],
            direction: [0.0, 0.0, 1.0],
            flux: f64::NAN,
        }];
        write_binary(&path, &sample_header(), &rays, &scale, &mut SilentProgress).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let (_, record) = RayRecord::parse(&bytes[HEADER_SIZE..], false).unwrap();
        assert_eq!(record.flux, 1e-30f32);
    }
}
