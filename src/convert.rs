//! # Binary → ASCII conversion pipeline
//!
//! Streams a binary ray file into the companion ASCII layout in a single
//! forward pass: read and validate the fixed header, write the ASCII header
//! line, then decode and re-encode one fixed-size record at a time. The
//! whole set is never buffered in memory.
//!
//! ## Failure semantics
//! -----------------
//! The first error aborts the pass. Because the output file is opened and
//! partially written before a later record can fail, a mid-stream error can
//! leave a truncated output on disk; callers must treat failure as "output
//! invalid". File handles close on every exit path.
//!
//! ## See also
//! ------------
//! * [`crate::ray_file::header::RayFileHeader`] – Header codec.
//! * [`crate::ray_file::record::RayRecord`] – Record codec.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};

use camino::Utf8Path;

use crate::constants::{HEADER_SIZE, PROGRESS_STRIDE};
use crate::progress::ProgressObserver;
use crate::ray_file::{RayFileHeader, RayRecord};
use crate::rayset_errors::RaySetError;

/// Convert a binary ray file to the ASCII layout.
///
/// Writes the ASCII header line
/// `"<ray_count> <dimension_units> <ray_format_type> <flux_type> "` followed
/// by one line per record, preserving the source's 7- or 8-field layout.
/// Converting the same input twice yields byte-identical output.
///
/// Arguments
/// -----------------
/// * `input`: Binary ray file to read.
/// * `output`: ASCII file to create (truncated if it exists).
/// * `observer`: Receiver for progress ticks (every
///   [`PROGRESS_STRIDE`] records, plus a final 100) and stage status text.
///
/// Return
/// ----------
/// * `Ok(())` on full success, otherwise the first error encountered:
///   [`RaySetError::TruncatedHeader`], a header validation error,
///   [`RaySetError::UnexpectedEndOfRays`] naming the failing record index,
///   or [`RaySetError::IoError`].
///
/// See also
/// ------------
/// * [`crate::subsample::subsample`] – Consumes the ASCII output.
pub fn convert_to_ascii(
    input: &Utf8Path,
    output: &Utf8Path,
    observer: &mut dyn ProgressObserver,
) -> Result<(), RaySetError> {
    observer.progress(0);
    observer.status("Reading binary header...");

    let mut reader = BufReader::new(File::open(input)?);
    let header = read_header(&mut reader)?;
    header.validate()?;

    observer.status("Writing ASCII header...");
    let mut writer = BufWriter::new(File::create(output)?);
    writeln!(
        writer,
        "{} {} {} {} ",
        header.ray_count, header.dimension_units, header.ray_format_type, header.flux_type
    )?;

    observer.status("Converting rays...");
    let with_wavelength = header.ray_floats() == 8;
    let record_size = RayRecord::byte_len(with_wavelength);
    let ray_count = header.ray_count.max(0) as usize;
    let mut buffer = vec![0u8; record_size];
    for i in 0..ray_count {
        if i % PROGRESS_STRIDE == 0 {
            observer.progress((i * 100 / ray_count.max(1)) as u32);
        }
        reader.read_exact(&mut buffer).map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                RaySetError::UnexpectedEndOfRays(i)
            } else {
                RaySetError::IoError(e)
            }
        })?;
        let (_, record) = RayRecord::parse(&buffer, with_wavelength)
            .map_err(|_| RaySetError::UnexpectedEndOfRays(i))?;
        writeln!(writer, "{} ", record.to_ascii_line())?;
    }
    writer.flush()?;

    observer.progress(100);
    observer.status("Conversion complete");
    Ok(())
}

/// Read and parse the fixed binary header from the start of `reader`.
///
/// A short read maps to [`RaySetError::TruncatedHeader`]; validation is the
/// caller's step so a partially-inspectable header stays available.
fn read_header(reader: &mut impl Read) -> Result<RayFileHeader, RaySetError> {
    let mut buffer = [0u8; HEADER_SIZE];
    reader.read_exact(&mut buffer).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            RaySetError::TruncatedHeader
        } else {
            RaySetError::IoError(e)
        }
    })?;
    let (_, header) =
        RayFileHeader::parse(&buffer).map_err(|_| RaySetError::TruncatedHeader)?;
    Ok(header)
}
