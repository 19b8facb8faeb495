//! # Ray-file codecs
//!
//! Parsers and serializers for the two persisted ray-file layouts: the
//! proprietary little-endian binary format (a fixed 208-byte header followed
//! by fixed-size float records) and the companion whitespace-separated ASCII
//! format (one 4-token header line followed by one line per ray).
//!
//! Modules
//! -----------------
//! * [`header`] – Fixed-layout binary header: parse, validation, byte-exact
//!   serialization.
//! * [`record`] – One ray record: 7/8-float binary layouts and the ASCII
//!   line layouts, plus the printf-style scientific-notation formatter.
//! * [`ascii_reader`] – Whole-file ASCII ingestion: header-line scan and the
//!   contiguous ray arena consumed by the subsampler.
//!
//! Layout notes
//! -----------------
//! * All binary fields are **little-endian**; there is no padding between
//!   fields ([`crate::constants::HEADER_SIZE`] is the exact on-disk size).
//! * `ray_format_type = 0` records carry 7 floats (`x y z l m n flux`);
//!   `ray_format_type = 2` records append a per-ray wavelength.
//! * These layouts are consumed by existing binary-format tools and must be
//!   reproduced byte-exact on write.

pub mod ascii_reader;
pub mod header;
pub mod record;

pub use ascii_reader::{AsciiHeader, AsciiRay, AsciiRaySet};
pub use header::RayFileHeader;
pub use record::RayRecord;
