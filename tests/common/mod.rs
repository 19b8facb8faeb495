// Not every test binary uses every helper.
#![allow(dead_code)]

use camino::Utf8PathBuf;
use rayset::{RayFileHeader, RayRecord};

/// Join `name` onto a scratch directory as a UTF-8 path.
pub fn scratch_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().join(name)).expect("tempdir paths are UTF-8")
}

/// A valid binary header with the given counts and record layout.
pub fn binary_header(identifier: i32, ray_count: i32, format: i32, flux_type: i32) -> RayFileHeader {
    RayFileHeader {
        identifier,
        ray_count,
        description: "integration test source".to_string(),
        source_flux: 1.0,
        ray_set_flux: 1.0,
        wavelength: 0.0,
        azimuth_beg: 0.0,
        azimuth_end: 360.0,
        polar_beg: 0.0,
        polar_end: 90.0,
        dimension_units: 1,
        location: [0.0; 3],
        rotation: [0.0; 3],
        scale: [1.0; 3],
        unused: [0.0; 4],
        ray_format_type: format,
        flux_type,
        reserved_1: 0,
        reserved_2: 0,
    }
}

/// Serialize a header plus records into one binary ray file image.
pub fn binary_file_bytes(header: &RayFileHeader, records: &[RayRecord]) -> Vec<u8> {
    let mut bytes = header.to_bytes();
    for record in records {
        bytes.extend_from_slice(&record.to_bytes());
    }
    bytes
}

/// An ASCII ray file with `count` seven-field lines of identical `flux`,
/// directions spread over the sphere so stratified sampling has structure
/// to work with.
pub fn uniform_ascii_content(count: usize, flux: &str) -> String {
    let mut content = format!("{count} 1 0 0\n");
    for i in 0..count {
        let phi = i as f64 * 0.7;
        let n = ((i % 19) as f64 - 9.0) / 9.0;
        let radial = (1.0 - n * n).sqrt();
        content.push_str(&format!(
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {flux}\n",
            0.1 * i as f64,
            0.0,
            1.0,
            radial * phi.cos(),
            radial * phi.sin(),
            n,
        ));
    }
    content
}
