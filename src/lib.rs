pub mod constants;
pub mod convert;
pub mod progress;
pub mod ray_file;
pub mod rayset_errors;
pub mod subsample;

pub use convert::convert_to_ascii;
pub use progress::{ProgressObserver, SilentProgress};
pub use ray_file::{AsciiHeader, AsciiRay, AsciiRaySet, RayFileHeader, RayRecord};
pub use rayset_errors::RaySetError;
pub use subsample::{subsample, OutputFormat, SampleMethod, SamplerConfig};

#[cfg(feature = "progress")]
pub use progress::ConsoleProgress;
