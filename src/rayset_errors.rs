use thiserror::Error;

/// Crate-wide error type for ray-file reading, conversion, and subsampling.
///
/// Every operation aborts on the first error and surfaces a single variant
/// carrying the offending value where one exists. Flux sanitization is not an
/// error path: non-finite or non-positive flux is silently floored at write
/// time (see [`crate::subsample::flux::FluxScale`]).
#[derive(Error, Debug)]
pub enum RaySetError {
    #[error("File too small to contain valid header")]
    TruncatedHeader,

    #[error("Incorrect file identifier: {0}")]
    UnknownIdentifier(i32),

    #[error("Incorrect file format identifier: {0}")]
    UnknownFormatType(i32),

    #[error("Incorrect flux type identifier: {0}")]
    UnknownFluxType(i32),

    #[error("Unexpected EOF at ray {0}")]
    UnexpectedEndOfRays(usize),

    #[error("No header line found in ASCII ray file")]
    NoHeaderFound,

    #[error("File has only {available} rays ({requested} requested)")]
    InsufficientRays { available: usize, requested: usize },

    #[error("Invalid numeric field: {0}")]
    InvalidNumericField(String),

    #[error("Unsupported input for this operation: {0}")]
    UnsupportedInputForOperation(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for RaySetError {
    fn eq(&self, other: &Self) -> bool {
        use RaySetError::*;
        match (self, other) {
            (TruncatedHeader, TruncatedHeader) => true,
            (UnknownIdentifier(a), UnknownIdentifier(b)) => a == b,
            (UnknownFormatType(a), UnknownFormatType(b)) => a == b,
            (UnknownFluxType(a), UnknownFluxType(b)) => a == b,
            (UnexpectedEndOfRays(a), UnexpectedEndOfRays(b)) => a == b,
            (NoHeaderFound, NoHeaderFound) => true,
            (
                InsufficientRays {
                    available: a,
                    requested: r,
                },
                InsufficientRays {
                    available: a2,
                    requested: r2,
                },
            ) => a == a2 && r == r2,
            (InvalidNumericField(a), InvalidNumericField(b)) => a == b,
            (UnsupportedInputForOperation(a), UnsupportedInputForOperation(b)) => a == b,

            // IO errors are not comparable: equality on variant only.
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
