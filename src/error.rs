use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StevedoreError {
    #[error("invalid {what} dimensions {width}x{height}: both sides must be positive")]
    InvalidDimension {
        what: &'static str,
        width: u32,
        height: u32,
    },

    #[error("bin cost must be positive")]
    InvalidCost,

    #[error("unsupported bin selection algorithm '{0}'")]
    UnknownBinAlgo(String),

    #[error("bin index {index} out of range ({len} bins)")]
    BinIndexOutOfRange { index: usize, len: usize },

    #[error("failed to read problem file '{path}': {source}")]
    ProblemRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("problem file line {line}: {message}")]
    ProblemParse { line: usize, message: String },

    #[error("packing invariant violated in bin {bin}: {detail}")]
    InvariantViolation { bin: String, detail: String },
}
