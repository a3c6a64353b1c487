use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::registry::RegistryError;
use crate::stats::StatsError;

/// Failure raised by a payload transform while it is being timed.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("expected a {expected} image, got {found}")]
    Layout {
        expected: &'static str,
        found: &'static str,
    },

    #[error("transform operates on {expected} frames, got {found}")]
    Representation {
        expected: &'static str,
        found: &'static str,
    },

    #[error("array is not in contiguous row-major layout")]
    NonContiguous,

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Everything that can stop a benchmark invocation.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("failed to load image {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("decoded image {} does not fit an array buffer: {source}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: ndarray::ShapeError,
    },

    #[error("implementation {slug} failed: {source}")]
    Transform {
        slug: String,
        #[source]
        source: TransformError,
    },

    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
