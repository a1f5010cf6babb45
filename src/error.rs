//! Errors raised while (re)building the evaluation kernel.
//!
//! Rejected user operations (a blob outside the disk, too many blobs)
//! are not errors: they return `None`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("empty viewport ({width}×{height})")]
    EmptyViewport { width: u32, height: u32 },

    #[error("{count} blobs do not fit in a kernel of {capacity}")]
    KernelCapacity { count: usize, capacity: usize },

    #[error("blob {index} has an invalid position or radius")]
    InvalidBlob { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
