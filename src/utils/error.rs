//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding an encoded sample filename
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no path separator in sample filename: {0}")]
    MissingSeparator(String),

    #[error("bad event specification: {0}")]
    BadEventSpec(String),

    #[error("bad sample path: {0}")]
    BadPath(String),
}

/// Errors that can occur while reading or writing a sample store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a sample store (bad magic): {}", .0.display())]
    BadMagic(PathBuf),

    #[error("unsupported sample store version {version}: {}", .path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },

    #[error("truncated sample store: {}", .0.display())]
    Truncated(PathBuf),
}

/// Errors raised by the header-coherence check that gates merging
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(
        "sample headers disagree between {} and {}: {}",
        .reference.display(),
        .candidate.display(),
        .fields.join(", ")
    )]
    HeaderMismatch {
        reference: PathBuf,
        candidate: PathBuf,
        fields: Vec<&'static str>,
    },
}

/// Errors that can occur during a merge run
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("no sample files to merge")]
    EmptyInputSet,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while resolving the candidate file list
#[derive(Error, Debug)]
pub enum FileSetError {
    #[error("no sample files found for image {0}")]
    NoSamples(String),

    #[error("no sample files given")]
    Empty,

    #[error("counter index {counter} out of range: {available} event specification(s) available")]
    BadCounter { counter: usize, available: usize },

    #[error("cannot scan {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
