//! Sample filename decoding.
//!
//! This module handles:
//! - Splitting an encoded filename into directory and event specification
//! - Classifying the reserved `{root}`/`{kern}`/`{dep}` marker tokens
//! - Producing the fully populated [`ParsedFilename`] record

pub mod filename;

// Re-export main types
pub use filename::{decode, Marker, ParsedFilename};
