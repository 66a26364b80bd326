//! Sample store format and access.
//!
//! This module handles:
//! - The fixed-size identity header shared by all stores of one run
//! - Open/create/insert/traverse/close access to the keyed hit table

pub mod header;
pub mod samples;

// Re-export main types
pub use header::{StoreHeader, FORMAT_VERSION, HEADER_SIZE, MAGIC};
pub use samples::SampleStore;
