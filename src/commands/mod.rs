//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod merge;

// Re-export main command functions
pub use merge::{derive_output_name, execute_merge, validate_args, MergeArgs};
