//! Configuration and constants for the CLI.

use std::path::PathBuf;

/// Default base directory of the sampling daemon's sample tree
pub const DEFAULT_BASE_DIR: &str = "/var/lib/samples";

// Reserved path tokens delimiting structural meaning in an encoded filename
pub const ROOT_MARKER: &str = "{root}";
pub const KERNEL_MARKER: &str = "{kern}";
pub const DEP_MARKER: &str = "{dep}";

/// Number of dot-separated tokens in an event specification:
/// event.count.unitmask.tgid.tid.cpu
pub const EVENT_SPEC_TOKENS: usize = 6;

/// Immutable file-set resolution settings, built once from the CLI
/// and passed by reference into the file-set builder only.
#[derive(Debug, Clone)]
pub struct FileSetConfig {
    /// Counter index selecting one event configuration when an image
    /// carries samples for more than one
    pub counter: usize,

    /// Base directory holding the daemon's sample tree
    pub base_dir: PathBuf,
}

impl Default for FileSetConfig {
    fn default() -> Self {
        Self {
            counter: 0,
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
        }
    }
}
