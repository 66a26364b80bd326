//! Store merging.
//!
//! This module handles:
//! - The header-coherence check gating every merge
//! - The merge engine cumulating per-key hit counts across stores

pub mod engine;
pub mod validator;

// Re-export main entry points
pub use engine::merge;
pub use validator::{check_coherence, validate, validate_headers};
