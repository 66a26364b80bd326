//! Merge engine: cumulates a collection of sample stores into one.
//!
//! The first input seeds the destination as an exact byte copy, header
//! and table both; every subsequent input is folded in through the
//! accumulating insert path. The first input is special-cased for
//! efficiency, so merging {A, B} and {B, A} agree on key/value content
//! but not on literal bytes: the destination keeps the header and
//! layout of whichever file came first.
//!
//! Any I/O failure aborts the run immediately and may leave a partially
//! written destination behind; this is an offline batch tool, re-run
//! after fixing the fault.

use super::validator::validate_headers;
use crate::store::SampleStore;
use crate::utils::error::MergeError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// Merge `inputs`, in order, into a fresh store at `output`
///
/// Header coherence across all inputs is checked before the
/// destination is created. At most one source store is open at a time;
/// each source is closed before the next is opened.
///
/// # Errors
/// * `MergeError::EmptyInputSet` - no inputs given
/// * `MergeError::Validation` - some input disagrees with the first
/// * `MergeError::Store` / `MergeError::Io` - any I/O failure
pub fn merge(output: &Path, inputs: &[PathBuf]) -> Result<(), MergeError> {
    let Some(first) = inputs.first() else {
        return Err(MergeError::EmptyInputSet);
    };

    validate_headers(inputs)?;

    // Seed the destination as a raw copy of the first input; its
    // samples never go through the insert path.
    fs::copy(first, output).map_err(|source| MergeError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    debug!("seeded {} from {}", output.display(), first.display());

    if inputs.len() == 1 {
        return Ok(());
    }

    let mut dest = SampleStore::open_rw(output)?;

    for input in &inputs[1..] {
        let source = SampleStore::open(input)?;
        debug!("accumulating {} ({} keys)", input.display(), source.len());

        source.traverse(u64::MIN, u64::MAX, |key, value| {
            dest.insert(key, value);
        });

        source.close()?;
    }

    info!(
        "merged {} file(s) into {} ({} keys)",
        inputs.len(),
        output.display(),
        dest.len()
    );

    dest.close()?;

    Ok(())
}
