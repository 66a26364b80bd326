//! Header-coherence check that gates merging.
//!
//! All stores participating in one merge must carry identical
//! sampling-identity metadata. The first store of the list is the
//! reference; every other store is validated against that single
//! reference. Header equality is a flat value comparison, so the
//! check is transitive and a linear pass is sufficient.

use crate::store::{SampleStore, StoreHeader};
use crate::utils::error::{MergeError, ValidationError};
use log::debug;
use std::path::{Path, PathBuf};

/// Validate one open candidate store against the reference store
pub fn validate(reference: &SampleStore, candidate: &SampleStore) -> Result<(), ValidationError> {
    check_coherence(
        reference.header(),
        reference.path(),
        candidate.header(),
        candidate.path(),
    )
}

/// Compare two headers, naming every mismatched identity field
pub fn check_coherence(
    reference: &StoreHeader,
    reference_path: &Path,
    candidate: &StoreHeader,
    candidate_path: &Path,
) -> Result<(), ValidationError> {
    let fields = reference.identity_mismatches(candidate);

    if fields.is_empty() {
        return Ok(());
    }

    Err(ValidationError::HeaderMismatch {
        reference: reference_path.to_path_buf(),
        candidate: candidate_path.to_path_buf(),
        fields,
    })
}

/// Check header coherence across a whole file list
///
/// Only the headers are read; no table is loaded. Validation is
/// strict: the first mismatch aborts the whole operation.
pub fn validate_headers(paths: &[PathBuf]) -> Result<(), MergeError> {
    let Some(first) = paths.first() else {
        return Ok(());
    };

    let reference = SampleStore::read_header(first)?;

    for candidate_path in &paths[1..] {
        let candidate = SampleStore::read_header(candidate_path)?;
        check_coherence(&reference, first, &candidate, candidate_path)?;
    }

    debug!("headers coherent across {} file(s)", paths.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FORMAT_VERSION;
    use tempfile::tempdir;

    fn header(event_id: u32) -> StoreHeader {
        StoreHeader {
            version: FORMAT_VERSION,
            event_id,
            event_count: 100_000,
            unit_mask: 0,
            is_kernel: 0,
            separation_mode: 0,
            cpu_count: 2,
            cpu_speed_khz: 0,
            mtime: 0,
        }
    }

    fn write_store(dir: &Path, name: &str, hdr: StoreHeader) -> PathBuf {
        let path = dir.join(name);
        SampleStore::create(&path, hdr).unwrap().close().unwrap();
        path
    }

    #[test]
    fn test_check_coherence_equal() {
        let a = header(1);
        let b = header(1);
        assert!(check_coherence(&a, Path::new("a"), &b, Path::new("b")).is_ok());
    }

    #[test]
    fn test_check_coherence_mismatch_names_files_and_fields() {
        let a = header(1);
        let b = header(2);
        let err = check_coherence(&a, Path::new("a"), &b, Path::new("b")).unwrap_err();

        let ValidationError::HeaderMismatch {
            reference,
            candidate,
            fields,
        } = err;
        assert_eq!(reference, PathBuf::from("a"));
        assert_eq!(candidate, PathBuf::from("b"));
        assert_eq!(fields, vec!["event_id"]);
    }

    #[test]
    fn test_validate_headers_list() {
        let dir = tempdir().unwrap();
        let a = write_store(dir.path(), "a", header(1));
        let b = write_store(dir.path(), "b", header(1));
        let c = write_store(dir.path(), "c", header(3));

        assert!(validate_headers(&[a.clone(), b.clone()]).is_ok());

        let err = validate_headers(&[a, b, c.clone()]).unwrap_err();
        match err {
            MergeError::Validation(ValidationError::HeaderMismatch { candidate, .. }) => {
                assert_eq!(candidate, c);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_headers_empty_list() {
        assert!(validate_headers(&[]).is_ok());
    }

    #[test]
    fn test_validate_open_stores() {
        let dir = tempdir().unwrap();
        let a = write_store(dir.path(), "a", header(1));
        let b = write_store(dir.path(), "b", header(1));

        let reference = SampleStore::open(&a).unwrap();
        let candidate = SampleStore::open(&b).unwrap();
        assert!(validate(&reference, &candidate).is_ok());
    }
}
