//! Candidate file-set resolution.
//!
//! Turns the command line's positional arguments into the ordered,
//! deduplicated list of store files a merge will consume. Two modes:
//!
//! - a single argument with no marker brace names a binary image; the
//!   daemon's sample tree is scanned for that image's stores
//! - anything else is an explicit list of store paths, deduplicated
//!   while preserving first-occurrence order
//!
//! Users commonly reach the explicit mode through shell globbing, so
//! duplicate names are removed silently rather than rejected.

use crate::parser::{decode, ParsedFilename};
use crate::utils::config::{FileSetConfig, ROOT_MARKER};
use crate::utils::error::FileSetError;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

/// Resolve command-line arguments into an ordered, deduplicated list
/// of sample store paths
///
/// # Errors
/// * `FileSetError::Empty` - the resolved list came out empty
/// * `FileSetError::NoSamples` - image mode found nothing for the image
/// * `FileSetError::BadCounter` - counter index past the last event spec
/// * `FileSetError::Io` - the sample tree cannot be scanned
pub fn resolve(images: &[String], config: &FileSetConfig) -> Result<Vec<PathBuf>, FileSetError> {
    let result = if images.len() == 1 && !is_encoded_path(&images[0]) {
        resolve_image(&images[0], config)?
    } else {
        let mut result: Vec<PathBuf> = Vec::new();
        for name in images {
            let path = PathBuf::from(name);
            if !result.contains(&path) {
                result.push(path);
            }
        }
        result
    };

    if result.is_empty() {
        return Err(FileSetError::Empty);
    }

    debug!("resolved {} sample file(s)", result.len());

    Ok(result)
}

/// Resolve a binary image name against the daemon's sample tree
///
/// The image's directory is scanned for valid event-spec files. When
/// samples for more than one event configuration are present, the
/// configured counter index picks one (event, count, unit_mask) triple
/// in sorted order, and the resolved set is every per-tgid/tid/cpu
/// shard carrying that triple.
fn resolve_image(image: &str, config: &FileSetConfig) -> Result<Vec<PathBuf>, FileSetError> {
    let dir = config
        .base_dir
        .join(ROOT_MARKER)
        .join(image.trim_start_matches('/'));

    debug!("scanning {}", dir.display());

    let mut candidates: Vec<(ParsedFilename, PathBuf)> = Vec::new();

    let entries = fs::read_dir(&dir).map_err(|source| FileSetError::Io {
        path: dir.clone(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| FileSetError::Io {
            path: dir.clone(),
            source,
        })?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        match decode(&path.to_string_lossy()) {
            Ok(parsed) => candidates.push((parsed, path)),
            Err(err) => warn!("skipping {}: {}", path.display(), err),
        }
    }

    if candidates.is_empty() {
        return Err(FileSetError::NoSamples(image.to_string()));
    }

    let triple = select_event_triple(&candidates, config.counter)?;

    let mut result: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|(parsed, _)| event_triple(parsed) == triple)
        .map(|(_, path)| path)
        .collect();
    result.sort();

    Ok(result)
}

fn event_triple(parsed: &ParsedFilename) -> (String, String, String) {
    (
        parsed.event.clone(),
        parsed.count.clone(),
        parsed.unit_mask.clone(),
    )
}

/// Pick the counter-selected event configuration among the candidates
fn select_event_triple(
    candidates: &[(ParsedFilename, PathBuf)],
    counter: usize,
) -> Result<(String, String, String), FileSetError> {
    let mut triples: Vec<(String, String, String)> = candidates
        .iter()
        .map(|(parsed, _)| event_triple(parsed))
        .collect();
    triples.sort();
    triples.dedup();

    let available = triples.len();
    triples
        .into_iter()
        .nth(counter)
        .ok_or(FileSetError::BadCounter { counter, available })
}

/// True when an argument already looks like an encoded store path
/// rather than a bare image name
pub fn is_encoded_path(argument: &str) -> bool {
    argument.contains('{')
}
