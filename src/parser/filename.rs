//! Decoder for encoded sample filenames.
//!
//! The sampling daemon encodes the profiled subject into the sample file
//! path itself. Valid shapes are:
//!
//! ```text
//! {kern}/name/event_spec
//! {root}/path/to/bin/event_spec
//! {root}/path/to/bin/{dep}/{root}/path/to/lib/event_spec
//! {root}/path/to/bin/{dep}/{kern}/name/event_spec
//! ```
//!
//! where `event_spec` is `event.count.unitmask.tgid.tid.cpu`. Any
//! components preceding the first `{root}`/`{kern}` marker are the
//! daemon's base directory and carry no identity.

use crate::utils::config::{DEP_MARKER, EVENT_SPEC_TOKENS, KERNEL_MARKER, ROOT_MARKER};
use crate::utils::error::DecodeError;

/// One of the three reserved path tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Root,
    Kernel,
    Dependency,
}

impl Marker {
    /// Classify a path component, `None` for ordinary components
    pub fn of(component: &str) -> Option<Marker> {
        match component {
            ROOT_MARKER => Some(Marker::Root),
            KERNEL_MARKER => Some(Marker::Kernel),
            DEP_MARKER => Some(Marker::Dependency),
            _ => None,
        }
    }

    fn is_image_root(component: &str) -> bool {
        matches!(Marker::of(component), Some(Marker::Root | Marker::Kernel))
    }
}

/// Structured view of one encoded sample filename
///
/// Decoding is all-or-nothing: a value of this type is only ever fully
/// populated. The six event tokens are opaque strings at this layer;
/// numeric interpretation is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFilename {
    /// Raw input, retained verbatim
    pub filename: String,

    /// Slash-joined path naming the profiled binary or kernel module
    pub image: String,

    /// Slash-joined path naming a dependent loaded binary/module,
    /// empty when no dependency segment is present
    pub lib_image: String,

    pub event: String,
    pub count: String,
    pub unit_mask: String,
    pub tgid: String,
    pub tid: String,
    pub cpu: String,
}

/// Decode an encoded sample filename into its constituent parts
///
/// # Errors
/// * `DecodeError::MissingSeparator` - no `/` in the input
/// * `DecodeError::BadEventSpec` - the suffix is not six non-empty tokens
/// * `DecodeError::BadPath` - marker placement violates the grammar
pub fn decode(filename: &str) -> Result<ParsedFilename, DecodeError> {
    let (dir_spec, event_spec) = filename
        .rsplit_once('/')
        .ok_or_else(|| DecodeError::MissingSeparator(filename.to_string()))?;

    let mut result = parse_event_spec(event_spec)?;
    result.filename = filename.to_string();

    // Components left of the first {root}/{kern} marker are the
    // configurable base directory and carry no identity.
    let path: Vec<&str> = dir_spec
        .split('/')
        .skip_while(|c| !Marker::is_image_root(c))
        .collect();

    // The trimmed path must start with a marker and hold at least one
    // component after it.
    if path.len() < 2 {
        return Err(DecodeError::BadPath(filename.to_string()));
    }

    // {kern} must be followed by a single path component
    if Marker::of(path[0]) == Some(Marker::Kernel) && path.len() != 2 {
        return Err(DecodeError::BadPath(filename.to_string()));
    }

    let mut i = 1;
    while i < path.len() {
        if Marker::of(path[i]) == Some(Marker::Dependency) {
            break;
        }
        result.image.push('/');
        result.image.push_str(path[i]);
        i += 1;
    }

    if result.image.is_empty() {
        return Err(DecodeError::BadPath(filename.to_string()));
    }

    if i == path.len() {
        return Ok(result);
    }

    // Skip the {dep} marker; it must be followed by {root} or {kern}.
    i += 1;
    match path.get(i).and_then(|c| Marker::of(c)) {
        Some(Marker::Kernel) => {
            // {kern} must be followed by a single path component
            if path.len() - i != 2 {
                return Err(DecodeError::BadPath(filename.to_string()));
            }
        }
        Some(Marker::Root) => {}
        _ => return Err(DecodeError::BadPath(filename.to_string())),
    }

    i += 1;
    for component in &path[i..] {
        result.lib_image.push('/');
        result.lib_image.push_str(component);
    }

    Ok(result)
}

/// Parse the `event.count.unitmask.tgid.tid.cpu` suffix
fn parse_event_spec(event_spec: &str) -> Result<ParsedFilename, DecodeError> {
    let tokens: Vec<&str> = event_spec.split('.').collect();

    if tokens.len() != EVENT_SPEC_TOKENS || tokens.iter().any(|t| t.is_empty()) {
        return Err(DecodeError::BadEventSpec(event_spec.to_string()));
    }

    Ok(ParsedFilename {
        event: tokens[0].to_string(),
        count: tokens[1].to_string(),
        unit_mask: tokens[2].to_string(),
        tgid: tokens[3].to_string(),
        tid: tokens[4].to_string(),
        cpu: tokens[5].to_string(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_kernel_image() {
        let parsed = decode("{kern}/vmlinux/CPU_CLK_UNHALT.100000.0.all.all.0").unwrap();
        assert_eq!(parsed.image, "/vmlinux");
        assert_eq!(parsed.lib_image, "");
        assert_eq!(parsed.event, "CPU_CLK_UNHALT");
        assert_eq!(parsed.count, "100000");
        assert_eq!(parsed.unit_mask, "0");
        assert_eq!(parsed.tgid, "all");
        assert_eq!(parsed.tid, "all");
        assert_eq!(parsed.cpu, "0");
    }

    #[test]
    fn test_decode_plain_binary() {
        let parsed = decode("{root}/usr/bin/foo/CPU_CLK_UNHALT.100000.0.all.all.0").unwrap();
        assert_eq!(parsed.image, "/usr/bin/foo");
        assert_eq!(parsed.lib_image, "");
    }

    #[test]
    fn test_decode_dependent_library() {
        let parsed =
            decode("{root}/usr/bin/foo/{dep}/{root}/lib/libc.so/CPU_CLK_UNHALT.100000.0.all.all.0")
                .unwrap();
        assert_eq!(parsed.image, "/usr/bin/foo");
        assert_eq!(parsed.lib_image, "/lib/libc.so");
    }

    #[test]
    fn test_decode_dependent_kernel() {
        let parsed =
            decode("{root}/usr/bin/foo/{dep}/{kern}/vmlinux/CPU_CLK_UNHALT.100000.0.all.all.0")
                .unwrap();
        assert_eq!(parsed.image, "/usr/bin/foo");
        assert_eq!(parsed.lib_image, "/vmlinux");
    }

    #[test]
    fn test_decode_retains_raw_filename() {
        let input = "{root}/usr/bin/foo/CPU_CLK_UNHALT.100000.0.all.all.0";
        assert_eq!(decode(input).unwrap().filename, input);
    }

    #[test]
    fn test_decode_trims_base_dir_prefix() {
        let parsed =
            decode("/var/lib/samples/{root}/usr/bin/foo/CPU_CLK_UNHALT.100000.0.all.all.0")
                .unwrap();
        assert_eq!(parsed.image, "/usr/bin/foo");
    }

    #[test]
    fn test_decode_missing_separator() {
        assert_eq!(
            decode("no-separator-here"),
            Err(DecodeError::MissingSeparator("no-separator-here".to_string()))
        );
    }

    #[test]
    fn test_decode_wrong_token_count() {
        assert_eq!(
            decode("{root}/a/evt.1.0.all"),
            Err(DecodeError::BadEventSpec("evt.1.0.all".to_string()))
        );
    }

    #[test]
    fn test_decode_empty_event_token() {
        assert_eq!(
            decode("{root}/a/evt.1..all.all.0"),
            Err(DecodeError::BadEventSpec("evt.1..all.all.0".to_string()))
        );
    }

    #[test]
    fn test_decode_missing_marker() {
        let input = "usr/bin/foo/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_decode_kernel_marker_with_two_components() {
        let input = "{kern}/a/b/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_decode_dep_not_followed_by_marker() {
        let input = "{root}/bin/foo/{dep}/lib/libc.so/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_decode_dep_at_end_of_path() {
        let input = "{root}/bin/foo/{dep}/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_decode_dep_kernel_with_two_components() {
        let input = "{root}/bin/foo/{dep}/{kern}/a/b/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_decode_marker_with_no_image() {
        let input = "{root}/{dep}/{root}/lib/libc.so/evt.1.0.all.all.0";
        assert_eq!(
            decode(input),
            Err(DecodeError::BadPath(input.to_string()))
        );
    }

    #[test]
    fn test_marker_classification() {
        assert_eq!(Marker::of("{root}"), Some(Marker::Root));
        assert_eq!(Marker::of("{kern}"), Some(Marker::Kernel));
        assert_eq!(Marker::of("{dep}"), Some(Marker::Dependency));
        assert_eq!(Marker::of("vmlinux"), None);
    }
}
