//! Merge command implementation.
//!
//! The merge command:
//! 1. Resolves the CLI arguments into a sample file list
//! 2. Derives the output name from the first file, unless given
//! 3. Checks header coherence and merges into the output store

use crate::fileset;
use crate::merge;
use crate::parser::decode;
use crate::utils::config::FileSetConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments for the merge command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct MergeArgs {
    /// Binary image name, or an explicit list of sample store paths
    pub images: Vec<String>,

    /// Counter index selecting one event configuration
    pub counter: usize,

    /// Base directory of the sampling daemon's sample tree
    pub base_dir: PathBuf,

    /// Output path for the merged store (None = derive from first input)
    pub output: Option<PathBuf>,
}

impl Default for MergeArgs {
    fn default() -> Self {
        Self {
            images: Vec::new(),
            counter: 0,
            base_dir: FileSetConfig::default().base_dir,
            output: None,
        }
    }
}

/// Validate merge arguments
///
/// **Public** - can be called before execute_merge for early validation
pub fn validate_args(args: &MergeArgs) -> Result<()> {
    if args.images.is_empty() {
        anyhow::bail!("neither a samples filename nor an image filename given");
    }

    if args.base_dir.as_os_str().is_empty() {
        anyhow::bail!("base directory cannot be empty");
    }

    Ok(())
}

/// Execute the merge command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * File-set resolution failures (nothing to merge, bad counter)
/// * Header coherence failures between inputs
/// * Any I/O failure while reading inputs or writing the output
pub fn execute_merge(args: MergeArgs) -> Result<()> {
    let start_time = Instant::now();

    let config = FileSetConfig {
        counter: args.counter,
        base_dir: args.base_dir.clone(),
    };

    info!("Step 1/3: Resolving sample file list...");
    let files = fileset::resolve(&args.images, &config)
        .context("Failed to resolve sample file list")?;

    for file in &files {
        debug!("  input: {}", file.display());
    }

    info!("Step 2/3: Deriving output name...");
    let output = match args.output {
        Some(path) => path,
        None => derive_output_name(&files[0])?,
    };

    info!("Step 3/3: Merging {} file(s)...", files.len());
    merge::merge(&output, &files).context("Failed to merge sample files")?;

    info!("✓ Merged store written to: {}", output.display());

    let elapsed = start_time.elapsed();
    info!("Merge completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Derive the merged store's filename from the first input
///
/// The encoded filename is decoded back to the profiled subject and
/// mangled into a flat name: the image path with its leading `/`
/// dropped and the remaining `/` replaced by `}`, with the dependent
/// image appended after a `}}` separator when present. The file lands
/// in the current directory.
pub fn derive_output_name(first: &Path) -> Result<PathBuf> {
    let parsed = decode(&first.to_string_lossy())
        .with_context(|| format!("Cannot decode sample filename {}", first.display()))?;

    let mut name = mangle(&parsed.image);
    if !parsed.lib_image.is_empty() {
        name.push_str("}}");
        name.push_str(&mangle(&parsed.lib_image));
    }

    Ok(PathBuf::from(name))
}

/// Flatten a slash-joined image path into a single filename component
fn mangle(image: &str) -> String {
    image.trim_start_matches('/').replace('/', "}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_valid() {
        let args = MergeArgs {
            images: vec!["/usr/bin/foo".to_string()],
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_no_images() {
        assert!(validate_args(&MergeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_empty_base_dir() {
        let args = MergeArgs {
            images: vec!["/usr/bin/foo".to_string()],
            base_dir: PathBuf::new(),
            ..Default::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_derive_output_name_plain() {
        let name =
            derive_output_name(Path::new("{root}/usr/bin/foo/EVT.100000.0.all.all.0")).unwrap();
        assert_eq!(name, PathBuf::from("usr}bin}foo"));
    }

    #[test]
    fn test_derive_output_name_with_dependency() {
        let name = derive_output_name(Path::new(
            "{root}/usr/bin/foo/{dep}/{root}/lib/libc.so/EVT.100000.0.all.all.0",
        ))
        .unwrap();
        assert_eq!(name, PathBuf::from("usr}bin}foo}}lib}libc.so"));
    }

    #[test]
    fn test_derive_output_name_kernel() {
        let name = derive_output_name(Path::new("{kern}/vmlinux/EVT.100000.0.all.all.0")).unwrap();
        assert_eq!(name, PathBuf::from("vmlinux"));
    }

    #[test]
    fn test_derive_output_name_undecodable() {
        assert!(derive_output_name(Path::new("garbage")).is_err());
    }

    #[test]
    fn test_mangle() {
        assert_eq!(mangle("/usr/bin/foo"), "usr}bin}foo");
        assert_eq!(mangle("/vmlinux"), "vmlinux");
    }
}
