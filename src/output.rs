/// Output path derivation and atomic writes
use crate::constants::DEFAULT_OUTPUT_PREFIX;
use crate::error::{CompressionError, Result};
use crate::formats::ImageKind;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default destination for a single file: a `compressed_` sibling.
/// The extension only changes when the job converts to another format.
pub fn default_single_output(
    source: &Path,
    source_kind: ImageKind,
    target_kind: ImageKind,
) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("image.{}", source_kind.extension()));
    let mut output = match source.parent() {
        Some(parent) => parent.join(format!("{DEFAULT_OUTPUT_PREFIX}{name}")),
        None => PathBuf::from(format!("{DEFAULT_OUTPUT_PREFIX}{name}")),
    };
    if source_kind != target_kind {
        output.set_extension(target_kind.extension());
    }
    output
}

/// Mirror a source file into the output tree, preserving the directory
/// structure below `input_root`.
pub fn batch_output_path(
    source: &Path,
    input_root: &Path,
    output_root: &Path,
    source_kind: ImageKind,
    target_kind: ImageKind,
) -> PathBuf {
    let relative = source
        .strip_prefix(input_root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| {
            source
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(format!("image.{}", source_kind.extension())))
        });
    let mut output = output_root.join(relative);
    if source_kind != target_kind {
        output.set_extension(target_kind.extension());
    }
    output
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
        }
    }
    Ok(())
}

/// Write through a temp file in the destination directory, then rename.
/// Readers never observe a partially written image.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent_dir(dest)?;
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
