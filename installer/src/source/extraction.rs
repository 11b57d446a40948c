//! Source archive extraction.
//!
//! Unpacks `.tar.gz` release archives into a working directory with path
//! traversal protection. GitHub archives wrap the tree in a single
//! `<repo>-<version>/` directory; the extractor reports that directory as the
//! source root so callers never need to know its name.

use flate2::read::GzDecoder;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting source archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use shellgpt_installer::source::extraction::TarGzExtractor;
///
/// let extractor = TarGzExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Returns the root of the unpacked source tree.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory.
    /// Returns [`ExtractionError::EmptyArchive`] if no files are found.
    /// Returns [`ExtractionError::Io`] on I/O failures.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<PathBuf, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Default extractor using the `tar` and `flate2` crates.
///
/// Validates each entry path before extraction to guard against
/// path traversal attacks (zip-slip).
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzExtractor;

impl ArchiveExtractor for TarGzExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<PathBuf, ExtractionError> {
        let file = std::fs::File::open(archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let mut file_count = 0_usize;

        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_path = entry.path()?.into_owned();

            validate_entry_path(&entry_path)?;

            let dest_path = dest_dir.join(&entry_path);
            if let Some(parent) = dest_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            entry.unpack(&dest_path)?;

            if !entry.header().entry_type().is_dir() {
                file_count += 1;
            }
        }

        if file_count == 0 {
            return Err(ExtractionError::EmptyArchive);
        }

        source_root(dest_dir)
    }
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute() {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    for component in path.components() {
        if matches!(component, Component::ParentDir) {
            return Err(ExtractionError::PathTraversal {
                path: path.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Return the single top-level directory of `dest_dir`, or `dest_dir`
/// itself when the archive was not wrapped.
fn source_root(dest_dir: &Path) -> Result<PathBuf, ExtractionError> {
    let mut entries = std::fs::read_dir(dest_dir)?.collect::<Result<Vec<_>, _>>()?;
    if entries.len() == 1 {
        if let Some(only) = entries.pop() {
            if only.file_type()?.is_dir() {
                return Ok(only.path());
            }
        }
    }
    Ok(dest_dir.to_path_buf())
}
