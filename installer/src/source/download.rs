//! Source archive download.
//!
//! Provides a trait-based abstraction for fetching release archives so
//! tests can substitute a fetcher without network access. The default
//! implementation speaks HTTP(S) through `ureq` and copies `file://` URLs
//! and bare paths from disk, which allows offline installs from a mirror.

use log::debug;
use std::path::Path;
use std::sync::OnceLock;

/// Trait for fetching a source archive to a local file.
///
/// # Examples
///
/// ```
/// use shellgpt_installer::source::download::UrlFetcher;
///
/// let fetcher = UrlFetcher;
/// // Use fetcher.fetch(url, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait SourceFetcher {
    /// Fetch the archive at `url` and write it to `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be retrieved or written.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Errors arising from archive retrieval.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The archive was not found (HTTP 404 or missing local file).
    #[error("archive not found: {url}")]
    NotFound {
        /// The location that could not be found.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an archive location points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location<'a> {
    Remote(&'a str),
    Local(&'a str),
}

fn classify(url: &str) -> Location<'_> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Location::Remote(url)
    } else {
        Location::Local(url.strip_prefix("file://").unwrap_or(url))
    }
}

/// Fetcher for `http(s)://` and `file://` URLs and plain paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlFetcher;

impl SourceFetcher for UrlFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        match classify(url) {
            Location::Remote(remote) => download_to_file(remote, dest),
            Location::Local(path) => copy_local(url, Path::new(path), dest),
        }
    }
}

/// Download a URL and write the body to a file.
fn download_to_file(url: &str, dest: &Path) -> Result<(), FetchError> {
    debug!("downloading {url}");
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(FetchError::Io)?;
    Ok(())
}

fn copy_local(url: &str, source: &Path, dest: &Path) -> Result<(), FetchError> {
    debug!("copying archive from {}", source.display());
    if !source.is_file() {
        return Err(FetchError::NotFound {
            url: url.to_owned(),
        });
    }
    std::fs::copy(source, dest)?;
    Ok(())
}

/// Shared `ureq` agent. Redirects are followed, which GitHub archive
/// URLs rely on.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
