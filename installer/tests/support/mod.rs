//! Test support utilities for installer behavioural tests.
//!
//! Builds release archives shaped like GitHub's `archive/v<version>.tar.gz`
//! downloads and formula files pointing at them through `file://` URLs, so
//! installs run end to end without network access.

use flate2::Compression;
use flate2::write::GzEncoder;
use shellgpt_installer::source::verification::compute_sha256;
use std::path::{Path, PathBuf};

/// Body of the `shellgpt.py` placed in generated archives.
///
/// It is a POSIX shell script so the direct strategy's smoke test can run it
/// without a Python interpreter on the host.
pub const SCRIPT_BODY: &str = "#!/bin/sh\necho 'usage: shellgpt [-h] prompt'\n";

/// A release archive on disk.
#[derive(Debug, Clone)]
pub struct Release {
    /// Version without the `v` prefix.
    pub version: String,
    /// Path of the `.tar.gz` file.
    pub archive: PathBuf,
    /// SHA-256 digest of the archive.
    pub sha256: String,
}

impl Release {
    /// `file://` URL of the archive.
    pub fn url(&self) -> String {
        format!("file://{}", self.archive.display())
    }
}

/// Writes `<dir>/v<version>.tar.gz` containing
/// `homebrew-shellgpt-<version>/shellgpt.py` and a README.
pub fn build_release(dir: &Path, version: &str) -> Release {
    let archive = dir.join(format!("v{version}.tar.gz"));
    let file = std::fs::File::create(&archive).expect("create archive");
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    let top = format!("homebrew-shellgpt-{version}");
    append(&mut builder, &format!("{top}/shellgpt.py"), SCRIPT_BODY.as_bytes());
    append(&mut builder, &format!("{top}/README.md"), b"# ShellGPT\n");
    builder
        .into_inner()
        .expect("finish tar stream")
        .finish()
        .expect("finish gzip stream");

    let sha256 = compute_sha256(&archive).expect("digest archive");
    Release {
        version: version.to_owned(),
        archive,
        sha256,
    }
}

fn append<W: std::io::Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) {
    let mut header = tar::Header::new_gnu();
    header.set_size(u64::try_from(data.len()).expect("entry size fits u64"));
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, path, data)
        .expect("append archive entry");
}

/// Renders a formula file installing `release` with `strategy` and
/// recording `sha256` as the expected digest.
pub fn formula_toml(release: &Release, strategy: &str, sha256: &str) -> String {
    format!(
        concat!(
            "version = \"{version}\"\n",
            "sha256 = \"{sha256}\"\n",
            "url = \"{url}\"\n",
            "strategy = \"{strategy}\"\n",
        ),
        version = release.version,
        sha256 = sha256,
        url = release.url(),
        strategy = strategy,
    )
}

/// Returns `true` when `path` has mode `0755`.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o777 == 0o755)
        .unwrap_or(false)
}
