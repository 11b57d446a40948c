//! Install pipeline orchestration.
//!
//! Runs the install steps strictly in sequence: fetch the release archive,
//! verify its digest, unpack it, provision the entry point with the selected
//! strategy, then smoke test it. Each step's success is the precondition for
//! the next. The archive is fetched and unpacked inside a temporary
//! directory, so nothing reaches the target layout before verification.

use crate::deps::{CommandExecutor, SystemCommandExecutor};
use crate::error::{InstallerError, Result};
use crate::layout::TargetLayout;
use crate::output::write_stderr_line;
use crate::smoke::run_smoke_test;
use crate::source::download::{SourceFetcher, UrlFetcher};
use crate::source::extraction::{ArchiveExtractor, TarGzExtractor};
use crate::source::verification::verify_archive;
use crate::strategy::{EntryPoint, InstallStrategy, ProvisionRequest, SourceTree};
use camino::Utf8PathBuf;
use log::debug;
use shellgpt_formula::PackageDescriptor;
use std::io::Write;
use std::path::Path;

/// File name the archive is fetched to inside the working directory.
const ARCHIVE_FILE: &str = "source.tar.gz";

/// Directory the archive is unpacked into inside the working directory.
const UNPACK_DIR: &str = "src";

/// Context for an install run.
#[derive(Debug, Clone, Copy)]
pub struct InstallContext<'a> {
    /// Formula being installed.
    pub descriptor: &'a PackageDescriptor,
    /// Destination directories.
    pub layout: &'a TargetLayout,
    /// Permit the strategy that installs into the host interpreter.
    pub allow_global: bool,
    /// Skip the post-install `--help` check.
    pub skip_test: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

/// Side-effecting collaborators of the pipeline.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Retrieves the release archive.
    pub fetcher: &'a dyn SourceFetcher,
    /// Unpacks the release archive.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Runs interpreter, pip and smoke test commands.
    pub executor: &'a dyn CommandExecutor,
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The placed entry point.
    pub entry_point: EntryPoint,
    /// Whether the `--help` check ran.
    pub smoke_tested: bool,
}

/// Installs `context.descriptor` with the production fetcher, extractor and
/// command executor.
///
/// # Errors
///
/// Returns the error of the first step that fails.
pub fn install(context: &InstallContext<'_>, stderr: &mut dyn Write) -> Result<InstallOutcome> {
    let collaborators = Collaborators {
        fetcher: &UrlFetcher,
        extractor: &TarGzExtractor,
        executor: &SystemCommandExecutor,
    };
    install_with(context, &collaborators, stderr)
}

/// Installs `context.descriptor` using the supplied collaborators.
///
/// The strategy is selected before anything is fetched, so a refused global
/// install performs no work at all.
///
/// # Errors
///
/// Returns the error of the first step that fails. Files placed by earlier
/// steps stay on disk.
pub fn install_with(
    context: &InstallContext<'_>,
    collaborators: &Collaborators<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallOutcome> {
    let descriptor = context.descriptor;
    let strategy = InstallStrategy::for_descriptor(descriptor, context.allow_global)?;

    let workdir = tempfile::Builder::new()
        .prefix(&format!("{}-", descriptor.name()))
        .tempdir()?;
    debug!("working directory {}", workdir.path().display());

    progress(context, stderr, format!("Fetching {}...", descriptor.url()));
    let source = fetch_verified_source(descriptor, collaborators, workdir.path())?;
    progress(
        context,
        stderr,
        format!("Verified sha256 {}", descriptor.sha256()),
    );

    progress(
        context,
        stderr,
        format!(
            "Installing {} {} with the {} strategy...",
            descriptor.name(),
            descriptor.version().tag(),
            strategy.kind()
        ),
    );
    let request = ProvisionRequest::for_descriptor(descriptor, context.layout);
    let entry_point = strategy.provision(&source, &request, collaborators.executor)?;

    let smoke_tested = !context.skip_test;
    if smoke_tested {
        progress(
            context,
            stderr,
            format!("Running {} --help...", entry_point.path()),
        );
        run_smoke_test(collaborators.executor, entry_point.path())?;
    }

    Ok(InstallOutcome {
        entry_point,
        smoke_tested,
    })
}

/// Fetches, verifies and unpacks the release archive into `workdir`.
///
/// The digest is checked before the archive is opened.
///
/// # Errors
///
/// Returns [`InstallerError::Fetch`], [`InstallerError::ChecksumMismatch`]
/// or [`InstallerError::Extraction`] for the failing step.
pub fn fetch_verified_source(
    descriptor: &PackageDescriptor,
    collaborators: &Collaborators<'_>,
    workdir: &Path,
) -> Result<SourceTree> {
    let url = descriptor.url();
    let archive = workdir.join(ARCHIVE_FILE);
    collaborators
        .fetcher
        .fetch(url, &archive)
        .map_err(|e| InstallerError::Fetch {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

    verify_archive(&archive, descriptor.sha256(), url)?;

    let unpack_dir = workdir.join(UNPACK_DIR);
    std::fs::create_dir_all(&unpack_dir)?;
    let root = collaborators
        .extractor
        .extract(&archive, &unpack_dir)
        .map_err(|e| InstallerError::Extraction {
            reason: e.to_string(),
        })?;
    let root = Utf8PathBuf::try_from(root).map_err(|e| InstallerError::Extraction {
        reason: format!("source root is not valid UTF-8: {}", e.as_path().display()),
    })?;
    Ok(SourceTree::new(root))
}

/// Smoke tests an existing install of `package`.
///
/// # Errors
///
/// Returns [`InstallerError::NotInstalled`] when no entry point exists, or
/// [`InstallerError::SmokeTest`] when it exits non-zero.
pub fn test_installed(
    executor: &dyn CommandExecutor,
    layout: &TargetLayout,
    package: &str,
) -> Result<Utf8PathBuf> {
    let entry_point = layout.entry_point(package);
    if !entry_point.is_file() {
        return Err(InstallerError::NotInstalled { path: entry_point });
    }
    run_smoke_test(executor, &entry_point)?;
    Ok(entry_point)
}

fn progress(context: &InstallContext<'_>, stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if !context.quiet {
        write_stderr_line(stderr, message);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
