//! Error types for the ShellGPT installer CLI.
//!
//! Every install step is fatal on failure. The variants below carry enough
//! context (paths, URLs, the failing command's stderr) for the message to be
//! actionable without a backtrace.

use camino::Utf8PathBuf;
use shellgpt_formula::FormulaError;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The formula descriptor or formula file is invalid.
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// The source archive could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch {
        /// The archive location that was requested.
        url: String,
        /// Description of the transport or file failure.
        reason: String,
    },

    /// The fetched archive does not match the formula digest.
    #[error("checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The archive location.
        url: String,
        /// Digest recorded in the formula.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// The archive could not be unpacked.
    #[error("failed to extract source archive: {reason}")]
    Extraction {
        /// Description of the extraction failure.
        reason: String,
    },

    /// The unpacked source tree does not contain the entry script.
    #[error("{script} not found in source tree {source_dir}")]
    ScriptNotFound {
        /// Script file name from the formula.
        script: String,
        /// Root of the unpacked source tree.
        source_dir: Utf8PathBuf,
    },

    /// Creating the virtual environment failed.
    #[error("failed to create virtual environment at {path}: {message}")]
    EnvironmentCreation {
        /// Environment root.
        path: Utf8PathBuf,
        /// Output of the failing command.
        message: String,
    },

    /// Installing a Python package failed.
    #[error("failed to install {package}: {message}")]
    DependencyInstall {
        /// Package (or package list) being installed.
        package: String,
        /// Output of the failing command.
        message: String,
    },

    /// Placing the entry point or launcher failed.
    #[error("entry point generation failed: {0}")]
    EntryPoint(String),

    /// The installed entry point did not exit zero for `--help`.
    #[error("smoke test failed: {entry_point} --help exited with {status}{detail}")]
    SmokeTest {
        /// Path of the entry point that was run.
        entry_point: Utf8PathBuf,
        /// Exit status description.
        status: String,
        /// Trailing stderr, prefixed with `: ` when present.
        detail: String,
    },

    /// The global strategy was selected without opting in.
    #[error(
        "the global strategy installs packages into the host interpreter; \
         pass --allow-global to permit it or use --strategy venv"
    )]
    GlobalInstallRefused,

    /// No install directory could be determined.
    #[error("install layout unavailable: {reason}")]
    LayoutUnavailable {
        /// Why the directory could not be resolved.
        reason: String,
    },

    /// No entry point exists at the expected location.
    #[error("{path} is not installed")]
    NotInstalled {
        /// Expected entry point path.
        path: Utf8PathBuf,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
