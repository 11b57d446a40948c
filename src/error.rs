//! Error types for formula descriptors and configuration.
//!
//! Each variant names the rejected input and the rule it broke so that the
//! installer can surface the message to users unchanged.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from invalid formula values or configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// A SHA-256 digest is not a valid 64-character hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A version tag is empty or contains characters that cannot appear in
    /// an archive URL.
    #[error("invalid version tag \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected tag.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// The strategy name is not one of the supported installation strategies.
    #[error("unknown installation strategy \"{value}\"; expected one of: direct, global, venv")]
    UnknownStrategy {
        /// The rejected strategy name.
        value: String,
    },

    /// A required descriptor field is blank.
    #[error("formula field `{field}` must not be empty")]
    EmptyField {
        /// Name of the blank field.
        field: &'static str,
    },

    /// A name that becomes a file name holds a path rather than a single
    /// component.
    #[error("formula field `{field}` must be a plain file name, got \"{value}\"")]
    InvalidFileName {
        /// Name of the rejected field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A release override was combined with an explicit archive URL, which
    /// cannot be re-derived for another tag.
    #[error("cannot override the release of a formula with a pinned url {url}")]
    PinnedUrl {
        /// The explicit archive URL.
        url: String,
    },

    /// A release override supplied a version without a digest, or the
    /// reverse.
    #[error("a release override needs both a version and a sha256 digest")]
    IncompleteRelease,

    /// The formula file could not be read.
    #[error("failed to read formula {path}: {reason}")]
    Read {
        /// Path to the formula file.
        path: Utf8PathBuf,
        /// Description of the I/O failure.
        reason: String,
    },

    /// The formula file is not valid TOML or contains unknown keys.
    #[error("invalid formula {path}: {reason}")]
    Parse {
        /// Path to the formula file.
        path: Utf8PathBuf,
        /// Parser message.
        reason: String,
    },
}

/// Result type alias using [`FormulaError`].
pub type Result<T> = std::result::Result<T, FormulaError>;
