//! ShellGPT installer library.
//!
//! This crate fetches a ShellGPT release archive, verifies it against the
//! formula's SHA-256 digest, and places an executable `shellgpt` entry point
//! using one of three strategies. It is used by the `shellgpt-installer` CLI
//! binary and can be consumed programmatically for testing or custom
//! installation workflows.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`deps`] - Command execution and pip installation
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Error types carrying the failing step's context
//! - [`layout`] - Binary and `libexec` directory layout
//! - [`output`] - Progress, dry-run and formula formatting
//! - [`pipeline`] - Install pipeline orchestration
//! - [`resolution`] - Formula and layout resolution from CLI options
//! - [`smoke`] - Post-install `--help` check
//! - [`source`] - Archive download, verification and extraction
//! - [`strategy`] - Direct, global and virtual environment strategies
//! - [`venv`] - Private virtual environment provisioning
//! - [`wrapper`] - Launcher generation and executable placement

pub mod cli;
pub mod deps;
pub mod dirs;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod resolution;
pub mod smoke;
pub mod source;
pub mod strategy;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod venv;
pub mod wrapper;
