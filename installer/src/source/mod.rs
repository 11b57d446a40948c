//! Source archive retrieval, integrity verification, and unpacking.
//!
//! # Sub-modules
//!
//! - [`download`] - `SourceFetcher` trait with HTTP and local-file support.
//! - [`verification`] - SHA-256 computation and digest comparison.
//! - [`extraction`] - `.tar.gz` unpacking with path traversal protection.

pub mod download;
pub mod extraction;
pub mod verification;
