//! Formula descriptors for installing ShellGPT.
//!
//! The formula is published metadata: where each release archive lives, the
//! digest it must match, the runtime it needs, and which installation
//! strategy provides that runtime. The `shellgpt-installer` crate consumes
//! these descriptors.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod sha256_digest;
pub mod strategy;
pub mod version;

pub use config::FormulaConfig;
pub use descriptor::{PackageDescriptor, RuntimeDependency};
pub use error::FormulaError;
pub use sha256_digest::Sha256Digest;
pub use strategy::StrategyKind;
pub use version::VersionTag;
