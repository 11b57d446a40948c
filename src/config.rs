//! Formula file loader.
//!
//! A formula file is a TOML document overriding parts of the built-in
//! `shellgpt` descriptor, typically to pin another release together with its
//! digest. Every key is optional; unknown keys are rejected so that a typo
//! cannot silently fall back to a built-in value.

use crate::descriptor::{DescriptorOverrides, PackageDescriptor, RuntimeDependency};
use crate::error::{FormulaError, Result};
use crate::sha256_digest::Sha256Digest;
use crate::strategy::StrategyKind;
use crate::version::VersionTag;
use camino::Utf8Path;
use log::debug;
use serde::Deserialize;

/// Raw contents of a formula file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FormulaConfig {
    /// Package name, which also names the installed entry point.
    pub name: Option<String>,
    /// Human description shown by `info`.
    pub desc: Option<String>,
    /// Project homepage. The archive URL is derived from it unless `url`
    /// is given.
    pub homepage: Option<String>,
    /// Release version, with or without the `v` prefix.
    pub version: Option<VersionTag>,
    /// Digest of the release archive. Required whenever `version` is set.
    pub sha256: Option<Sha256Digest>,
    /// Explicit archive location; accepts `https://`, `file://` or a path.
    pub url: Option<String>,
    /// License identifier.
    pub license: Option<String>,
    /// Runtime dependency, for example `python@3.10`.
    pub depends_on: Option<String>,
    /// Host interpreter command.
    pub python: Option<String>,
    /// Packages installed for the script.
    pub pip_packages: Option<Vec<String>>,
    /// Installation strategy: `direct`, `global` or `venv`.
    pub strategy: Option<StrategyKind>,
    /// Script file name inside the archive.
    pub script: Option<String>,
}

impl FormulaConfig {
    /// Parses a formula document.
    ///
    /// `origin` only labels error messages.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Parse`] when the document is not valid TOML,
    /// carries unknown keys, or holds an invalid digest, version or strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use shellgpt_formula::config::FormulaConfig;
    ///
    /// let source = "strategy = \"direct\"";
    /// let config = FormulaConfig::from_toml_str(source, Utf8Path::new("inline"))?;
    /// assert!(config.version.is_none());
    /// # Ok::<(), shellgpt_formula::error::FormulaError>(())
    /// ```
    pub fn from_toml_str(source: &str, origin: &Utf8Path) -> Result<Self> {
        toml::from_str(source).map_err(|e| FormulaError::Parse {
            path: origin.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Reads and parses the formula file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::Read`] when the file cannot be read and
    /// [`FormulaError::Parse`] when its contents are rejected.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        Self::load_with(path, |p| std::fs::read_to_string(p))
    }

    /// Reads the formula through the supplied reader.
    ///
    /// Exists so tests can feed documents without touching the file system.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with<F>(path: &Utf8Path, read: F) -> Result<Self>
    where
        F: FnOnce(&Utf8Path) -> std::io::Result<String>,
    {
        debug!("loading formula from {path}");
        let source = read(path).map_err(|e| FormulaError::Read {
            path: path.to_owned(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Resolves the file against the built-in descriptor.
    ///
    /// # Errors
    ///
    /// Propagates validation failures from
    /// [`PackageDescriptor::from_overrides`].
    pub fn into_descriptor(self) -> Result<PackageDescriptor> {
        PackageDescriptor::from_overrides(DescriptorOverrides {
            name: self.name,
            desc: self.desc,
            homepage: self.homepage,
            version: self.version,
            sha256: self.sha256,
            url: self.url,
            license: self.license,
            depends_on: self.depends_on.map(RuntimeDependency::new),
            python: self.python,
            pip_packages: self.pip_packages,
            strategy: self.strategy,
            script: self.script,
        })
    }
}
