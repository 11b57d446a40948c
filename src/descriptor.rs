//! Package descriptors.
//!
//! A descriptor is the published metadata of one formula version: where the
//! source archive lives, the digest it must match, and what the install needs
//! from the host. Descriptors are values; moving to another release produces
//! a new descriptor rather than mutating an existing one.

use crate::error::{FormulaError, Result};
use crate::sha256_digest::Sha256Digest;
use crate::strategy::StrategyKind;
use crate::version::VersionTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package name of the published formula.
pub const PACKAGE_NAME: &str = "shellgpt";

/// Release the built-in descriptor points at.
const DEFAULT_VERSION: &str = "1.2.0";

/// Digest of the `v1.2.0` source archive.
const DEFAULT_SHA256: &str = "714b48c1496b3858e38fe27bcea314dab3358882c29fbeee44e601d2ca233f4b";

const DEFAULT_DESC: &str = "ShellGPT: Interact with OpenAI from the shell";
const DEFAULT_HOMEPAGE: &str = "https://github.com/adborroto/homebrew-shellgpt";
const DEFAULT_LICENSE: &str = "MIT";
const DEFAULT_RUNTIME: &str = "python@3.10";
const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_SCRIPT: &str = "shellgpt.py";
const DEFAULT_PIP_PACKAGE: &str = "openai";

/// A runtime dependency supplied by the host, such as `python@3.10`.
///
/// # Examples
///
/// ```
/// use shellgpt_formula::descriptor::RuntimeDependency;
///
/// let dep = RuntimeDependency::new("python@3.10");
/// assert_eq!(dep.python_version(), Some("3.10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuntimeDependency(String);

impl RuntimeDependency {
    /// Wrap a dependency name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Return the dependency name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the pinned Python version when the dependency is a
    /// `python@<version>` formula.
    #[must_use]
    pub fn python_version(&self) -> Option<&str> {
        self.0
            .strip_prefix("python@")
            .filter(|version| !version.is_empty())
    }
}

impl fmt::Display for RuntimeDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Published metadata for one formula version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageDescriptor {
    name: String,
    desc: String,
    homepage: String,
    version: VersionTag,
    url: String,
    sha256: Sha256Digest,
    license: String,
    depends_on: RuntimeDependency,
    python: String,
    pip_packages: Vec<String>,
    strategy: StrategyKind,
    script: String,
}

/// Optional overrides applied on top of the built-in descriptor.
///
/// Mirrors the keys accepted in a formula file; every field left as `None`
/// keeps the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorOverrides {
    /// Package name, which also names the entry point.
    pub name: Option<String>,
    /// Human description.
    pub desc: Option<String>,
    /// Project homepage, also the repository the archive URL derives from.
    pub homepage: Option<String>,
    /// Release version.
    pub version: Option<VersionTag>,
    /// Expected digest of the release archive.
    pub sha256: Option<Sha256Digest>,
    /// Explicit archive URL, bypassing derivation from the homepage.
    pub url: Option<String>,
    /// License identifier.
    pub license: Option<String>,
    /// Runtime dependency name.
    pub depends_on: Option<RuntimeDependency>,
    /// Host interpreter command.
    pub python: Option<String>,
    /// Packages installed for the script.
    pub pip_packages: Option<Vec<String>>,
    /// Installation strategy.
    pub strategy: Option<StrategyKind>,
    /// Script file name inside the source archive.
    pub script: Option<String>,
}

impl PackageDescriptor {
    /// Return the built-in `shellgpt` descriptor.
    ///
    /// # Errors
    ///
    /// Never fails for the compiled-in values; the `Result` carries the
    /// validation performed on every descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use shellgpt_formula::descriptor::PackageDescriptor;
    ///
    /// let formula = PackageDescriptor::shellgpt()?;
    /// assert_eq!(formula.name(), "shellgpt");
    /// assert!(formula.url().ends_with("/archive/v1.2.0.tar.gz"));
    /// # Ok::<(), shellgpt_formula::error::FormulaError>(())
    /// ```
    pub fn shellgpt() -> Result<Self> {
        let version = VersionTag::try_from(DEFAULT_VERSION)?;
        Ok(Self {
            name: PACKAGE_NAME.to_owned(),
            desc: DEFAULT_DESC.to_owned(),
            homepage: DEFAULT_HOMEPAGE.to_owned(),
            url: archive_url(DEFAULT_HOMEPAGE, &version),
            version,
            sha256: Sha256Digest::try_from(DEFAULT_SHA256)?,
            license: DEFAULT_LICENSE.to_owned(),
            depends_on: RuntimeDependency::new(DEFAULT_RUNTIME),
            python: DEFAULT_PYTHON.to_owned(),
            pip_packages: vec![DEFAULT_PIP_PACKAGE.to_owned()],
            strategy: StrategyKind::default(),
            script: DEFAULT_SCRIPT.to_owned(),
        })
    }

    /// Apply overrides to the built-in descriptor.
    ///
    /// A new version must come with its own digest: overriding one without
    /// the other is rejected because the built-in digest only matches the
    /// built-in archive.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::IncompleteRelease`] for a half-specified
    /// release, [`FormulaError::EmptyField`] for blank values and
    /// [`FormulaError::InvalidFileName`] when `name` or `script` is a path.
    pub fn from_overrides(overrides: DescriptorOverrides) -> Result<Self> {
        let base = Self::shellgpt()?;
        let DescriptorOverrides {
            name,
            desc,
            homepage,
            version,
            sha256,
            url,
            license,
            depends_on,
            python,
            pip_packages,
            strategy,
            script,
        } = overrides;

        let (next_version, next_sha256) = match (version, sha256) {
            (None, None) => (base.version, base.sha256),
            (Some(v), Some(digest)) => (v, digest),
            _ => return Err(FormulaError::IncompleteRelease),
        };
        let next_homepage = homepage.unwrap_or(base.homepage);
        let next_url = url.unwrap_or_else(|| archive_url(&next_homepage, &next_version));

        let descriptor = Self {
            name: name.unwrap_or(base.name),
            desc: desc.unwrap_or(base.desc),
            homepage: next_homepage,
            version: next_version,
            url: next_url,
            sha256: next_sha256,
            license: license.unwrap_or(base.license),
            depends_on: depends_on.unwrap_or(base.depends_on),
            python: python.unwrap_or(base.python),
            pip_packages: pip_packages.unwrap_or(base.pip_packages),
            strategy: strategy.unwrap_or(base.strategy),
            script: script.unwrap_or(base.script),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Return a descriptor for another release of the same package.
    ///
    /// The archive URL is re-derived from the homepage.
    ///
    /// # Errors
    ///
    /// Returns [`FormulaError::PinnedUrl`] when the descriptor downloads from
    /// an explicit URL rather than the homepage's release archive.
    pub fn with_release(&self, version: VersionTag, sha256: Sha256Digest) -> Result<Self> {
        if self.url != archive_url(&self.homepage, &self.version) {
            return Err(FormulaError::PinnedUrl {
                url: self.url.clone(),
            });
        }
        Ok(Self {
            url: archive_url(&self.homepage, &version),
            version,
            sha256,
            ..self.clone()
        })
    }

    /// Return a copy using a different installation strategy.
    #[must_use]
    pub fn with_strategy(&self, strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..self.clone()
        }
    }

    /// Return a copy using a different host interpreter command.
    #[must_use]
    pub fn with_python(&self, python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
            ..self.clone()
        }
    }

    /// Package name; also the entry point file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human description.
    #[must_use]
    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// Project homepage.
    #[must_use]
    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    /// Release version.
    #[must_use]
    pub const fn version(&self) -> &VersionTag {
        &self.version
    }

    /// Source archive URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Expected archive digest.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// License identifier.
    #[must_use]
    pub fn license(&self) -> &str {
        &self.license
    }

    /// Declared runtime dependency.
    #[must_use]
    pub const fn depends_on(&self) -> &RuntimeDependency {
        &self.depends_on
    }

    /// Host interpreter command used to create environments.
    #[must_use]
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Packages the script needs at runtime.
    #[must_use]
    pub fn pip_packages(&self) -> &[String] {
        &self.pip_packages
    }

    /// Selected installation strategy.
    #[must_use]
    pub const fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// Script file name inside the source tree.
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("name", self.name.as_str()),
            ("homepage", self.homepage.as_str()),
            ("url", self.url.as_str()),
            ("python", self.python.as_str()),
            ("script", self.script.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(FormulaError::EmptyField { field });
            }
        }
        if self.pip_packages.iter().any(|pkg| pkg.trim().is_empty()) {
            return Err(FormulaError::EmptyField {
                field: "pip_packages",
            });
        }
        for (field, value) in [("name", &self.name), ("script", &self.script)] {
            if !is_plain_file_name(value) {
                return Err(FormulaError::InvalidFileName {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// `name` and `script` are joined onto install directories, so each must
/// stay a single path component.
fn is_plain_file_name(value: &str) -> bool {
    value != "."
        && !value.contains("..")
        && !value.contains(['/', '\\', '\0'])
}

/// Build the release archive URL for a repository and version.
///
/// # Examples
///
/// ```
/// use shellgpt_formula::descriptor::archive_url;
/// use shellgpt_formula::version::VersionTag;
///
/// let version = VersionTag::try_from("1.2.1").unwrap();
/// assert_eq!(
///     archive_url("https://github.com/adborroto/homebrew-shellgpt/", &version),
///     "https://github.com/adborroto/homebrew-shellgpt/archive/v1.2.1.tar.gz",
/// );
/// ```
#[must_use]
pub fn archive_url(repo: &str, version: &VersionTag) -> String {
    format!(
        "{}/archive/{}.tar.gz",
        repo.trim_end_matches('/'),
        version.tag()
    )
}
