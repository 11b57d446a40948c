//! Release version tags.
//!
//! Archives are published under tags of the form `v<version>`. The tag is
//! accepted with or without the leading `v` and stored without it.

use crate::error::{FormulaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated release version such as `1.2.0`.
///
/// # Examples
///
/// ```
/// use shellgpt_formula::version::VersionTag;
///
/// let tag = VersionTag::try_from("v1.2.0").unwrap();
/// assert_eq!(tag.as_str(), "1.2.0");
/// assert_eq!(tag.tag(), "v1.2.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionTag(String);

impl VersionTag {
    /// Return the bare version without the `v` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the git tag name, which carries the `v` prefix.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.0)
    }
}

impl TryFrom<&str> for VersionTag {
    type Error = FormulaError;

    fn try_from(value: &str) -> Result<Self> {
        let bare = value.strip_prefix('v').unwrap_or(value);
        validate_version(value, bare)?;
        Ok(Self(bare.to_owned()))
    }
}

impl TryFrom<String> for VersionTag {
    type Error = FormulaError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl From<VersionTag> for String {
    fn from(version: VersionTag) -> Self {
        version.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_version(original: &str, bare: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(FormulaError::InvalidVersion {
            value: original.to_owned(),
            reason: reason.to_owned(),
        })
    };

    if bare.is_empty() {
        return reject("version must not be empty");
    }
    if !bare.starts_with(|c: char| c.is_ascii_digit()) {
        return reject("version must start with a digit");
    }
    if let Some(bad) = bare
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')))
    {
        return reject(&format!("unexpected character '{bad}'"));
    }
    Ok(())
}
