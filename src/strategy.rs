//! Installation strategy tags.
//!
//! The formula selects how the runtime dependency is satisfied. The installer
//! crate gives each tag its behaviour; this module only names them.

use crate::error::FormulaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the script's Python dependencies are provided on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Copy the script straight to the binary directory and rely on the
    /// host interpreter already having the dependencies.
    Direct,
    /// Install the dependencies into the ambient interpreter, then copy the
    /// script. Mutates global interpreter state.
    Global,
    /// Build a private virtual environment and front it with a launcher.
    #[default]
    Venv,
}

impl StrategyKind {
    /// Every strategy, in declaration order.
    pub const ALL: [Self; 3] = [Self::Direct, Self::Global, Self::Venv];

    /// Return the configuration name of the strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Global => "global",
            Self::Venv => "venv",
        }
    }

    /// Return whether the strategy writes outside the install prefix.
    #[must_use]
    pub const fn mutates_host(self) -> bool {
        matches!(self, Self::Global)
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = FormulaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormulaError::UnknownStrategy {
                value: s.to_owned(),
            })
    }
}
