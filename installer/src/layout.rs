//! Install target layout.
//!
//! An install touches two directories: the shared binary directory that
//! receives the entry point, and the package's private `libexec` directory
//! that holds the virtual environment and the script itself.

use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;

/// Interpreter name inside a virtual environment's `bin` directory.
const VENV_PYTHON: &str = "python3";

/// Pip executable name inside a virtual environment's `bin` directory.
const VENV_PIP: &str = "pip";

/// Where an install places its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    bin_dir: Utf8PathBuf,
    libexec_dir: Utf8PathBuf,
}

impl TargetLayout {
    /// Creates a layout from explicit directories.
    #[must_use]
    pub const fn new(bin_dir: Utf8PathBuf, libexec_dir: Utf8PathBuf) -> Self {
        Self {
            bin_dir,
            libexec_dir,
        }
    }

    /// Creates the conventional `<prefix>/bin` + `<prefix>/libexec` layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use shellgpt_installer::layout::TargetLayout;
    ///
    /// let layout = TargetLayout::from_prefix(Utf8Path::new("/opt/shellgpt"));
    /// assert_eq!(layout.bin_dir().as_str(), "/opt/shellgpt/bin");
    /// assert_eq!(layout.libexec_dir().as_str(), "/opt/shellgpt/libexec");
    /// ```
    #[must_use]
    pub fn from_prefix(prefix: &Utf8Path) -> Self {
        Self::new(prefix.join("bin"), prefix.join("libexec"))
    }

    /// Resolves the per-user default layout for `package`.
    ///
    /// The entry point goes to the user executable directory and the
    /// private files to `<data dir>/<package>/libexec`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::LayoutUnavailable`] when a directory cannot
    /// be determined or is not valid UTF-8.
    pub fn user_default(dirs: &dyn BaseDirs, package: &str) -> Result<Self> {
        let bin_dir = dirs
            .bin_dir()
            .ok_or_else(|| unavailable("could not determine user bin directory"))
            .and_then(utf8)?;
        let data_dir = dirs
            .data_dir()
            .ok_or_else(|| unavailable("could not determine user data directory"))
            .and_then(utf8)?;
        Ok(Self::new(bin_dir, data_dir.join(package).join("libexec")))
    }

    /// Anchors relative directories at the current working directory.
    ///
    /// Launchers embed these paths, so they must resolve the same way from
    /// wherever the entry point is later run.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::LayoutUnavailable`] when the working
    /// directory cannot be read or is not valid UTF-8.
    pub fn into_absolute(self) -> Result<Self> {
        Ok(Self::new(absolute(self.bin_dir)?, absolute(self.libexec_dir)?))
    }

    /// Shared binary directory.
    #[must_use]
    pub fn bin_dir(&self) -> &Utf8Path {
        &self.bin_dir
    }

    /// Private library directory.
    #[must_use]
    pub fn libexec_dir(&self) -> &Utf8Path {
        &self.libexec_dir
    }

    /// Path of the entry point for `package`.
    #[must_use]
    pub fn entry_point(&self, package: &str) -> Utf8PathBuf {
        self.bin_dir.join(package)
    }

    /// Path the script is copied to for the isolated strategy.
    #[must_use]
    pub fn private_script(&self, script: &str) -> Utf8PathBuf {
        self.libexec_dir.join(script)
    }

    /// Interpreter of the private environment.
    #[must_use]
    pub fn venv_python(&self) -> Utf8PathBuf {
        self.libexec_dir.join("bin").join(VENV_PYTHON)
    }

    /// Pip of the private environment.
    #[must_use]
    pub fn venv_pip(&self) -> Utf8PathBuf {
        self.libexec_dir.join("bin").join(VENV_PIP)
    }

    /// `site-packages` of the private environment for a Python version.
    #[must_use]
    pub fn site_packages(&self, python_version: &str) -> Utf8PathBuf {
        self.libexec_dir
            .join("lib")
            .join(format!("python{python_version}"))
            .join("site-packages")
    }
}

fn unavailable(reason: &str) -> InstallerError {
    InstallerError::LayoutUnavailable {
        reason: reason.to_owned(),
    }
}

fn absolute(path: Utf8PathBuf) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    std::path::absolute(&path)
        .map_err(|e| unavailable(&format!("failed to resolve {path}: {e}")))
        .and_then(utf8)
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| InstallerError::LayoutUnavailable {
        reason: format!("{} is not valid UTF-8", p.display()),
    })
}
