//! Directory resolution abstraction for platform-specific paths.
//!
//! Production code resolves directories through `directories-next`; tests
//! substitute the generated mock to point installs at fixed trees.

use std::path::PathBuf;

/// Source of the per-user directories an install defaults to.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Directory for user executables, usually `~/.local/bin`.
    fn bin_dir(&self) -> Option<PathBuf>;

    /// Directory for per-user application data.
    fn data_dir(&self) -> Option<PathBuf>;
}

/// Platform directories resolved from the current user's environment.
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    inner: directories_next::BaseDirs,
}

impl SystemBaseDirs {
    /// Resolves the platform directories.
    ///
    /// Returns `None` when no home directory can be determined.
    #[must_use]
    pub fn new() -> Option<Self> {
        directories_next::BaseDirs::new().map(|inner| Self { inner })
    }
}

impl BaseDirs for SystemBaseDirs {
    fn bin_dir(&self) -> Option<PathBuf> {
        // Only Linux reports an executable directory; elsewhere follow the
        // same `~/.local/bin` convention.
        Some(
            self.inner
                .executable_dir()
                .map_or_else(|| self.inner.home_dir().join(".local/bin"), PathBuf::from),
        )
    }

    fn data_dir(&self) -> Option<PathBuf> {
        Some(self.inner.data_dir().to_path_buf())
    }
}
