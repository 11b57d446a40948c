//! Command execution and Python package installation.
//!
//! Every external process the installer starts goes through
//! [`CommandExecutor`], so tests can replace the host with a stub. The pip
//! helpers here are shared by the isolated and global strategies; they differ
//! only in which interpreter's pip they drive.

use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use log::debug;
use std::process::{Command, Output};

/// Packages upgraded before the runtime dependencies are installed.
pub const PACKAGING_TOOLS: [&str; 3] = ["pip", "setuptools", "wheel"];

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with extra environment variables and returns the
    /// captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run_with_env(&self, cmd: &str, args: &[&str], env: &[(&str, &str)]) -> Result<Output>;

    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use shellgpt_installer::deps::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("python3", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), shellgpt_installer::error::InstallerError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.run_with_env(cmd, args, &[])
    }
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run_with_env(&self, cmd: &str, args: &[&str], env: &[(&str, &str)]) -> Result<Output> {
        debug!("running {cmd} {}", args.join(" "));
        Command::new(cmd)
            .args(args)
            .envs(env.iter().copied())
            .output()
            .map_err(InstallerError::from)
    }
}

/// Which interpreter's pip to drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipTarget {
    /// The `pip` executable inside a virtual environment.
    Environment {
        /// Path to `<env>/bin/pip`.
        pip: String,
    },
    /// `python -m pip` against a host interpreter.
    Host {
        /// Interpreter command, for example `python3`.
        python: String,
    },
}

impl PipTarget {
    /// Targets the pip executable of an environment.
    #[must_use]
    pub fn environment(pip: &Utf8Path) -> Self {
        Self::Environment {
            pip: pip.to_string(),
        }
    }

    /// Targets the pip module of a host interpreter.
    #[must_use]
    pub fn host(python: &str) -> Self {
        Self::Host {
            python: python.to_owned(),
        }
    }

    /// Returns the program and its leading arguments for `pip install`.
    fn install_command(&self) -> (&str, Vec<&str>) {
        match self {
            Self::Environment { pip } => (pip.as_str(), vec!["install"]),
            Self::Host { python } => (python.as_str(), vec!["-m", "pip", "install"]),
        }
    }
}

/// Upgrades pip, setuptools and wheel.
///
/// # Errors
///
/// Returns [`InstallerError::DependencyInstall`] when pip exits non-zero.
pub fn upgrade_packaging_tools(
    executor: &dyn CommandExecutor,
    target: &PipTarget,
    env: &[(&str, &str)],
) -> Result<()> {
    let mut args = vec!["--upgrade"];
    args.extend(PACKAGING_TOOLS);
    pip_install(executor, target, &args, env)
}

/// Installs the packages the script needs at runtime.
///
/// # Errors
///
/// Returns [`InstallerError::DependencyInstall`] when pip exits non-zero.
pub fn install_runtime_packages(
    executor: &dyn CommandExecutor,
    target: &PipTarget,
    packages: &[String],
    env: &[(&str, &str)],
) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }
    let args: Vec<&str> = packages.iter().map(String::as_str).collect();
    pip_install(executor, target, &args, env)
}

fn pip_install(
    executor: &dyn CommandExecutor,
    target: &PipTarget,
    packages: &[&str],
    env: &[(&str, &str)],
) -> Result<()> {
    let (program, mut args) = target.install_command();
    args.extend_from_slice(packages);

    let output = executor.run_with_env(program, &args, env)?;
    ensure_success(&output).map_err(|message| InstallerError::DependencyInstall {
        package: packages
            .iter()
            .filter(|arg| !arg.starts_with('-'))
            .copied()
            .collect::<Vec<_>>()
            .join(" "),
        message,
    })
}

/// Maps a non-zero exit status to the trimmed stderr of the process.
///
/// Falls back to the exit status when the process wrote nothing to stderr.
pub(crate) fn ensure_success(output: &Output) -> std::result::Result<(), String> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        Err(output.status.to_string())
    } else {
        Err(trimmed.to_owned())
    }
}

#[cfg(test)]
#[path = "deps_tests.rs"]
mod tests;
