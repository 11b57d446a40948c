//! Installation strategies.
//!
//! Each strategy turns a hash-verified source tree into an executable entry
//! point in the target layout. They share [`InstallStrategy::provision`] and
//! differ only in where the script's dependencies come from.

use crate::deps::{CommandExecutor, PipTarget, install_runtime_packages, upgrade_packaging_tools};
use crate::error::{InstallerError, Result};
use crate::layout::TargetLayout;
use crate::venv::{self, PYTHONPATH};
use crate::wrapper::{copy_executable, copy_file, render_launcher, write_launcher};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use shellgpt_formula::{PackageDescriptor, RuntimeDependency, StrategyKind};

/// An unpacked source tree whose archive passed digest verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    root: Utf8PathBuf,
}

impl SourceTree {
    /// Wraps the root of a verified source tree.
    #[must_use]
    pub const fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// Root directory of the tree.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Locates `script` at the tree root.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ScriptNotFound`] when the file is missing.
    pub fn script(&self, script: &str) -> Result<Utf8PathBuf> {
        let path = self.root.join(script);
        if path.is_file() {
            Ok(path)
        } else {
            Err(InstallerError::ScriptNotFound {
                script: script.to_owned(),
                source_dir: self.root.clone(),
            })
        }
    }
}

/// The installed executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    path: Utf8PathBuf,
    strategy: StrategyKind,
}

impl EntryPoint {
    /// Describes an entry point produced by `strategy`.
    #[must_use]
    pub const fn new(path: Utf8PathBuf, strategy: StrategyKind) -> Self {
        Self { path, strategy }
    }

    /// Location of the executable.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Strategy that produced it.
    #[must_use]
    pub const fn strategy(&self) -> StrategyKind {
        self.strategy
    }
}

/// Interpreter and packages a strategy installs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonRuntime {
    python: String,
    packages: Vec<String>,
    dependency: RuntimeDependency,
}

impl PythonRuntime {
    fn from_descriptor(descriptor: &PackageDescriptor) -> Self {
        Self {
            python: descriptor.python().to_owned(),
            packages: descriptor.pip_packages().to_vec(),
            dependency: descriptor.depends_on().clone(),
        }
    }
}

/// How the entry point and its dependencies are placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStrategy {
    /// Copy the script and rely on the host interpreter.
    Direct,
    /// Install packages into the host interpreter, then copy the script.
    Global(PythonRuntime),
    /// Build a private environment under `libexec` and front it with a
    /// launcher.
    Venv(PythonRuntime),
}

/// What a strategy places, and where.
#[derive(Debug, Clone, Copy)]
pub struct ProvisionRequest<'a> {
    /// Name of the entry point in the binary directory.
    pub package: &'a str,
    /// File name of the script inside the source tree.
    pub script: &'a str,
    /// Destination directories.
    pub layout: &'a TargetLayout,
}

impl<'a> ProvisionRequest<'a> {
    /// Builds a request for `descriptor` installed into `layout`.
    #[must_use]
    pub fn for_descriptor(descriptor: &'a PackageDescriptor, layout: &'a TargetLayout) -> Self {
        Self {
            package: descriptor.name(),
            script: descriptor.script(),
            layout,
        }
    }
}

impl InstallStrategy {
    /// Selects the strategy named by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::GlobalInstallRefused`] when the descriptor
    /// selects the global strategy and `allow_global` is false.
    pub fn for_descriptor(descriptor: &PackageDescriptor, allow_global: bool) -> Result<Self> {
        let kind = descriptor.strategy();
        if kind.mutates_host() && !allow_global {
            return Err(InstallerError::GlobalInstallRefused);
        }
        match kind {
            StrategyKind::Direct => Ok(Self::Direct),
            StrategyKind::Global => Ok(Self::Global(PythonRuntime::from_descriptor(descriptor))),
            StrategyKind::Venv => Ok(Self::Venv(PythonRuntime::from_descriptor(descriptor))),
        }
    }

    /// Tag of this strategy.
    #[must_use]
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::Direct => StrategyKind::Direct,
            Self::Global(_) => StrategyKind::Global,
            Self::Venv(_) => StrategyKind::Venv,
        }
    }

    /// Places the entry point for `request` from `source`.
    ///
    /// Steps run in order and stop at the first failure; files written by
    /// earlier steps are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ScriptNotFound`] when the source tree lacks
    /// the script, and the step's error when a command or file operation
    /// fails.
    pub fn provision(
        &self,
        source: &SourceTree,
        request: &ProvisionRequest<'_>,
        executor: &dyn CommandExecutor,
    ) -> Result<EntryPoint> {
        let script = source.script(request.script)?;
        let entry_point = request.layout.entry_point(request.package);
        debug!("provisioning {entry_point} with the {} strategy", self.kind());

        match self {
            Self::Direct => {}
            Self::Global(runtime) => install_into_host(runtime, executor)?,
            Self::Venv(runtime) => {
                install_into_environment(runtime, request.layout, executor)?;
                let private_script = request.layout.private_script(request.script);
                copy_file(script.as_std_path(), &private_script)?;
                let launcher = render_launcher(&request.layout.venv_python(), &private_script);
                write_launcher(&entry_point, &launcher)?;
                return Ok(EntryPoint::new(entry_point, self.kind()));
            }
        }

        copy_executable(script.as_std_path(), &entry_point)?;
        Ok(EntryPoint::new(entry_point, self.kind()))
    }
}

fn install_into_host(runtime: &PythonRuntime, executor: &dyn CommandExecutor) -> Result<()> {
    let target = PipTarget::host(&runtime.python);
    upgrade_packaging_tools(executor, &target, &[])?;
    install_runtime_packages(executor, &target, &runtime.packages, &[])
}

fn install_into_environment(
    runtime: &PythonRuntime,
    layout: &TargetLayout,
    executor: &dyn CommandExecutor,
) -> Result<()> {
    let inherited = std::env::var_os(PYTHONPATH);
    let python_path = venv::python_path(layout, &runtime.dependency, inherited.as_deref())?;
    let env: Vec<(&str, &str)> = python_path
        .as_deref()
        .map(|value| vec![(PYTHONPATH, value)])
        .unwrap_or_default();

    venv::create_environment(executor, &runtime.python, layout, &env)?;
    let target = PipTarget::environment(&layout.venv_pip());
    upgrade_packaging_tools(executor, &target, &env)?;
    install_runtime_packages(executor, &target, &runtime.packages, &env)
}

#[cfg(test)]
#[path = "strategy_tests.rs"]
mod tests;
