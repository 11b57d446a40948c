//! Private virtual environment provisioning.
//!
//! The environment is rooted at the package's `libexec` directory and is
//! created by the host interpreter's `venv` module. Commands that touch the
//! environment run with `PYTHONPATH` led by the environment's
//! `site-packages`, matching the pinned runtime's version.

use crate::deps::{CommandExecutor, ensure_success};
use crate::error::{InstallerError, Result};
use crate::layout::TargetLayout;
use camino::Utf8Path;
use log::debug;
use shellgpt_formula::RuntimeDependency;
use std::ffi::OsStr;
use std::path::PathBuf;

/// Variable prepended with the environment's `site-packages`.
pub const PYTHONPATH: &str = "PYTHONPATH";

/// Creates the virtual environment at the layout's `libexec` directory.
///
/// Re-running over an existing environment is allowed; `venv` refreshes it
/// in place.
///
/// # Errors
///
/// Returns [`InstallerError::EnvironmentCreation`] when the interpreter
/// exits non-zero, and [`InstallerError::Io`] when it cannot be started.
pub fn create_environment(
    executor: &dyn CommandExecutor,
    python: &str,
    layout: &TargetLayout,
    env: &[(&str, &str)],
) -> Result<()> {
    let root = layout.libexec_dir();
    debug!("creating virtual environment at {root}");
    let output = executor.run_with_env(python, &["-m", "venv", root.as_str()], env)?;
    ensure_success(&output).map_err(|message| InstallerError::EnvironmentCreation {
        path: root.to_owned(),
        message,
    })
}

/// Computes the `PYTHONPATH` value for environment commands.
///
/// Creates the environment's `site-packages` directory and places it ahead
/// of any inherited `PYTHONPATH`. Returns `None` when the runtime dependency
/// does not pin a Python version, since the directory name is then unknown.
///
/// # Errors
///
/// Returns [`InstallerError::Io`] if the directory cannot be created, or
/// [`InstallerError::EnvironmentCreation`] if the joined value is not
/// representable.
pub fn python_path(
    layout: &TargetLayout,
    runtime: &RuntimeDependency,
    inherited: Option<&OsStr>,
) -> Result<Option<String>> {
    let Some(version) = runtime.python_version() else {
        return Ok(None);
    };
    let site_packages = layout.site_packages(version);
    std::fs::create_dir_all(&site_packages)?;
    prepend_path(&site_packages, inherited, layout).map(Some)
}

fn prepend_path(
    first: &Utf8Path,
    inherited: Option<&OsStr>,
    layout: &TargetLayout,
) -> Result<String> {
    let mut entries = vec![first.as_std_path().to_path_buf()];
    if let Some(existing) = inherited.filter(|value| !value.is_empty()) {
        entries.extend(std::env::split_paths(existing));
    }
    dedup_preserving_order(&mut entries);

    let joined = std::env::join_paths(entries).map_err(|e| InstallerError::EnvironmentCreation {
        path: layout.libexec_dir().to_owned(),
        message: format!("cannot build {PYTHONPATH}: {e}"),
    })?;
    joined
        .into_string()
        .map_err(|value| InstallerError::EnvironmentCreation {
            path: layout.libexec_dir().to_owned(),
            message: format!("{PYTHONPATH} is not valid UTF-8: {}", value.to_string_lossy()),
        })
}

fn dedup_preserving_order(entries: &mut Vec<PathBuf>) {
    let mut seen = Vec::with_capacity(entries.len());
    entries.retain(|entry| {
        if seen.contains(entry) {
            false
        } else {
            seen.push(entry.clone());
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
    use camino::Utf8PathBuf;

    fn temp_layout() -> (tempfile::TempDir, TargetLayout) {
        let temp = tempfile::tempdir().expect("temp dir");
        let prefix = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 temp dir");
        (temp, TargetLayout::from_prefix(&prefix))
    }

    #[test]
    fn create_environment_invokes_venv_module() {
        let layout = TargetLayout::from_prefix(Utf8Path::new("/opt/shellgpt"));
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "python3",
            &["-m", "venv", "/opt/shellgpt/libexec"],
            Ok(success_output()),
        )]);

        create_environment(&executor, "python3", &layout, &[]).expect("venv created");

        executor.assert_finished();
    }

    #[test]
    fn create_environment_reports_interpreter_error() {
        let layout = TargetLayout::from_prefix(Utf8Path::new("/opt/shellgpt"));
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "python3",
            &["-m", "venv", "/opt/shellgpt/libexec"],
            Ok(failure_output("Error: ensurepip is not available\n")),
        )]);

        let err = create_environment(&executor, "python3", &layout, &[]).expect_err("venv fails");

        match err {
            InstallerError::EnvironmentCreation { path, message } => {
                assert_eq!(path.as_str(), "/opt/shellgpt/libexec");
                assert_eq!(message, "Error: ensurepip is not available");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn python_path_creates_site_packages_first() {
        let (_temp, layout) = temp_layout();
        let runtime = RuntimeDependency::new("python@3.10");

        let value = python_path(&layout, &runtime, None)
            .expect("python path")
            .expect("pinned runtime");

        let site = layout.site_packages("3.10");
        assert_eq!(value, site.as_str());
        assert!(site.is_dir());
    }

    #[test]
    fn python_path_keeps_inherited_entries_after_site_packages() {
        let (_temp, layout) = temp_layout();
        let runtime = RuntimeDependency::new("python@3.10");
        let inherited = std::env::join_paths(["/usr/lib/extra", "/opt/more"]).expect("join");

        let value = python_path(&layout, &runtime, Some(inherited.as_os_str()))
            .expect("python path")
            .expect("pinned runtime");

        let entries: Vec<PathBuf> = std::env::split_paths(&value).collect();
        assert_eq!(
            entries,
            vec![
                layout.site_packages("3.10").into_std_path_buf(),
                PathBuf::from("/usr/lib/extra"),
                PathBuf::from("/opt/more"),
            ]
        );
    }

    #[test]
    fn python_path_is_skipped_for_unpinned_runtime() {
        let (_temp, layout) = temp_layout();
        let runtime = RuntimeDependency::new("python");

        assert_eq!(python_path(&layout, &runtime, None).expect("ok"), None);
        assert!(!layout.libexec_dir().exists());
    }
}
