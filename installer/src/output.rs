//! Output formatting for the installer CLI.
//!
//! Progress and reports go to stderr; `info` writes the formula to stdout,
//! either as aligned text or as JSON.

use crate::error::{InstallerError, Result};
use crate::layout::TargetLayout;
use crate::strategy::EntryPoint;
use camino::Utf8Path;
use shellgpt_formula::{PackageDescriptor, StrategyKind};
use std::io::Write;

/// Writes `message` and a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Format a success message after installation.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use shellgpt_formula::StrategyKind;
/// use shellgpt_installer::output::success_message;
/// use shellgpt_installer::strategy::EntryPoint;
///
/// let entry = EntryPoint::new(Utf8PathBuf::from("/opt/bin/shellgpt"), StrategyKind::Venv);
/// assert_eq!(
///     success_message("shellgpt", "v1.2.0", &entry),
///     "Successfully installed shellgpt v1.2.0 to /opt/bin/shellgpt (venv)",
/// );
/// ```
#[must_use]
pub fn success_message(package: &str, version: &str, entry_point: &EntryPoint) -> String {
    format!(
        "Successfully installed {package} {version} to {} ({})",
        entry_point.path(),
        entry_point.strategy()
    )
}

/// Configuration information for dry-run output.
#[derive(Debug)]
pub struct DryRunInfo<'a> {
    /// Formula that would be installed.
    pub descriptor: &'a PackageDescriptor,
    /// Destination directories.
    pub layout: &'a TargetLayout,
    /// Whether the smoke test would be skipped.
    pub skip_test: bool,
}

impl DryRunInfo<'_> {
    /// Format the dry-run information for display.
    #[must_use]
    pub fn display_text(&self) -> String {
        let descriptor = self.descriptor;
        let strategy = descriptor.strategy();
        let entry_point = self.layout.entry_point(descriptor.name());
        let mut lines = vec![
            "Dry run - no files will be modified".to_owned(),
            String::new(),
            format!("Package: {} {}", descriptor.name(), descriptor.version().tag()),
            format!("Archive: {}", descriptor.url()),
            format!("SHA-256: {}", descriptor.sha256()),
            format!("Strategy: {strategy}"),
            format!("Entry point: {entry_point}"),
        ];

        lines.push(String::new());
        lines.push("Steps:".to_owned());
        for step in planned_steps(descriptor, self.layout) {
            lines.push(format!("  - {step}"));
        }
        if !self.skip_test {
            lines.push(format!("  - run {entry_point} --help"));
        }

        lines.join("\n")
    }
}

fn planned_steps(descriptor: &PackageDescriptor, layout: &TargetLayout) -> Vec<String> {
    let python = descriptor.python();
    let packages = descriptor.pip_packages().join(" ");
    let script = descriptor.script();
    let entry_point = layout.entry_point(descriptor.name());
    let mut steps = vec![format!("fetch and verify {}", descriptor.url())];
    match descriptor.strategy() {
        StrategyKind::Direct => {}
        StrategyKind::Global => {
            steps.push(format!(
                "{python} -m pip install --upgrade pip setuptools wheel"
            ));
            steps.push(format!("{python} -m pip install {packages}"));
        }
        StrategyKind::Venv => {
            let libexec = layout.libexec_dir();
            let pip = layout.venv_pip();
            steps.push(format!("{python} -m venv {libexec}"));
            steps.push(format!("{pip} install --upgrade pip setuptools wheel"));
            steps.push(format!("{pip} install {packages}"));
            steps.push(format!("copy {script} to {}", layout.private_script(script)));
            steps.push(format!("write launcher {entry_point}"));
            return steps;
        }
    }
    steps.push(format!("copy {script} to {entry_point}"));
    steps
}

/// Formats the formula as aligned `key: value` lines.
#[must_use]
pub fn descriptor_text(descriptor: &PackageDescriptor) -> String {
    let rows = [
        ("name", descriptor.name().to_owned()),
        ("desc", descriptor.desc().to_owned()),
        ("homepage", descriptor.homepage().to_owned()),
        ("version", descriptor.version().to_string()),
        ("url", descriptor.url().to_owned()),
        ("sha256", descriptor.sha256().to_string()),
        ("license", descriptor.license().to_owned()),
        ("depends_on", descriptor.depends_on().as_str().to_owned()),
        ("python", descriptor.python().to_owned()),
        ("pip_packages", descriptor.pip_packages().join(", ")),
        ("strategy", descriptor.strategy().to_string()),
        ("script", descriptor.script().to_owned()),
    ];
    rows.iter()
        .map(|(key, value)| format!("{key:<13}{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializes the formula as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`InstallerError::Io`] if serialization fails.
pub fn descriptor_json(descriptor: &PackageDescriptor) -> Result<String> {
    serde_json::to_string_pretty(descriptor)
        .map_err(|e| InstallerError::Io(std::io::Error::from(e)))
}

/// Lines reporting whether `bin_dir` is on `PATH`.
#[must_use]
pub fn path_report(bin_dir: &Utf8Path, in_path: bool, package: &str) -> Vec<String> {
    if in_path {
        return vec![format!("You can now run: {package} --help")];
    }
    vec![
        format!("{bin_dir} is not on your PATH."),
        crate::wrapper::path_instructions(bin_dir.as_std_path()),
        String::new(),
        format!("Then run: {package} --help"),
    ]
}
