//! Post-install smoke test.
//!
//! The installed entry point is run with `--help`. Only the exit status is
//! checked; the help text belongs to the script and may change between
//! releases.

use crate::deps::CommandExecutor;
use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use log::debug;

/// Flag passed to the entry point.
pub const HELP_FLAG: &str = "--help";

/// Runs `entry_point --help` and requires a zero exit status.
///
/// # Errors
///
/// Returns [`InstallerError::SmokeTest`] when the entry point exits
/// non-zero, and [`InstallerError::Io`] when it cannot be started.
pub fn run_smoke_test(executor: &dyn CommandExecutor, entry_point: &Utf8Path) -> Result<()> {
    debug!("smoke testing {entry_point}");
    let output = executor.run(entry_point.as_str(), &[HELP_FLAG])?;
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| format!(": {line}"))
        .unwrap_or_default();
    Err(InstallerError::SmokeTest {
        entry_point: entry_point.to_owned(),
        status: output.status.to_string(),
        detail,
    })
}
