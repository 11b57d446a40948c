//! Entry point placement and launcher generation.
//!
//! The isolated strategy fronts the private environment with a two-line
//! bash launcher; the direct strategies copy the script itself. Either way
//! the result at the binary directory is a file with mode `0755`.

use crate::error::{InstallerError, Result};
use camino::Utf8Path;
use std::path::Path;

/// Mode given to every entry point (rwxr-xr-x).
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Renders the launcher that runs `script` with the private `python`,
/// forwarding every argument unchanged and in order.
///
/// Paths are emitted verbatim unless they contain characters the shell
/// would split or expand, in which case they are single-quoted.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use shellgpt_installer::wrapper::render_launcher;
///
/// let launcher = render_launcher(
///     Utf8Path::new("/opt/shellgpt/libexec/bin/python3"),
///     Utf8Path::new("/opt/shellgpt/libexec/shellgpt.py"),
/// );
/// assert_eq!(
///     launcher,
///     "#!/bin/bash\n/opt/shellgpt/libexec/bin/python3 /opt/shellgpt/libexec/shellgpt.py \"$@\"\n",
/// );
/// ```
#[must_use]
pub fn render_launcher(python: &Utf8Path, script: &Utf8Path) -> String {
    format!(
        "#!/bin/bash\n{} {} \"$@\"\n",
        shell_word(python.as_str()),
        shell_word(script.as_str())
    )
}

/// Quotes `word` for bash when it is not a plain path.
fn shell_word(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | '@' | ':' | ',')
        });
    if plain {
        word.to_owned()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Writes `content` to `path` and marks it executable.
///
/// An existing file is overwritten, so reinstalling yields the same content
/// and mode.
///
/// # Errors
///
/// Returns [`InstallerError::EntryPoint`] if the file cannot be written or
/// its permissions cannot be set.
pub fn write_launcher(path: &Utf8Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    std::fs::write(path, content)
        .map_err(|e| InstallerError::EntryPoint(format!("failed to write {path}: {e}")))?;
    make_executable(path.as_std_path())
}

/// Copies `source` to `dest` and marks the copy executable.
///
/// # Errors
///
/// Returns [`InstallerError::EntryPoint`] if the copy or permission change
/// fails.
pub fn copy_executable(source: &Path, dest: &Utf8Path) -> Result<()> {
    ensure_parent(dest)?;
    std::fs::copy(source, dest).map_err(|e| {
        InstallerError::EntryPoint(format!(
            "failed to copy {} to {dest}: {e}",
            source.display()
        ))
    })?;
    make_executable(dest.as_std_path())
}

/// Copies `source` to `dest` without changing its mode.
///
/// # Errors
///
/// Returns [`InstallerError::EntryPoint`] if the copy fails.
pub fn copy_file(source: &Path, dest: &Utf8Path) -> Result<()> {
    ensure_parent(dest)?;
    std::fs::copy(source, dest).map_err(|e| {
        InstallerError::EntryPoint(format!(
            "failed to copy {} to {dest}: {e}",
            source.display()
        ))
    })?;
    Ok(())
}

fn ensure_parent(path: &Utf8Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            InstallerError::EntryPoint(format!("failed to create {parent}: {e}"))
        })?;
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE)).map_err(
        |e| {
            InstallerError::EntryPoint(format!(
                "failed to set permissions on {}: {e}",
                path.display()
            ))
        },
    )
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Checks if a directory is in the PATH environment variable.
#[must_use]
pub fn is_directory_in_path(dir: &Path) -> bool {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).any(|p| p == dir))
        .unwrap_or(false)
}

/// Returns instructions for adding a directory to PATH.
#[must_use]
pub fn path_instructions(bin_dir: &Path) -> String {
    format!(
        concat!(
            "Add the following to your shell profile (~/.bashrc or ~/.zshrc):\n",
            "  export PATH=\"{}:$PATH\""
        ),
        bin_dir.display()
    )
}
