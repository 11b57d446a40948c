//! Formula and layout resolution from CLI options.
//!
//! The formula starts from the built-in descriptor or a formula file; CLI
//! flags then override the release, strategy and interpreter. Directories
//! come from `--prefix`, the explicit directory flags, or the per-user
//! defaults, in that order.

use crate::cli::{FormulaArgs, LayoutArgs};
use crate::dirs::BaseDirs;
use crate::error::{InstallerError, Result};
use crate::layout::TargetLayout;
use shellgpt_formula::{
    FormulaConfig, FormulaError, PackageDescriptor, Sha256Digest, VersionTag,
};

/// Resolves the formula selected by `args`.
///
/// # Errors
///
/// Returns [`InstallerError::Formula`] when the formula file cannot be
/// loaded, or when an override is invalid or half-specified.
pub fn resolve_descriptor(args: &FormulaArgs) -> Result<PackageDescriptor> {
    let mut descriptor = match &args.formula {
        Some(path) => FormulaConfig::load(path)?.into_descriptor()?,
        None => PackageDescriptor::shellgpt()?,
    };

    match (args.release.as_deref(), args.sha256.as_deref()) {
        (Some(release), Some(sha256)) => {
            let version = VersionTag::try_from(release)?;
            let digest = Sha256Digest::try_from(sha256)?;
            descriptor = descriptor.with_release(version, digest)?;
        }
        (None, None) => {}
        _ => return Err(FormulaError::IncompleteRelease.into()),
    }

    if let Some(strategy) = args.strategy {
        descriptor = descriptor.with_strategy(strategy);
    }
    if let Some(python) = &args.python {
        descriptor = descriptor.with_python(python.as_str());
    }
    Ok(descriptor)
}

/// Resolves the install directories for `package`.
///
/// `dirs` is consulted only for directories not given on the command line.
/// Relative directories are anchored at the current working directory.
///
/// # Errors
///
/// Returns [`InstallerError::LayoutUnavailable`] when a default directory is
/// needed but cannot be determined.
pub fn resolve_layout(
    args: &LayoutArgs,
    dirs: Option<&dyn BaseDirs>,
    package: &str,
) -> Result<TargetLayout> {
    if let Some(prefix) = &args.prefix {
        return TargetLayout::from_prefix(prefix).into_absolute();
    }
    if let (Some(bin_dir), Some(libexec_dir)) = (&args.bin_dir, &args.libexec_dir) {
        return TargetLayout::new(bin_dir.clone(), libexec_dir.clone()).into_absolute();
    }

    let dirs = dirs.ok_or_else(|| InstallerError::LayoutUnavailable {
        reason: "could not determine home directory".to_owned(),
    })?;
    let defaults = TargetLayout::user_default(dirs, package)?;
    TargetLayout::new(
        args.bin_dir
            .clone()
            .unwrap_or_else(|| defaults.bin_dir().to_owned()),
        args.libexec_dir
            .clone()
            .unwrap_or_else(|| defaults.libexec_dir().to_owned()),
    )
    .into_absolute()
}
