//! CLI argument definitions for the ShellGPT installer.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use shellgpt_formula::StrategyKind;

/// Install ShellGPT into an isolated Python environment.
#[derive(Parser, Debug)]
#[command(name = "shellgpt-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install ShellGPT, a command-line client for OpenAI chat completions.\n\n",
    "The installer fetches a release archive, checks it against the formula's ",
    "SHA-256 digest, and places a `shellgpt` entry point. By default the script ",
    "runs from a private virtual environment under the libexec directory, so the ",
    "host interpreter is left untouched.\n\n",
    "After installation the entry point is run with --help; a non-zero exit ",
    "fails the install.",
))]
#[command(after_help = concat!(
    "STRATEGIES:\n",
    "  venv     Private virtual environment plus launcher (default)\n",
    "  direct   Copy the script and rely on the host interpreter\n",
    "  global   pip-install into the host interpreter (needs --allow-global)\n\n",
    "EXAMPLES:\n",
    "  Install the built-in release for the current user:\n",
    "    $ shellgpt-installer\n\n",
    "  Install a specific release under a prefix:\n",
    "    $ shellgpt-installer --release 1.2.1 --sha256 <HEX> --prefix /opt/shellgpt\n\n",
    "  Install from a formula file:\n",
    "    $ shellgpt-installer install --formula shellgpt.toml\n\n",
    "  Show the resolved formula as JSON:\n",
    "    $ shellgpt-installer info --json\n\n",
    "  Preview without installing:\n",
    "    $ shellgpt-installer --dry-run\n\n",
    "For more information, see: https://github.com/adborroto/homebrew-shellgpt",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Install arguments (used when no subcommand is given).
    #[command(flatten)]
    pub install: InstallArgs,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install ShellGPT (default when no subcommand given).
    Install(InstallArgs),

    /// Print the resolved formula.
    Info(InfoArgs),

    /// Run the smoke test against an existing install.
    Test(TestArgs),
}

/// Options selecting and overriding the formula.
#[derive(Args, Debug, Clone, Default)]
pub struct FormulaArgs {
    /// Read the formula from a TOML file instead of the built-in one.
    #[arg(long, value_name = "FILE")]
    pub formula: Option<Utf8PathBuf>,

    /// Install this release instead of the formula's (requires --sha256).
    #[arg(long, value_name = "VERSION", requires = "sha256")]
    pub release: Option<String>,

    /// SHA-256 digest of the --release archive.
    #[arg(long, value_name = "HEX", requires = "release")]
    pub sha256: Option<String>,

    /// Installation strategy.
    #[arg(long, value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Host Python interpreter command.
    #[arg(long, value_name = "CMD")]
    pub python: Option<String>,
}

/// Options selecting the install directories.
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutArgs {
    /// Install under PREFIX/bin and PREFIX/libexec.
    #[arg(long, value_name = "DIR", conflicts_with_all = ["bin_dir", "libexec_dir"])]
    pub prefix: Option<Utf8PathBuf>,

    /// Directory for the entry point [default: ~/.local/bin].
    #[arg(long, value_name = "DIR")]
    pub bin_dir: Option<Utf8PathBuf>,

    /// Directory for the private environment [default: platform data dir].
    #[arg(long, value_name = "DIR")]
    pub libexec_dir: Option<Utf8PathBuf>,
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    /// Formula selection and overrides.
    #[command(flatten)]
    pub formula: FormulaArgs,

    /// Install directories.
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Permit the global strategy to modify the host interpreter.
    #[arg(long)]
    pub allow_global: bool,

    /// Do not run the entry point with --help after installing.
    #[arg(long)]
    pub skip_test: bool,

    /// Show the install plan and exit without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the info command.
#[derive(Args, Debug, Clone, Default)]
pub struct InfoArgs {
    /// Formula selection and overrides.
    #[command(flatten)]
    pub formula: FormulaArgs,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the test command.
#[derive(Args, Debug, Clone, Default)]
pub struct TestArgs {
    /// Formula selection and overrides.
    #[command(flatten)]
    pub formula: FormulaArgs,

    /// Install directories.
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Returns the effective install arguments.
    ///
    /// If an `Install` subcommand was provided, returns those arguments.
    /// Otherwise returns the flattened install arguments.
    #[must_use]
    pub fn install_args(&self) -> &InstallArgs {
        match &self.command {
            Some(Command::Install(args)) => args,
            Some(Command::Info(_) | Command::Test(_)) | None => &self.install,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
