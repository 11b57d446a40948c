//! End-to-end CLI behaviour tests for `shellgpt-installer`.
//!
//! These scenarios invoke the installer binary and validate dry-run output,
//! error handling, and a full offline install from a `file://` archive.
#![cfg(unix)]

mod support;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::convert::Infallible;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::str::FromStr;
use support::{build_release, formula_toml};
use tempfile::TempDir;

#[derive(Default)]
struct CliWorld {
    args: RefCell<Vec<String>>,
    output: RefCell<Option<Output>>,
    formula: RefCell<Option<PathBuf>>,
    prefix: RefCell<Option<PathBuf>>,
    // Keep temp_dir alive for the lifetime of the scenario.
    _temp_dir: RefCell<Option<TempDir>>,
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld::default()
}

#[derive(Debug)]
struct QuotedText(String);

impl FromStr for QuotedText {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self(input.trim().trim_matches('"').to_owned()))
    }
}

fn installer() -> Command {
    Command::new(env!("CARGO_BIN_EXE_shellgpt-installer"))
}

/// Creates a temporary directory and returns a prefix path inside it.
fn setup_prefix(cli_world: &CliWorld) -> PathBuf {
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let prefix = temp_dir.path().join("prefix");
    cli_world._temp_dir.replace(Some(temp_dir));
    cli_world.prefix.replace(Some(prefix.clone()));
    prefix
}

fn prefix(cli_world: &CliWorld) -> PathBuf {
    cli_world.prefix.borrow().clone().expect("prefix not set")
}

/// Helper function to retrieve the command output from the CLI world.
fn get_output(cli_world: &CliWorld) -> std::cell::Ref<'_, Output> {
    let output = cli_world.output.borrow();
    std::cell::Ref::map(output, |opt| opt.as_ref().expect("output not set"))
}

#[given("the installer is run with arguments {args}")]
fn given_invoked_with(cli_world: &CliWorld, args: QuotedText) {
    cli_world
        .args
        .replace(args.0.split_whitespace().map(str::to_owned).collect());
}

#[given("the installer is invoked with dry-run and a temporary prefix")]
fn given_dry_run_with_prefix(cli_world: &CliWorld) {
    let prefix = setup_prefix(cli_world);
    cli_world.args.replace(vec![
        "--dry-run".to_owned(),
        "--prefix".to_owned(),
        prefix.display().to_string(),
    ]);
}

#[given("a formula file for a direct install of version {version}")]
fn given_formula_file(cli_world: &CliWorld, version: String) {
    setup_prefix(cli_world);
    let temp_dir = cli_world._temp_dir.borrow();
    let dir = temp_dir.as_ref().expect("temp dir not set").path();
    let release = build_release(dir, &version);
    let formula = dir.join("shellgpt.toml");
    std::fs::write(&formula, formula_toml(&release, "direct", &release.sha256))
        .expect("write formula");
    cli_world.formula.replace(Some(formula));
}

#[given("the installer is invoked to install it into a temporary prefix")]
fn given_install_into_prefix(cli_world: &CliWorld) {
    let formula = cli_world.formula.borrow().clone().expect("formula not set");
    cli_world.args.replace(vec![
        "install".to_owned(),
        "--formula".to_owned(),
        formula.display().to_string(),
        "--prefix".to_owned(),
        prefix(cli_world).display().to_string(),
    ]);
}

#[when("the installer CLI is run")]
fn when_installer_cli_run(cli_world: &CliWorld) {
    let args = cli_world.args.borrow();
    let output = installer()
        .args(args.iter())
        .output()
        .expect("failed to run shellgpt-installer");
    cli_world.output.replace(Some(output));
}

#[then("the CLI exits successfully")]
fn then_cli_exits_successfully(cli_world: &CliWorld) {
    let output = get_output(cli_world);
    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[then("the CLI exits with an error")]
fn then_cli_exits_with_error(cli_world: &CliWorld) {
    let output = get_output(cli_world);
    assert!(
        !output.status.success(),
        "expected failure, stdout: {}, stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[then("stdout mentions {snippet}")]
fn then_stdout_mentions(cli_world: &CliWorld, snippet: QuotedText) {
    let output = get_output(cli_world);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&snippet.0), "unexpected stdout: {stdout}");
}

#[then("stderr mentions {snippet}")]
fn then_stderr_mentions(cli_world: &CliWorld, snippet: QuotedText) {
    let output = get_output(cli_world);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&snippet.0), "unexpected stderr: {stderr}");
}

#[then("the temporary prefix is untouched")]
fn then_prefix_untouched(cli_world: &CliWorld) {
    assert!(!prefix(cli_world).exists());
}

#[then("the installed entry point passes the test subcommand")]
fn then_test_subcommand_passes(cli_world: &CliWorld) {
    let prefix = prefix(cli_world);
    assert!(prefix.join("bin").join("shellgpt").is_file());

    let output = installer()
        .args(["test", "--prefix"])
        .arg(&prefix)
        .output()
        .expect("failed to run shellgpt-installer test");
    assert!(
        output.status.success(),
        "test subcommand failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// Bindings are index-based; keep them in feature file order.
#[scenario(path = "tests/features/cli.feature", index = 0)]
fn scenario_info_json(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 1)]
fn scenario_dry_run(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 2)]
fn scenario_global_refused(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 3)]
fn scenario_release_without_digest(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", index = 4)]
fn scenario_direct_install(cli_world: CliWorld) {
    let _ = cli_world;
}
