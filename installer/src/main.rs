//! ShellGPT installer CLI entrypoint.
//!
//! This binary fetches, verifies and installs a ShellGPT release, then runs
//! the installed entry point with `--help`. After installation, it reports
//! whether the binary directory is on `PATH`.

use clap::Parser;
use shellgpt_formula::PackageDescriptor;
use shellgpt_installer::cli::{Cli, Command, InfoArgs, InstallArgs, LayoutArgs, TestArgs};
use shellgpt_installer::deps::SystemCommandExecutor;
use shellgpt_installer::dirs::{BaseDirs, SystemBaseDirs};
use shellgpt_installer::error::{InstallerError, Result};
use shellgpt_installer::layout::TargetLayout;
use shellgpt_installer::output::{
    DryRunInfo, descriptor_json, descriptor_text, path_report, success_message,
    write_stderr_line,
};
use shellgpt_installer::pipeline::{InstallContext, install, test_installed};
use shellgpt_installer::resolution::{resolve_descriptor, resolve_layout};
use shellgpt_installer::strategy::InstallStrategy;
use shellgpt_installer::wrapper::is_directory_in_path;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Some(Command::Info(args)) => run_info(args, stdout),
        Some(Command::Test(args)) => run_test(args, stderr),
        Some(Command::Install(_)) | None => run_install(cli.install_args(), stderr),
    }
}

fn run_install(args: &InstallArgs, stderr: &mut dyn Write) -> Result<()> {
    let descriptor = resolve_descriptor(&args.formula)?;
    let layout = layout_for(&args.layout, &descriptor)?;

    // Dry-run mode: show what would be done without side effects
    if args.dry_run {
        InstallStrategy::for_descriptor(&descriptor, args.allow_global)?;
        let info = DryRunInfo {
            descriptor: &descriptor,
            layout: &layout,
            skip_test: args.skip_test,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let context = InstallContext {
        descriptor: &descriptor,
        layout: &layout,
        allow_global: args.allow_global,
        skip_test: args.skip_test,
        quiet: args.quiet,
    };
    let outcome = install(&context, stderr)?;

    if !args.quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(
            stderr,
            success_message(
                descriptor.name(),
                &descriptor.version().tag(),
                &outcome.entry_point,
            ),
        );
        report_path(&layout, descriptor.name(), stderr);
    }
    Ok(())
}

fn run_info(args: &InfoArgs, stdout: &mut dyn Write) -> Result<()> {
    let descriptor = resolve_descriptor(&args.formula)?;
    let text = if args.json {
        descriptor_json(&descriptor)?
    } else {
        descriptor_text(&descriptor)
    };
    writeln!(stdout, "{text}").map_err(|source| InstallerError::WriteFailed { source })
}

fn run_test(args: &TestArgs, stderr: &mut dyn Write) -> Result<()> {
    let descriptor = resolve_descriptor(&args.formula)?;
    let layout = layout_for(&args.layout, &descriptor)?;
    let entry_point = test_installed(&SystemCommandExecutor, &layout, descriptor.name())?;
    if !args.quiet {
        write_stderr_line(stderr, format!("{entry_point} --help exited successfully"));
    }
    Ok(())
}

fn layout_for(args: &LayoutArgs, descriptor: &PackageDescriptor) -> Result<TargetLayout> {
    let dirs = SystemBaseDirs::new();
    resolve_layout(
        args,
        dirs.as_ref().map(|d| d as &dyn BaseDirs),
        descriptor.name(),
    )
}

/// Reports whether the entry point is reachable through `PATH`.
fn report_path(layout: &TargetLayout, package: &str, stderr: &mut dyn Write) {
    let bin_dir = layout.bin_dir();
    let in_path = is_directory_in_path(bin_dir.as_std_path());
    write_stderr_line(stderr, "");
    for line in path_report(bin_dir, in_path, package) {
        write_stderr_line(stderr, line);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
