//! Tests for installation strategies.

use super::*;
use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, success_output};
use rstest::{fixture, rstest};
use tempfile::TempDir;

const SCRIPT_BODY: &str = "#!/usr/bin/env python3\nprint('shellgpt')\n";

struct Workspace {
    _temp: TempDir,
    source: SourceTree,
    layout: TargetLayout,
}

#[fixture]
fn workspace() -> Workspace {
    let temp = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::try_from(temp.path().to_path_buf()).expect("utf-8 temp dir");
    let source_root = root.join("src");
    std::fs::create_dir_all(&source_root).expect("create source dir");
    std::fs::write(source_root.join("shellgpt.py"), SCRIPT_BODY).expect("write script");
    Workspace {
        _temp: temp,
        source: SourceTree::new(source_root),
        layout: TargetLayout::from_prefix(&root.join("prefix")),
    }
}

fn descriptor(kind: StrategyKind) -> PackageDescriptor {
    PackageDescriptor::shellgpt()
        .expect("built-in descriptor")
        .with_strategy(kind)
}

fn venv_calls(layout: &TargetLayout) -> Vec<ExpectedCall> {
    let libexec = layout.libexec_dir().to_string();
    let pip = layout.venv_pip().to_string();
    vec![
        ExpectedCall::new("python3", &["-m", "venv", libexec.as_str()], Ok(success_output())),
        ExpectedCall::new(
            &pip,
            &["install", "--upgrade", "pip", "setuptools", "wheel"],
            Ok(success_output()),
        ),
        ExpectedCall::new(&pip, &["install", "openai"], Ok(success_output())),
    ]
}

#[cfg(unix)]
fn mode_of(path: &Utf8Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).expect("metadata").permissions().mode() & 0o777
}

#[rstest]
#[case(StrategyKind::Direct, false)]
#[case(StrategyKind::Venv, false)]
#[case(StrategyKind::Global, true)]
fn strategy_follows_descriptor(#[case] kind: StrategyKind, #[case] allow_global: bool) {
    let strategy =
        InstallStrategy::for_descriptor(&descriptor(kind), allow_global).expect("strategy");
    assert_eq!(strategy.kind(), kind);
}

#[test]
fn global_strategy_requires_opt_in() {
    let err = InstallStrategy::for_descriptor(&descriptor(StrategyKind::Global), false)
        .expect_err("global refused");
    assert!(matches!(err, InstallerError::GlobalInstallRefused));
}

#[rstest]
fn direct_copies_script_to_bin(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Direct);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let executor = StubExecutor::new(Vec::new());

    let entry = InstallStrategy::Direct
        .provision(&workspace.source, &request, &executor)
        .expect("direct install");

    assert_eq!(entry.path().as_str(), workspace.layout.entry_point("shellgpt").as_str());
    assert_eq!(entry.strategy(), StrategyKind::Direct);
    let installed = std::fs::read_to_string(entry.path()).expect("read entry point");
    assert_eq!(installed, SCRIPT_BODY);
    #[cfg(unix)]
    assert_eq!(mode_of(entry.path()), 0o755);
    executor.assert_finished();
}

#[rstest]
fn global_upgrades_host_pip_before_copying(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Global);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let executor = StubExecutor::new(vec![
        ExpectedCall::new(
            "python3",
            &["-m", "pip", "install", "--upgrade", "pip", "setuptools", "wheel"],
            Ok(success_output()),
        ),
        ExpectedCall::new(
            "python3",
            &["-m", "pip", "install", "openai"],
            Ok(success_output()),
        ),
    ]);
    let strategy = InstallStrategy::for_descriptor(&formula, true).expect("global allowed");

    let entry = strategy
        .provision(&workspace.source, &request, &executor)
        .expect("global install");

    executor.assert_finished();
    assert!(entry.path().is_file());
    assert!(!workspace.layout.libexec_dir().exists());
}

#[rstest]
fn venv_writes_launcher_for_private_interpreter(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Venv);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let executor = StubExecutor::new(venv_calls(&workspace.layout));
    let strategy = InstallStrategy::for_descriptor(&formula, false).expect("venv");

    let entry = strategy
        .provision(&workspace.source, &request, &executor)
        .expect("venv install");

    executor.assert_finished();
    let libexec = workspace.layout.libexec_dir();
    let launcher = std::fs::read_to_string(entry.path()).expect("read launcher");
    assert_eq!(
        launcher,
        format!("#!/bin/bash\n{libexec}/bin/python3 {libexec}/shellgpt.py \"$@\"\n")
    );
    let private = std::fs::read_to_string(libexec.join("shellgpt.py")).expect("private script");
    assert_eq!(private, SCRIPT_BODY);
    #[cfg(unix)]
    assert_eq!(mode_of(entry.path()), 0o755);
}

#[rstest]
fn venv_commands_see_site_packages_on_python_path(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Venv);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let executor = StubExecutor::new(venv_calls(&workspace.layout));
    let strategy = InstallStrategy::for_descriptor(&formula, false).expect("venv");

    temp_env::with_var(PYTHONPATH, None::<&str>, || {
        strategy
            .provision(&workspace.source, &request, &executor)
            .expect("venv install");
    });

    let site = workspace.layout.site_packages("3.10");
    for index in 0..3 {
        assert_eq!(
            executor.recorded_env(index),
            vec![(PYTHONPATH.to_owned(), site.to_string())]
        );
    }
    assert!(site.is_dir());
}

#[rstest]
fn venv_failure_leaves_bin_dir_untouched(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Venv);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let libexec = workspace.layout.libexec_dir().to_string();
    let executor = StubExecutor::new(vec![ExpectedCall::new(
        "python3",
        &["-m", "venv", libexec.as_str()],
        Ok(failure_output("No module named venv")),
    )]);
    let strategy = InstallStrategy::for_descriptor(&formula, false).expect("venv");

    let err = strategy
        .provision(&workspace.source, &request, &executor)
        .expect_err("venv fails");

    assert!(matches!(err, InstallerError::EnvironmentCreation { .. }));
    assert!(err.to_string().contains("No module named venv"));
    assert!(!workspace.layout.entry_point("shellgpt").exists());
}

#[rstest]
fn pip_failure_stops_before_launcher(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Venv);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let mut calls = venv_calls(&workspace.layout);
    if let Some(last) = calls.last_mut() {
        last.result = Ok(failure_output("Could not find a version that satisfies openai"));
    }
    let executor = StubExecutor::new(calls);
    let strategy = InstallStrategy::for_descriptor(&formula, false).expect("venv");

    let err = strategy
        .provision(&workspace.source, &request, &executor)
        .expect_err("pip fails");

    match err {
        InstallerError::DependencyInstall { package, message } => {
            assert_eq!(package, "openai");
            assert!(message.contains("Could not find a version"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!workspace.layout.entry_point("shellgpt").exists());
}

#[rstest]
fn missing_script_is_reported_before_any_command(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Venv);
    let layout = workspace.layout.clone();
    let request = ProvisionRequest {
        package: "shellgpt",
        script: "missing.py",
        layout: &layout,
    };
    let executor = StubExecutor::new(Vec::new());
    let strategy = InstallStrategy::for_descriptor(&formula, false).expect("venv");

    let err = strategy
        .provision(&workspace.source, &request, &executor)
        .expect_err("script missing");

    let InstallerError::ScriptNotFound { script, .. } = err else {
        panic!("expected ScriptNotFound, got {err:?}");
    };
    assert_eq!(script, "missing.py");
    executor.assert_finished();
}

#[rstest]
fn reinstall_is_idempotent(workspace: Workspace) {
    let formula = descriptor(StrategyKind::Direct);
    let request = ProvisionRequest::for_descriptor(&formula, &workspace.layout);
    let executor = StubExecutor::new(Vec::new());

    let first = InstallStrategy::Direct
        .provision(&workspace.source, &request, &executor)
        .expect("first install");
    let first_content = std::fs::read(first.path()).expect("read first");
    let second = InstallStrategy::Direct
        .provision(&workspace.source, &request, &executor)
        .expect("second install");

    assert_eq!(first, second);
    assert_eq!(std::fs::read(second.path()).expect("read second"), first_content);
    #[cfg(unix)]
    assert_eq!(mode_of(second.path()), 0o755);
}
