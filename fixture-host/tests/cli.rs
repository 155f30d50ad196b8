mod test_helpers;

use crate::test_helpers::{fixture_file, FIXTURE_HOST_ROOT};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture_host<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixture-host"))
        .args(args)
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("run fixture-host")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn default_run_prints_the_result() {
    let output = fixture_host(FIXTURE_HOST_ROOT, &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn default_run_from_the_workspace_root() {
    let workspace = Path::new(FIXTURE_HOST_ROOT)
        .parent()
        .expect("crate lives inside the workspace");
    let output = fixture_host(workspace, &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn explicit_module_from_another_directory() {
    let dir = TempDir::new().expect("create working directory");
    let module = fixture_file("wasm/global.wasm");
    let output = fixture_host(
        dir.path(),
        &[module.to_str().unwrap(), "--arg", "10", "--arg", "-5"],
    );
    assert!(output.status.success());
    // -2 + 10 - 5
    assert_eq!(stdout(&output), "3\n");
}

#[test]
fn missing_module_is_reported_on_stdout() {
    let dir = TempDir::new().expect("create working directory");
    let output = fixture_host(dir.path(), &["absent.wasm"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("absent.wasm"), "stdout names the module: {}", out);
    assert!(out.contains("No such file or directory") || out.contains("cannot find"));
    // the cause chain fits on one line, without a backtrace
    assert_eq!(out.lines().count(), 1, "single line: {}", out);
    assert!(!out.contains("stack backtrace"));
}

#[test]
fn bad_flag_value_is_reported_on_stdout() {
    let output = fixture_host(FIXTURE_HOST_ROOT, &["--memory-pages", "lots"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("--memory-pages"));
}
