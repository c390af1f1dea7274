//! End-to-end runs of the `underwrite` binary.

use std::fs;
use std::path::Path;
use std::process::Output;

use tempfile::TempDir;
use tokio::process::Command;

/// Run the binary with an isolated home and working directory.
async fn run(args: &[&str], dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_underwrite"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("RUST_LOG", "error")
        .env_remove("UNDERWRITE_DICTIONARY_DIR")
        .kill_on_drop(true)
        .output()
        .await
        .expect("failed to run underwrite")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_record(dir: &Path) -> String {
    let path = dir.join("application.json");
    fs::write(
        &path,
        r#"{
            "client": { "first_name": "Dana", "address": { "state": "tx" } },
            "auto": { "vehicles": [{ "make": "ford", "financed": false }] }
        }"#,
    )
    .unwrap();
    path.display().to_string()
}

#[tokio::test]
async fn test_check_builtin() {
    let temp = TempDir::new().unwrap();
    let output = run(&["check"], temp.path()).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Dictionary OK"));
}

#[tokio::test]
async fn test_resolve_exit_codes() {
    let temp = TempDir::new().unwrap();
    let output = run(&["resolve", "auto.drivers[1].license_state"], temp.path()).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("driver_1"));

    let output = run(&["resolve", "auto.drivers[1].shoe_size"], temp.path()).await;
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("field not found"));
}

#[tokio::test]
async fn test_options_for_record_state() {
    let temp = TempDir::new().unwrap();
    let record = write_record(temp.path());
    let output = run(
        &["options", "home.construction.roof_type", "--data", &record],
        temp.path(),
    )
    .await;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("list for TX"));
    assert!(out.contains("impact_resistant_shingle"));
}

#[tokio::test]
async fn test_groups_and_describe() {
    let temp = TempDir::new().unwrap();
    let record = write_record(temp.path());

    let output = run(&["groups", "--data", &record], temp.path()).await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("vehicle_0"));

    let output = run(&["describe", "--data", &record], temp.path()).await;
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("FORD"));
    assert!(!out.contains("lienholder"));
}

#[tokio::test]
async fn test_dictionary_flag_without_builtin() {
    let temp = TempDir::new().unwrap();
    let fields = temp.path().join("dict/fields");
    fs::create_dir_all(&fields).unwrap();
    fs::write(
        fields.join("marine.yaml"),
        "- key: marine.hull_id\n  label: Hull ID\n  input_type: text\n",
    )
    .unwrap();

    let dict = temp.path().join("dict").display().to_string();
    let output = run(
        &["resolve", "marine.hull_id", "--dictionary", &dict, "--no-builtin"],
        temp.path(),
    )
    .await;
    assert!(output.status.success());

    let output = run(
        &["resolve", "client.first_name", "--dictionary", &dict, "--no-builtin"],
        temp.path(),
    )
    .await;
    assert!(!output.status.success());
}

#[tokio::test]
async fn test_strict_rejects_broken_dictionary() {
    let temp = TempDir::new().unwrap();
    let fields = temp.path().join("dict/fields");
    fs::create_dir_all(&fields).unwrap();
    fs::write(fields.join("broken.yaml"), "- key: [unterminated\n").unwrap();
    let dict = temp.path().join("dict").display().to_string();

    let output = run(&["check", "--dictionary", &dict], temp.path()).await;
    assert!(output.status.success());

    let output = run(&["check", "--dictionary", &dict, "--strict"], temp.path()).await;
    assert_eq!(output.status.code(), Some(1));
}
