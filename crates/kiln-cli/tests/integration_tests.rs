//! Integration tests for the `kiln` binary.

use std::path::Path;

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// `kiln` isolated from the user's config and environment.
fn kiln(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("kiln");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("KILN_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("probe"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_fetch_command_help() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--target-path"))
        .stdout(predicate::str::contains("--values"))
        .stdout(predicate::str::contains("--strategy"));
}

#[test]
fn test_config_get_default() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["config", "get", "engine.command"])
        .assert()
        .success()
        .stdout(predicate::str::contains("copier"));
}

#[test]
fn test_config_reads_environment() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .env("KILN_CONTAINER__RUNTIME", "podman")
        .args(["config", "get", "container.runtime"])
        .assert()
        .success()
        .stdout(predicate::str::contains("podman"));
}

#[test]
fn test_config_list_json() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["--output-format", "json", "config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"engine\""))
        .stdout(predicate::str::contains("\"output_selection\": \"strict\""));
}

#[test]
fn test_init_local_writes_config() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let written = std::fs::read_to_string(home.path().join(".kiln.toml")).unwrap();
    assert!(written.contains("[container]"));
}

#[test]
fn test_probe_reports_engine() {
    let home = TempDir::new().unwrap();
    kiln(home.path())
        .env("KILN_ENGINE__COMMAND", "kiln-no-such-engine")
        .args(["--output-format", "plain", "probe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kiln-no-such-engine (not found)"));
}

#[cfg(unix)]
#[test]
fn test_fetch_with_local_engine() {
    let home = TempDir::new().unwrap();
    let root = home.path();
    let engine = fake_engine(root);

    let template = root.join("tpl");
    std::fs::create_dir_all(&template).unwrap();
    std::fs::write(template.join("copier.json"), r#"{"name": "default"}"#).unwrap();

    kiln(root)
        .env("KILN_ENGINE__COMMAND", &engine)
        .args([
            "fetch",
            "tpl",
            "--strategy",
            "local",
            "--set",
            "name=billing",
            "--target-path",
            "services/billing",
            "--output",
            "out",
            "--yes",
        ])
        .assert()
        .success();

    let args = std::fs::read_to_string(root.join("out/services/billing/args.txt")).unwrap();
    assert!(args.starts_with("copy --data name=billing "));
    assert!(args.trim_end().ends_with("--trust"));
}

/// Stand-in engine: writes one file into the destination before `--trust`.
#[cfg(unix)]
fn fake_engine(root: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let engine = root.join("fake-copier");
    std::fs::write(
        &engine,
        "#!/bin/sh\n\
         dest=\"\"\n\
         prev=\"\"\n\
         for arg in \"$@\"; do\n\
           if [ \"$arg\" = \"--trust\" ]; then dest=\"$prev\"; fi\n\
           prev=\"$arg\"\n\
         done\n\
         mkdir -p \"$dest\"\n\
         echo \"$@\" > \"$dest/args.txt\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755)).unwrap();

    engine
}

#[cfg(unix)]
#[test]
fn test_fetch_into_current_dir_with_relative_workdir() {
    let home = TempDir::new().unwrap();
    let root = home.path();
    let engine = fake_engine(root);

    let template = root.join("tpl");
    std::fs::create_dir_all(&template).unwrap();
    std::fs::write(template.join("copier.json"), "{}").unwrap();

    kiln(root)
        .env("KILN_ENGINE__COMMAND", &engine)
        .args([
            "fetch",
            "tpl",
            "--strategy",
            "local",
            "--output",
            ".",
            "--target-path",
            "svc",
            "--workdir",
            "stage",
            "--yes",
        ])
        .assert()
        .success();

    assert!(root.join("svc/args.txt").is_file());
    assert!(root.join("stage").is_dir());
}
