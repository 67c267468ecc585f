//! Integration tests for the nodeenv binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// The binary, isolated from the caller's settings and activated environments.
fn nodeenv(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("nodeenv"));
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("VIRTUAL_ENV")
        .env_remove("NODE_VIRTUAL_ENV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    nodeenv(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Node.js virtual environment"))
        .stdout(predicate::str::contains("--python-virtualenv"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    nodeenv(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_env_dir() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    nodeenv(&home)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("ENV_DIR"));
    Ok(())
}

#[test]
fn cli_rejects_prebuilt_with_source() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    nodeenv(&home)
        .args(["--prebuilt", "--source", "env"])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn cli_python_virtualenv_needs_virtual_env() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    nodeenv(&home)
        .arg("--python-virtualenv")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("VIRTUAL_ENV"));
    Ok(())
}

#[test]
fn cli_existing_env_exits_two_without_changes() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let env = home.path().join("envX");
    fs::create_dir_all(&env)?;
    fs::write(env.join("marker"), "untouched")?;

    nodeenv(&home)
        .args(["--mirror", "http://127.0.0.1:1", "envX"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));

    let entries: Vec<_> = fs::read_dir(&env)?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);
    assert_eq!(fs::read_to_string(env.join("marker"))?, "untouched");
    Ok(())
}

#[test]
fn cli_lists_versions_from_mirror() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let index = server.mock(|when, then| {
        when.method(GET).path("/index.json");
        then.status(200).body(
            r#"[{"version":"v18.0.0","lts":false},{"version":"v16.14.2","lts":"Gallium"}]"#,
        );
    });

    let home = TempDir::new()?;
    nodeenv(&home)
        .args(["--list", "--mirror", &server.base_url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("16.14.2\t18.0.0"));

    index.assert();
    Ok(())
}

#[test]
fn cli_quiet_list_still_prints_versions() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.json");
        then.status(200).body(r#"[{"version":"v18.0.0","lts":false}]"#);
    });

    let home = TempDir::new()?;
    nodeenv(&home)
        .args(["--list", "--quiet", "--mirror", &server.base_url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("18.0.0"));
    Ok(())
}

#[test]
fn cli_reads_settings_file() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/index.json");
        then.status(200).body(r#"[{"version":"v18.0.0","lts":false}]"#);
    });

    let home = TempDir::new()?;
    fs::write(
        home.path().join(".nodeenvrc"),
        format!("mirror: {}\n", server.base_url()),
    )?;

    nodeenv(&home)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("18.0.0"));
    Ok(())
}

#[test]
fn cli_malformed_settings_fail() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let rc = home.path().join("custom-rc");
    fs::write(&rc, "jobs: [1, 2\n")?;

    nodeenv(&home)
        .args(["--config-file", rc.to_str().unwrap_or_default(), "--list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("custom-rc"));
    Ok(())
}
