use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn missing_input() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.assert();

    assert
        .failure()
        .code(2)
        .stderr(predicate::str::contains("is required"));

    Ok(())
}

#[test]
fn input_does_not_exist() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.arg("--report").arg("assets/tests/missing.txt").assert();

    assert
        .failure()
        .code(2)
        .stderr(predicate::str::contains("doesn't exist"));

    Ok(())
}

#[test]
fn rpu_and_report_conflict() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let report = Path::new("assets/tests/summary_p8.txt");

    let assert = cmd
        .arg("-r")
        .arg(report)
        .arg("--report")
        .arg(report)
        .assert();

    assert.failure().code(2);

    Ok(())
}

#[test]
fn unsupported_encoder() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let report = Path::new("assets/tests/summary_p8.txt");

    let assert = cmd
        .arg("--report")
        .arg(report)
        .args(["-e", "svt-av1"])
        .assert();

    assert
        .failure()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unsupported encoder"));

    Ok(())
}

#[test]
fn output_write_failure() -> Result<()> {
    let temp = assert_fs::TempDir::new()?;
    let output_file = temp.child("missing_dir").child("fel_data.txt");

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let report = Path::new("assets/tests/summary_p8.txt");

    let assert = cmd
        .arg("--report")
        .arg(report)
        .arg("-o")
        .arg(output_file.path())
        .assert();

    assert
        .failure()
        .code(5)
        .stderr(predicate::str::contains("failed writing"));
    output_file.assert(predicate::path::missing());

    Ok(())
}
