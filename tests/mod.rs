use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;


#[test]
fn help() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.arg("--help").assert();

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("parse_fel_data [OPTIONS]"));
    Ok(())
}

#[test]
fn version() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.arg("-v").assert();

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}
