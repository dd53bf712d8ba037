use anyhow::Result;
use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

#[test]
fn dovi_tool_not_found() -> Result<()> {
    let temp = assert_fs::TempDir::new()?;
    let rpu = temp.child("RPU.bin");
    rpu.write_binary(&[0, 0, 0, 1, 0x7C, 0x01])?;

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd
        .arg("-r")
        .arg(rpu.path())
        .arg("-d")
        .arg(temp.child("bin").child("dovi_tool").path())
        .assert();

    assert
        .failure()
        .code(3)
        .stderr(predicate::str::contains("dovi_tool: executable not found"));

    Ok(())
}

#[test]
fn mediainfo_not_found() -> Result<()> {
    let temp = assert_fs::TempDir::new()?;
    let video = temp.child("movie.mkv");
    video.touch()?;

    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd
        .arg("-i")
        .arg(video.path())
        .arg("-m")
        .arg(temp.child("bin").child("mediainfo").path())
        .assert();

    assert
        .failure()
        .code(3)
        .stderr(predicate::str::contains("mediainfo: executable not found"));

    Ok(())
}

#[cfg(unix)]
mod fake_tools {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;
    use predicates::prelude::*;

    /// Shell script printing a fixture to stdout
    fn fake_tool(temp: &TempDir, name: &str, body: &str) -> Result<PathBuf> {
        let script = temp.child(name);
        script.write_str(&format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(script.path(), fs::Permissions::from_mode(0o755))?;

        Ok(script.to_path_buf())
    }

    fn cat_fixture(name: &str) -> Result<String> {
        let path = Path::new("assets/tests").join(name).canonicalize()?;
        Ok(format!("cat '{}'", path.display()))
    }

    #[test]
    fn dovi_tool_summary() -> Result<()> {
        let temp = TempDir::new()?;
        let rpu = temp.child("RPU.bin");
        rpu.touch()?;

        let dovi_tool = fake_tool(&temp, "dovi_tool", &cat_fixture("summary_p7_fel.txt")?)?;

        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
        let assert = cmd
            .arg("-r")
            .arg(rpu.path())
            .arg("-d")
            .arg(&dovi_tool)
            .arg("-x")
            .assert();

        assert.success().stdout(predicate::str::contains(
            "L(10000000,50)\" --max-cll \"1000,400\"",
        ));

        Ok(())
    }

    #[test]
    fn dovi_tool_failure() -> Result<()> {
        let temp = TempDir::new()?;
        let rpu = temp.child("RPU.bin");
        rpu.touch()?;

        let dovi_tool = fake_tool(&temp, "dovi_tool", "echo 'Invalid RPU' >&2\nexit 1")?;

        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
        let assert = cmd.arg("-r").arg(rpu.path()).arg("-d").arg(&dovi_tool).assert();

        assert
            .failure()
            .code(3)
            .stderr(predicate::str::contains("exit code 1: Invalid RPU"));

        Ok(())
    }

    #[test]
    fn mediainfo_container() -> Result<()> {
        let temp = TempDir::new()?;
        let video = temp.child("movie.mkv");
        video.touch()?;

        let mediainfo = fake_tool(&temp, "mediainfo", &cat_fixture("mediainfo.json")?)?;
        let report = Path::new("assets/tests/summary_p7_fel.txt");

        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
        let assert = cmd
            .arg("--report")
            .arg(report)
            .arg("-i")
            .arg(video.path())
            .arg("-m")
            .arg(&mediainfo)
            .args(["-p", "bt2020"])
            .assert();

        assert.success().stdout(
            predicate::str::contains("  MediaInfo: 50/40000000")
                .and(predicate::str::contains("  RPU: 50/10000000"))
                .and(predicate::str::contains("detected a difference"))
                .and(predicate::str::contains("  Primaries: Display P3 (input file)")),
        );

        Ok(())
    }

    #[test]
    fn mediainfo_light_level_without_l6() -> Result<()> {
        let temp = TempDir::new()?;
        let video = temp.child("movie.mkv");
        video.touch()?;

        let mediainfo = fake_tool(&temp, "mediainfo", &cat_fixture("mediainfo.json")?)?;
        let report = Path::new("assets/tests/summary_no_l6.txt");

        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
        let assert = cmd
            .arg("--report")
            .arg(report)
            .arg("-i")
            .arg(video.path())
            .arg("-m")
            .arg(&mediainfo)
            .assert();

        assert.success().stdout(
            predicate::str::contains("  Maximum CLL: 1000 (input file)")
                .and(predicate::str::contains("--max-cll \"1000,400\"")),
        );

        Ok(())
    }

    #[test]
    fn mediainfo_only() -> Result<()> {
        let temp = TempDir::new()?;
        let video = temp.child("movie.mkv");
        video.touch()?;

        let mediainfo = fake_tool(&temp, "mediainfo", &cat_fixture("mediainfo.json")?)?;

        let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
        let assert = cmd
            .arg("-i")
            .arg(video.path())
            .arg("-m")
            .arg(&mediainfo)
            .arg("-s")
            .assert();

        assert.success().stdout(
            predicate::str::contains("  Profile: 7")
                .and(predicate::str::contains("--max-cll \"1000,400\"")),
        );
        temp.child("movie_fel_data.txt")
            .assert(predicate::path::is_file());

        Ok(())
    }
}
