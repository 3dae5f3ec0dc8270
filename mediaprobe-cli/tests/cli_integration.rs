use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

// Helper function to get the path to the compiled binary
fn mediaprobe_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mediaprobe").expect("Failed to find mediaprobe binary");
    cmd.env_remove("MEDIAPROBE_FFPROBE")
        .env_remove("MEDIAPROBE_TIMEOUT")
        .env_remove("MEDIAPROBE_IDLE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../mediaprobe-core/tests/fixtures/big_buck_bunny_720p.json")
}

/// Writes a stand-in ffprobe that prints the fixture JSON.
#[cfg(unix)]
fn fake_ffprobe(dir: &TempDir, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.path().join("fake-ffprobe");
    fs::write(&script, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_info_prints_summary() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = fake_ffprobe(&dir, &format!("cat '{}'", fixture_path().display()));
    let input = dir.path().join("bunny.mp4");
    fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .arg("info")
        .arg(&input)
        .env("MEDIAPROBE_FFPROBE", &script)
        .assert()
        .success()
        .stdout(contains("mov,mp4,m4a,3gp,3g2,mj2 (QuickTime / MOV)"))
        .stdout(contains("00:00:10.005"))
        .stdout(contains("#0 video h264, 1280x720, 29.97 fps, yuv420p"))
        .stdout(contains("#1 audio aac, 48000 Hz, 5.1"))
        .stdout(contains("#2 data"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_info_default_run_keeps_stderr_clean() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = fake_ffprobe(&dir, &format!("cat '{}'", fixture_path().display()));
    let input = dir.path().join("a.mp4");
    fs::write(&input, "dummy content")?;

    // Audio and data streams in the fixture carry "0/0" frame rates
    mediaprobe_cmd()
        .arg("info")
        .arg(&input)
        .arg("--ffprobe")
        .arg(&script)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_info_json_output()-> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = fake_ffprobe(&dir, &format!("cat '{}'", fixture_path().display()));
    let input = dir.path().join("bunny.mp4");
    fs::write(&input, "dummy content")?;

    let output = mediaprobe_cmd()
        .arg("info")
        .arg("--json")
        .arg("--ffprobe")
        .arg(&script)
        .arg(&input)
        .output()?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["streams"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["streams"][1]["codec_type"], "audio");
    assert_eq!(json["format"]["size"], 1_055_736);
    assert_eq!(json["source_path"], input.to_string_lossy().as_ref());

    Ok(())
}

#[test]
fn test_info_non_existent_input() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let missing = dir.path().join("surely/this/does/not/exist.mkv");

    mediaprobe_cmd()
        .arg("info")
        .arg(&missing)
        .assert()
        .code(3)
        .stderr(contains("not found"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_info_idle_timeout_exit_code() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = fake_ffprobe(&dir, "exec sleep 30");
    let input = dir.path().join("stuck.mp4");
    fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .args(["info", "--idle-timeout", "0.5", "--ffprobe"])
        .arg(&script)
        .arg(&input)
        .assert()
        .code(4)
        .stderr(contains("no output"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_info_failing_ffprobe_exit_code() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let script = fake_ffprobe(&dir, "echo 'moov atom not found' >&2\nexit 1");
    let input = dir.path().join("broken.mp4");
    fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .arg("info")
        .arg(&input)
        .env("MEDIAPROBE_FFPROBE", &script)
        .assert()
        .code(5)
        .stderr(contains("moov atom not found"));

    Ok(())
}

#[test]
fn test_command_prints_invocation() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("my movie.mkv");
    fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .arg("command")
        .arg(&input)
        .arg("--ffprobe")
        .arg("ffprobe")
        .assert()
        .success()
        .stdout(contains("ffprobe -v quiet -print_format json -show_format -show_streams -i '"))
        .stdout(contains("my movie.mkv'"));

    Ok(())
}

#[test]
fn test_invalid_timeout_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("a.mp4");
    fs::write(&input, "dummy content")?;

    mediaprobe_cmd()
        .args(["info", "--timeout", "soon"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("not a number of seconds"));

    mediaprobe_cmd()
        .args(["info", "--timeout", "0"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(contains("positive").and(contains("--timeout")));

    Ok(())
}
