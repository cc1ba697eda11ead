use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command running in an empty directory so no config file is discovered
fn sceneline(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("sceneline").unwrap();
    cmd.current_dir(workdir)
        .env_remove("SCENELINE_API_KEY")
        .env_remove("RUST_LOG")
        .arg("--store-dir")
        .arg(workdir.join("projects"));
    cmd
}

fn write_chunks(dir: &Path, count: usize) {
    fs::create_dir_all(dir).unwrap();
    for index in 0..count {
        fs::write(dir.join(format!("chunk-{:04}.mp4", index)), b"not really video").unwrap();
    }
}

#[test]
fn test_timecode_prints_canonical_form() {
    let dir = TempDir::new().unwrap();
    sceneline(dir.path())
        .args(["timecode", "01:30.500", "garbage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:01:30.500"))
        .stdout(predicate::str::contains("\"recognized\": false"));
}

#[test]
fn test_plan_lists_chunks() {
    let dir = TempDir::new().unwrap();
    sceneline(dir.path())
        .args(["plan", "--duration", "700"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chunk-0002"))
        .stdout(predicate::str::contains("chunk-0003").not());
}

#[test]
fn test_plan_rejects_bad_window() {
    let dir = TempDir::new().unwrap();
    sceneline(dir.path())
        .args(["plan", "--duration", "700", "--window", "0"])
        .assert()
        .failure();
}

#[test]
fn test_plan_rejects_tiny_window() {
    let dir = TempDir::new().unwrap();
    sceneline(dir.path())
        .args(["plan", "--duration", "1000000", "--window", "1e-12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than"));
}

#[test]
fn test_analyze_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    write_chunks(&dir.path().join("chunks"), 1);

    sceneline(dir.path())
        .args(["project", "create", "--name", "demo", "--duration", "60", "--id", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"));

    sceneline(dir.path())
        .args(["analyze", "--project", "demo", "--chunks", "chunks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credential"));

    sceneline(dir.path())
        .args(["progress", "--project", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"uploaded\""));
}

#[test]
fn test_replayed_analysis_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_chunks(&dir.path().join("chunks"), 2);

    let replay = dir.path().join("replay");
    fs::create_dir_all(&replay).unwrap();
    fs::write(
        replay.join("chunk-0000.json"),
        r#"{"scenes": [{"startTime": "00:00.000", "endTime": "00:05.000", "description": "title"}]}"#,
    )
    .unwrap();
    fs::write(
        replay.join("chunk-0001.json"),
        "```json\n{\"scenes\": [{\"startTime\": \"01:30.000\", \"endTime\": \"01:35.000\", \"description\": \"crowd\"}]}\n```",
    )
    .unwrap();

    sceneline(dir.path())
        .args(["project", "create", "--name", "reel", "--duration", "400", "--id", "reel"])
        .assert()
        .success();

    sceneline(dir.path())
        .args([
            "analyze", "--project", "reel", "--chunks", "chunks", "--replay", "replay", "--api-key",
            "offline",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chunksSucceeded\": 2"));

    sceneline(dir.path())
        .args(["scenes", "--project", "reel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("00:05:30.000"))
        .stdout(predicate::str::contains("crowd"));

    sceneline(dir.path())
        .args(["progress", "--project", "reel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"progress\": 100"))
        .stdout(predicate::str::contains("\"scenesFound\": 2"));
}
