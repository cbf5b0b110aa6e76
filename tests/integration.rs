use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn input_file(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("clip.mp4");
    std::fs::write(&path, b"not really a video").unwrap();
    path
}

#[test]
fn test_requires_input_and_output() {
    cargo_bin_cmd!("loudclean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));

    cargo_bin_cmd!("loudclean")
        .arg("clip.mp4")
        .assert()
        .failure();
}

#[test]
fn test_help_lists_options() {
    cargo_bin_cmd!("loudclean")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--target-i"))
        .stdout(predicate::str::contains("--audio-bitrate"))
        .stdout(predicate::str::contains("--measure-only"));
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    cargo_bin_cmd!("loudclean")
        .args([
            dir.path().join("nope.mp4").to_str().unwrap(),
            dir.path().join("out.mp4").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a file"));
}

#[test]
fn test_missing_ffprobe_binary() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(dir.path());

    cargo_bin_cmd!("loudclean")
        .arg(&input)
        .arg(dir.path().join("out.mp4"))
        .args(["--ffprobe", "/nonexistent/ffprobe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch"));
}

#[test]
fn test_target_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(dir.path());

    cargo_bin_cmd!("loudclean")
        .arg(&input)
        .arg(dir.path().join("out.mp4"))
        .args(["--target-i", "3", "--ffprobe", "/nonexistent/ffprobe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid options"));
}

#[test]
fn test_negative_target_is_accepted_by_parser() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(dir.path());

    // Parsing succeeds; the run then fails at the missing ffprobe.
    cargo_bin_cmd!("loudclean")
        .arg(&input)
        .arg(dir.path().join("out.mp4"))
        .args(["--target-i", "-23", "--ffprobe", "/nonexistent/ffprobe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch"));
}

#[test]
fn test_same_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(dir.path());

    cargo_bin_cmd!("loudclean")
        .arg(&input)
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be different"));
}

#[test]
fn test_output_parent_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let input = input_file(dir.path());
    let output = dir.path().join("nested/deeper/out.mp4");

    // Directory creation happens before the first tool runs.
    cargo_bin_cmd!("loudclean")
        .arg(&input)
        .arg(&output)
        .args(["--ffprobe", "/nonexistent/ffprobe"])
        .assert()
        .failure();

    assert!(dir.path().join("nested/deeper").is_dir());
    assert!(!output.exists());
}
