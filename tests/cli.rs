use std::process::{Command, Output};

use imgbench::schema::ReportRow;
use tempfile::tempdir;

fn imgbench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgbench"))
        .args(args)
        .env_remove("IMGBENCH_IMAGE")
        .env_remove("IMGBENCH_OUTPUT_DIR")
        .output()
        .expect("failed to spawn imgbench")
}

#[test]
fn unknown_slug_exits_1_without_report() {
    let out = imgbench(&["--impl", "nonexistent-slug"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No implementations match"), "{stderr}");
}

#[test]
fn task_and_slug_mismatch_is_empty() {
    let out = imgbench(&["--task", "grayscale", "--impl", "ndarray-invert", "--list"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn synthetic_json_run_writes_report_and_image() {
    let dir = tempdir().unwrap();
    let output_dir = dir.path().join("out");
    let out = imgbench(&[
        "--synthetic",
        "16x12",
        "--seed",
        "5",
        "--impl",
        "ndarray-invert",
        "-n",
        "3",
        "--format",
        "json",
        "--output-dir",
        output_dir.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let rows: Vec<ReportRow> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slug, "ndarray-invert");
    assert_eq!(rows[0].iterations, 3);
    assert_eq!(rows[0].times.len(), 3);

    assert!(output_dir.join("ndarray-invert.png").is_file());
    assert!(output_dir.join("synthetic-16x12-seed5.png").is_file());
}

#[test]
fn csv_report_to_file() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("report.csv");
    let out = imgbench(&[
        "--synthetic",
        "8x8",
        "--task",
        "rotate_90",
        "-n",
        "2",
        "--format",
        "csv",
        "--output-dir",
        dir.path().to_str().unwrap(),
        "--out",
        report.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let text = std::fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "task,slug,description,iterations,mean,median,std_dev,min,max,total"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1..].iter().all(|l| l.starts_with("rotate_90,")));
}

#[test]
fn list_prints_selection_in_order() {
    let out = imgbench(&["--task", "invert", "--list", "--include-native"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let slugs: Vec<&str> = stdout
        .lines()
        .skip(1)
        .filter_map(|l| l.split_whitespace().nth(1))
        .collect();
    assert_eq!(
        slugs,
        [
            "ndarray-invert",
            "ndarray-absdiff",
            "image-invert",
            "loop-invert",
            "naive-invert"
        ]
    );
}

#[test]
fn zero_iterations_rejected() {
    let dir = tempdir().unwrap();
    let out = imgbench(&[
        "--synthetic",
        "4x4",
        "-n",
        "0",
        "--output-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn missing_image_fails_without_report() {
    let dir = tempdir().unwrap();
    let out = imgbench(&[
        "--image",
        dir.path().join("missing.png").to_str().unwrap(),
        "--impl",
        "loop-invert",
        "--output-dir",
        dir.path().to_str().unwrap(),
    ]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to load image"));
}

#[test]
fn progress_is_printed_regardless_of_log_filter() {
    let dir = tempdir().unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_imgbench"))
        .args([
            "--synthetic",
            "6x6",
            "--impl",
            "image-rotate45",
            "-n",
            "1",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .env_remove("IMGBENCH_IMAGE")
        .env_remove("IMGBENCH_OUTPUT_DIR")
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to spawn imgbench");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Running image-rotate45..."), "{stderr}");
    assert!(dir.path().join("image-rotate45.png").is_file());
}
