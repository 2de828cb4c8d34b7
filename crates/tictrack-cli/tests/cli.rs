use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// Render the same synthetic board the pipeline tests use: white frame,
/// black 3x3 grid from 40 to 200 with 4 px lines.
fn write_grid_png(path: &Path) {
    let size = 240u32;
    let mut img = image::RgbImage::from_pixel(size, size, image::Rgb([255, 255, 255]));
    let bands = [40u32, 92, 144, 196];
    for &b in &bands {
        for t in 0..4 {
            for i in 40..200 {
                img.put_pixel(b + t, i, image::Rgb([0, 0, 0]));
                img.put_pixel(i, b + t, image::Rgb([0, 0, 0]));
            }
        }
    }
    img.save(path).expect("write synthetic frame");
}

#[test]
fn detects_board_in_synthetic_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = dir.path().join("grid.png");
    write_grid_png(&frame);

    Command::cargo_bin("tictrack")
        .expect("binary")
        .arg(&frame)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"board_found\":true"))
        .stdout(predicate::str::contains("\"cells_found\":9"))
        .stdout(predicate::str::contains("\"board\":\".........\""));
}

#[test]
fn writes_annotated_frame_when_requested() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = dir.path().join("grid.png");
    write_grid_png(&frame);
    let out_dir = dir.path().join("annotated");

    Command::cargo_bin("tictrack")
        .expect("binary")
        .arg(&frame)
        .arg("--annotate-dir")
        .arg(&out_dir)
        .assert()
        .success();

    assert!(out_dir.join("grid.png").exists());
}

#[test]
fn reports_annotated_frame_write_failures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = dir.path().join("grid.png");
    write_grid_png(&frame);
    let out_dir = dir.path().join("annotated");
    // Block the output path with a directory of the same name.
    std::fs::create_dir_all(out_dir.join("grid.png")).expect("blocker");

    Command::cargo_bin("tictrack")
        .expect("binary")
        .arg(&frame)
        .arg("--annotate-dir")
        .arg(&out_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to write annotated frame"));
}

#[test]
fn rejects_invalid_params_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let frame = dir.path().join("grid.png");
    write_grid_png(&frame);
    let params = dir.path().join("params.json");
    std::fs::write(&params, "{ not json").expect("write params");

    Command::cargo_bin("tictrack")
        .expect("binary")
        .arg(&frame)
        .arg("--params")
        .arg(&params)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid params file"));
}

#[test]
fn fails_cleanly_on_missing_frame() {
    Command::cargo_bin("tictrack")
        .expect("binary")
        .arg("no-such-frame.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read frame"));
}
