//! End-to-end tests for the `csv2shp` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn csv2shp() -> Command {
    Command::cargo_bin("csv2shp").unwrap()
}

#[test]
fn test_convert_xy() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    let output = dir.path().join("points.shp");
    fs::write(&input, "id;x;y;name\n1;10.5;20.0;alpha\n2;11;21;beta\n").unwrap();

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "xy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 Point feature(s)"));

    assert!(output.exists());
    assert!(output.with_extension("shx").exists());
    assert!(output.with_extension("dbf").exists());
}

#[test]
fn test_convert_positional_without_header() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("points.csv");
    let output = dir.path().join("points.shp");
    fs::write(&input, "5,6,foo\n").unwrap();

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "xy", "-x", "0", "-y", "1", "-d", ",", "--header", "f"])
        .assert()
        .success();

    assert!(output.exists());
}

#[test]
fn test_missing_geometry_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rows.csv");
    let output = dir.path().join("rows.shp");
    fs::write(&input, "id;name\n1;alpha\n").unwrap();

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "wkt", "-g", "geom"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("Hint:"));

    assert!(!output.exists());
}

#[test]
fn test_unrecognized_geometry_type_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rows.csv");
    let output = dir.path().join("rows.shp");
    fs::write(&input, "id;geom\n1;FOO (1 2)\n").unwrap();

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "wkt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FOO"));
}

#[test]
fn test_skip_invalid_rows() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rows.csv");
    let output = dir.path().join("rows.shp");
    fs::write(&input, "id;x;y\n1;0;0\n2;east;0\n3;1;1\n").unwrap();

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "xy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--skip-invalid"));

    csv2shp()
        .arg("convert")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--mode", "xy", "--overwrite", "--skip-invalid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 Point feature(s)"))
        .stdout(predicate::str::contains("Skipped 1 of 3 row(s)"));
}

#[test]
fn test_inspect_prints_schema() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rows.csv");
    fs::write(&input, "id;geom;score\n1;POLYGON ((0 0, 0 1, 1 1, 0 0));0.5\n").unwrap();

    csv2shp()
        .arg("inspect")
        .arg("-i")
        .arg(&input)
        .args(["--mode", "wkt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Polygon"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("Real"));
}

#[test]
fn test_drivers_lists_shapefile() {
    csv2shp()
        .arg("drivers")
        .assert()
        .success()
        .stdout(predicate::str::contains("ESRI Shapefile"));
}

#[test]
fn test_invalid_header_flag() {
    csv2shp()
        .args(["inspect", "-i", "in.csv", "--mode", "xy", "--header", "maybe"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected 't' or 'f'"));
}

#[test]
fn test_invalid_mode() {
    csv2shp()
        .args(["inspect", "-i", "in.csv", "--mode", "foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("foo"));
}

#[test]
fn test_missing_output_flag() {
    csv2shp()
        .args(["convert", "-i", "in.csv", "--mode", "xy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_help_exits_cleanly() {
    csv2shp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"));
}
