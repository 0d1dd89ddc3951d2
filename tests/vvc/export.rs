use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

const SUBCOMMAND: &str = "export";

#[test]
fn help() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.arg(SUBCOMMAND).arg("--help").assert();

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains(
            "vvc_tool export [OPTIONS] [input_pos]",
        ));
    Ok(())
}

#[test]
fn exports_json() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let temp = assert_fs::TempDir::new().unwrap();

    let input = Path::new("assets/tests/tiled_with_errors.vvc");
    let output_json = temp.child("tiled.json");

    let assert = cmd
        .arg(SUBCOMMAND)
        .arg(input)
        .arg("--output")
        .arg(output_json.as_ref())
        .assert();

    assert
        .success()
        .stdout(predicate::str::contains("Exporting 6 NAL unit reports..."));

    output_json.assert(predicate::path::is_file());

    let json = std::fs::read_to_string(output_json.path())?;
    assert!(json.contains("\"Skipped\": \"IdrNLp\""));
    assert!(json.contains("\"UnresolvedReference\""));
    assert!(json.contains("\"slice_top_left_tile_idx\""));

    Ok(())
}

#[test]
fn default_output_file() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let temp = assert_fs::TempDir::new().unwrap();

    let root_path = Path::new(env!("CARGO_MANIFEST_DIR"));
    let input = root_path.join("assets/tests/single_tile.vvc");

    let assert = cmd
        .current_dir(temp.path())
        .arg(SUBCOMMAND)
        .arg("-i")
        .arg(input)
        .assert();

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("Done."));

    temp.child("VVC_export.json")
        .assert(predicate::path::is_file());

    Ok(())
}
