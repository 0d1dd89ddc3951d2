use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

const SUBCOMMAND: &str = "info";

#[test]
fn help() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
    let assert = cmd.arg(SUBCOMMAND).arg("--help").assert();

    assert
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("vvc_tool info [OPTIONS] [input_pos]"));
    Ok(())
}

#[test]
fn single_tile() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;

    let input = Path::new("assets/tests/single_tile.vvc");

    let assert = cmd.arg(SUBCOMMAND).arg(input).assert();

    assert.success().stderr(predicate::str::is_empty()).stdout(
        predicate::str::contains("NAL units: 4")
            .and(predicate::str::contains(
                "  offset 4, length 12: VPS_NUT (14), layer 0, tid 0: VPS 1",
            ))
            .and(predicate::str::contains(
                "  offset 86, length 8: IDR_N_LP (8), layer 0, tid 0: skipped",
            ))
            .and(predicate::str::contains("  Parsed: 3"))
            .and(predicate::str::contains("  Skipped: 1"))
            .and(predicate::str::contains("  Failed: 0"))
            .and(predicate::str::contains(
                "  VPS 1: 1 layer(s), 1 sublayer(s), 1 OLS(s)",
            ))
            .and(predicate::str::contains(
                "  SPS 0: 1920x1080, 4:2:0 10-bit, CTB 128, profile 1, level 51",
            ))
            .and(predicate::str::contains(
                "  PPS 0: 1920x1080, SPS 0, 1 tile(s), 1 slice(s)",
            )),
    );

    Ok(())
}

#[test]
fn failed_units_are_reported() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;

    let input = Path::new("assets/tests/tiled_with_errors.vvc");

    let assert = cmd.arg(SUBCOMMAND).arg("--input").arg(input).assert();

    assert
        .success()
        .stderr(predicate::str::contains("referenced SPS id 3"))
        .stdout(
            predicate::str::contains("NAL units: 6")
                .and(predicate::str::contains(
                    "PPS_NUT (16), layer 0, tid 0: failed (UnresolvedReference): referenced SPS id 3 is not in the parameter set store",
                ))
                .and(predicate::str::contains(
                    "  offset 122, length 5: SPS_NUT (15), layer 0, tid 0: failed (OutOfData): out of data at bit 24: requested 8 bits, 0 available",
                ))
                .and(predicate::str::contains("  Parsed: 3"))
                .and(predicate::str::contains("  Failed: 2"))
                .and(predicate::str::contains(
                    "  PPS 0: 1920x1080, SPS 0, 12 tile(s), 6 slice(s)",
                )),
        );

    Ok(())
}

#[test]
fn json_reports() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;

    let input = Path::new("assets/tests/single_tile.vvc");

    let output = cmd.arg(SUBCOMMAND).arg(input).arg("--json").output()?;
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let reports = reports.as_array().unwrap();

    assert_eq!(reports.len(), 4);
    assert_eq!(reports[0]["offset"], 4);
    assert_eq!(reports[0]["header"]["nal_unit_type"], "VpsNut");
    assert_eq!(
        reports[0]["outcome"]["Parsed"]["Vps"]["vps_video_parameter_set_id"],
        1
    );
    assert_eq!(
        reports[1]["outcome"]["Parsed"]["Sps"]["derived"]["ctb_size_y"],
        128
    );
    assert_eq!(reports[3]["outcome"]["Skipped"], "IdrNLp");

    Ok(())
}

#[test]
fn not_a_byte_stream() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;

    let input = Path::new("assets/tests/not_annexb.bin");

    let assert = cmd.arg(SUBCOMMAND).arg(input).assert();

    assert
        .failure()
        .stderr(predicate::str::contains("no Annex B start code found"));

    Ok(())
}

#[test]
fn conflicting_inputs() -> Result<()> {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;

    let input = Path::new("assets/tests/single_tile.vvc");

    let assert = cmd
        .arg(SUBCOMMAND)
        .arg(input)
        .arg("--input")
        .arg(input)
        .assert();

    assert
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));

    Ok(())
}
