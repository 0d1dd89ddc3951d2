pub mod exporter;
pub mod info;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Result};

use vvc_bitstream::demuxer::find_start_code;
use vvc_bitstream::{NalReport, ParameterSetStore, VvcBitstream};

pub fn input_from_either(cmd: &str, in1: Option<PathBuf>, in2: Option<PathBuf>) -> Result<PathBuf> {
    match in1 {
        Some(in1) => Ok(in1),
        None => match in2 {
            Some(in2) => Ok(in2),
            None => bail!("No input file provided. See `vvc_tool {} --help`", cmd),
        },
    }
}

/// Reads a whole Annex B file and parses every NAL unit in it.
pub fn parse_vvc_file(input: &Path) -> Result<(Vec<NalReport>, ParameterSetStore)> {
    let data = fs::read(input)?;

    ensure!(
        find_start_code(&data, 0).is_some(),
        "{}: no Annex B start code found, not a VVC byte stream",
        input.display()
    );

    let mut parser = VvcBitstream::new();
    let reports = parser.parse_stream(&data);

    Ok((reports, parser.into_store()))
}
