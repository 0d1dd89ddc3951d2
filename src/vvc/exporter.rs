use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;

use super::{input_from_either, parse_vvc_file};
use crate::commands::ExportArgs;

pub struct Exporter {
    input: PathBuf,
    output: PathBuf,
}

impl Exporter {
    pub fn export(args: ExportArgs) -> Result<()> {
        let ExportArgs {
            input,
            input_pos,
            output,
        } = args;

        let input = input_from_either("export", input, input_pos)?;
        let exporter = Exporter { input, output };

        println!("Parsing VVC file...");
        stdout().flush().ok();

        exporter.execute()?;

        println!("Done.");

        Ok(())
    }

    fn execute(&self) -> Result<()> {
        let (reports, _) = parse_vvc_file(&self.input)?;

        println!("Exporting {} NAL unit reports...", reports.len());

        let mut writer = BufWriter::with_capacity(100_000, File::create(&self.output)?);
        serde_json::to_writer_pretty(&mut writer, &reports)?;
        writer.flush()?;

        Ok(())
    }
}
