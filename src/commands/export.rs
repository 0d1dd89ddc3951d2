use std::path::PathBuf;

use clap::{Args, ValueHint};

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(
        id = "input",
        help = "Sets the input VVC file to use",
        long,
        short = 'i',
        conflicts_with = "input_pos",
        required_unless_present = "input_pos",
        value_hint = ValueHint::FilePath,
    )]
    pub input: Option<PathBuf>,

    #[arg(
        id = "input_pos",
        help = "Sets the input VVC file to use (positional)",
        conflicts_with = "input",
        required_unless_present = "input",
        value_hint = ValueHint::FilePath
    )]
    pub input_pos: Option<PathBuf>,

    #[arg(
        id = "output",
        help = "Output JSON file name",
        long,
        short = 'o',
        default_value = "VVC_export.json",
        value_hint = ValueHint::FilePath
    )]
    pub output: PathBuf,
}
