use clap::Parser;

mod export;
mod info;

pub use export::ExportArgs;
pub use info::InfoArgs;

#[derive(Parser, Debug)]
pub enum Command {
    #[command(about = "Lists the NAL units of a VVC file and the parameter sets found")]
    Info(InfoArgs),

    #[command(about = "Exports the parsed NAL units of a VVC file to JSON")]
    Export(ExportArgs),
}
