use anyhow::Result;
use clap::Parser;

mod commands;
use commands::Command;

mod vvc;
use vvc::{exporter::Exporter, info::VvcInfo};

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Inspects VVC (H.266) parameter sets", author = "quietvoid", version = env!("CARGO_PKG_VERSION"))]
struct Opt {
    #[arg(
        long,
        short = 'v',
        global = true,
        help = "Logs every NAL unit. RUST_LOG takes precedence"
    )]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    let default_filter = if opt.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match opt.cmd {
        Command::Info(args) => VvcInfo::info(args),
        Command::Export(args) => Exporter::export(args),
    }
}
