// src/bin/cli.rs
use clap::Parser;
use filmarks_badge::cli::{self, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    let level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    filmarks_badge::log::init(level, args.verbose)?;

    cli::run(args).map_err(|e| color_eyre::eyre::eyre!("{e}"))
}
