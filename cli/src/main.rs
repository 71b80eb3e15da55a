mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{explore, lookup, render};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    commands::init_logging(cli.verbose);
    match &cli.command {
        Commands::Render(args) => render::run(&cli, args),
        Commands::Lookup(args) => lookup::run(&cli, args),
        Commands::Explore(args) => explore::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
