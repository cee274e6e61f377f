mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{access_map, areas, curves, opportunities, palma};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    match &cli.command {
        Commands::Areas(args) => areas::run(&cli, args),
        Commands::Curves(args) => curves::run(&cli, args),
        Commands::AccessMap(args) => access_map::run(&cli, args),
        Commands::Palma(args) => palma::run(&cli, args),
        Commands::Opportunities(args) => opportunities::run(&cli, args),
    }
}

/// `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> anyhow::Result<()> { run() }
