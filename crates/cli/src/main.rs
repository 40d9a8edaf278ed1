mod cli;
mod logging;
mod pipeline;

use clap::Parser;
use cli::{Cli, Commands};
use pipeline::{build_file, check_file, list_unit};
use std::process;
use tracing::info;

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Build {
            file,
            out,
            unit,
            listing,
        } => {
            let mut config = unit.config();
            config.output_dir = out;
            config.emit_listing = listing;
            build_file(&file, config).map(|paths| {
                for path in paths {
                    println!("{}", path.display());
                }
            })
        }
        Commands::Check { file, unit } => check_file(&file, unit.config()).map(|compilation| {
            info!(units = compilation.unit_count(), "check passed");
        }),
        Commands::List { unit } => list_unit(&unit).map(|listing| print!("{listing}")),
    };

    if let Err(error) = result {
        eprintln!("error: {error}");
        process::exit(1);
    }
}
