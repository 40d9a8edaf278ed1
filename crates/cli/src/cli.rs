//! Command-line interface for Strand.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use strand_codegen::CompilerConfig;
use strand_codegen::config::TASK_PATH_ENV;

/// strandc - compile Strand syntax trees into stack-machine units
#[derive(Parser)]
#[command(name = "strandc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a JSON syntax tree and write its units
    Build {
        /// Path to the JSON syntax tree
        file: PathBuf,

        /// Directory the unit files are written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        #[command(flatten)]
        unit: UnitArgs,

        /// Also write a `.lst` listing for every unit
        #[arg(long)]
        listing: bool,
    },

    /// Compile a JSON syntax tree without writing anything
    Check {
        /// Path to the JSON syntax tree
        file: PathBuf,

        #[command(flatten)]
        unit: UnitArgs,
    },

    /// Print the instruction listing of a unit file
    List {
        /// Path to a `.unit` file
        unit: PathBuf,
    },
}

#[derive(clap::Args)]
pub struct UnitArgs {
    /// Name of the program unit
    #[arg(long)]
    pub name: Option<String>,

    /// Directories searched for pre-compiled task units
    #[arg(long, env = TASK_PATH_ENV)]
    pub task_path: Option<String>,
}

impl UnitArgs {
    pub fn config(&self) -> CompilerConfig {
        let mut config = CompilerConfig::default();
        if let Some(name) = &self.name {
            config.program_name = name.clone();
        }
        config.task_search_path = self.task_path.clone();
        config
    }
}
