//! LVLExplorer: browse the chunk tree of Star Wars Battlefront II containers.
//!
//! Without a subcommand the native window opens (optionally loading FILE).
//! The subcommands run the same projection, search and selection headless.

mod config;
mod cui;
mod explorer;
mod gui;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use config::ViewerConfig;
use logging::LogBuffer;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the chunk tree with positions and sizes
    Tree {
        /// Container file (.lvl, .bnk, .zafbin, .zaabin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print what selecting a chunk shows
    Dump {
        /// Container file (.lvl, .bnk, .zafbin, .zaabin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Dotted child-index path below the root chunk, e.g. `0.3.1` (default: root chunk)
        #[arg(value_name = "PATH")]
        path: Option<String>,
    },
    /// Highlight nodes matching QUERY and list them
    Search {
        /// Container file (.lvl, .bnk, .zafbin, .zaabin)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Case-sensitive text matched against labels and chunk dumps
        #[arg(value_name = "QUERY")]
        query: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "lvlexplorer",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Container file to open in the window
    file: Option<PathBuf>,
}

/// Headless subcommands; they never touch the viewer settings.
fn run_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Tree { file } => cui::tree::print_tree(&file),
        Commands::Dump { file, path } => cui::dump::dump_chunk(&file, path.as_deref()),
        Commands::Search { file, query } => cui::search::search_file(&file, &query),
    }
}

fn main() {
    let args = Args::parse();

    let log = LogBuffer::new(500);
    logging::init(log.clone());

    let result = match args.command {
        Some(command) => run_command(command),
        None => {
            let config = ViewerConfig::load();
            log.set_capacity(config.log_lines);
            gui::run_gui(args.file, config, log)
        }
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
