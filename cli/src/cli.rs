use clap::{Parser, Subcommand};
use codemark::config::Config;
use codemark::db::CodemarkDb;
use codemark::error::Result;
use std::path::PathBuf;

use crate::commands::edit::EditCommand;
use crate::commands::import_export::{ExportCommand, ImportCommand};
use crate::commands::list::ListCommand;
use crate::commands::process::ProcessCommand;
use crate::commands::toggle::{DisableCommand, EnableCommand};
use crate::commands::{AppContext, CommandEnum};

#[derive(Parser)]
#[command(author, version, about = "Manage bookmark code blocks and replace their placeholders in content", long_about = None)]
pub struct Cli {
    /// Optional custom database file path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Optional custom configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List bookmark code blocks
    List {
        /// Output format: json, yaml, toml or plain
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Edit bookmark code blocks interactively
    Edit,

    /// Replace [bookmark:...] placeholders in a text
    Process {
        /// Input file (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Language code handed through the filter pipeline
        #[arg(long, default_value = "en")]
        lang: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Enable a bookmark by identifier
    Enable {
        /// Bookmark identifier
        bookmark: String,
    },

    /// Disable a bookmark by identifier
    Disable {
        /// Bookmark identifier
        bookmark: String,
    },

    /// Export bookmark definitions to a file (.json, .yaml or .toml)
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Import bookmark definitions from a file (.json, .yaml or .toml)
    Import {
        /// Source file
        file: PathBuf,

        /// Remove all existing records before importing
        #[arg(long)]
        replace: bool,
    },
}

pub fn handle_args(args: Cli, db: &CodemarkDb, config: &Config) -> Result<()> {
    let ctx = AppContext { db, config };

    let command = match args.command {
        Commands::List { format } => CommandEnum::List(ListCommand {
            format,
            nc: args.nc,
        }),
        Commands::Edit => CommandEnum::Edit(EditCommand),
        Commands::Process { file, lang, output } => {
            CommandEnum::Process(ProcessCommand { file, lang, output })
        }
        Commands::Enable { bookmark } => CommandEnum::Enable(EnableCommand { bookmark }),
        Commands::Disable { bookmark } => CommandEnum::Disable(DisableCommand { bookmark }),
        Commands::Export { file } => CommandEnum::Export(ExportCommand { file }),
        Commands::Import { file, replace } => {
            CommandEnum::Import(ImportCommand { file, replace })
        }
    };

    command.execute(&ctx)
}
