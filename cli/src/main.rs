mod cli;
mod commands;
mod format;
mod output;
mod session;

use clap::Parser;
use codemark::{config, db, error::Result, utils};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logger
    env_logger::init();

    let db_path = if let Some(path) = &args.db {
        path.clone()
    } else {
        utils::get_default_dbdir().join("bookmarks.db")
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = db::CodemarkDb::init(&db_path)?;
    log::debug!("using database at {:?}", db_path);

    // Load configuration
    let cfg = if let Some(config_path) = &args.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()
    };

    cli::handle_args(args, &db, &cfg)?;

    Ok(())
}
