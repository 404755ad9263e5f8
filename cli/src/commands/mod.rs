use codemark::config::Config;
use codemark::db::CodemarkDb;
use codemark::error::Result;

pub struct AppContext<'a> {
    pub db: &'a CodemarkDb,
    pub config: &'a Config,
}

pub mod edit;
pub mod import_export;
pub mod list;
pub mod process;
pub mod toggle;

pub trait CodemarkCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn CodemarkCommand>)
pub enum CommandEnum {
    List(list::ListCommand),
    Edit(edit::EditCommand),
    Process(process::ProcessCommand),
    Enable(toggle::EnableCommand),
    Disable(toggle::DisableCommand),
    Export(import_export::ExportCommand),
    Import(import_export::ImportCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            Self::List(cmd) => cmd.execute(ctx),
            Self::Edit(cmd) => cmd.execute(ctx),
            Self::Process(cmd) => cmd.execute(ctx),
            Self::Enable(cmd) => cmd.execute(ctx),
            Self::Disable(cmd) => cmd.execute(ctx),
            Self::Export(cmd) => cmd.execute(ctx),
            Self::Import(cmd) => cmd.execute(ctx),
        }
    }
}
