use super::{AppContext, CodemarkCommand};
use codemark::error::Result;

/// Launches the interactive working-set editor.
#[derive(Debug, Clone, Copy)]
pub struct EditCommand;

impl CodemarkCommand for EditCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        crate::session::run(ctx)
    }
}
