use super::{AppContext, CodemarkCommand};
use codemark::error::{CodemarkError, Result};
use serde::{Deserialize, Serialize};

fn set_enabled(ctx: &AppContext, bookmark: &str, enabled: bool) -> Result<()> {
    let record = ctx
        .db
        .get_rec_by_bookmark(bookmark)?
        .ok_or_else(|| CodemarkError::UnknownBookmark(bookmark.to_string()))?;

    if record.enabled == enabled {
        eprintln!(
            "Bookmark '{}' is already {}",
            bookmark,
            if enabled { "enabled" } else { "disabled" }
        );
        return Ok(());
    }

    let mut draft = record.draft();
    draft.enabled = enabled;
    ctx.db.update_rec(record.id, &draft)?;
    eprintln!(
        "{} bookmark '{}'",
        if enabled { "Enabled" } else { "Disabled" },
        bookmark
    );
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnableCommand {
    pub bookmark: String,
}

impl CodemarkCommand for EnableCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        set_enabled(ctx, &self.bookmark, true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisableCommand {
    pub bookmark: String,
}

impl CodemarkCommand for DisableCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        set_enabled(ctx, &self.bookmark, false)
    }
}
