use super::{AppContext, CodemarkCommand};
use crate::format::OutputFormat;
use codemark::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCommand {
    pub format: Option<String>,
    pub nc: bool,
}

impl CodemarkCommand for ListCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let records = ctx.db.get_rec_all()?;
        if records.is_empty() {
            eprintln!("No bookmark code blocks defined.");
            return Ok(());
        }

        let format: OutputFormat = self
            .format
            .as_deref()
            .map(OutputFormat::from_string)
            .unwrap_or(OutputFormat::Colored);

        format.print_records(&records, self.nc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemark::config::Config;
    use codemark::db::CodemarkDb;
    use codemark::models::bookmark::BookmarkDraft;

    #[test]
    fn test_list_runs_on_empty_and_populated_store() {
        let db = CodemarkDb::init_in_memory().expect("Failed to init in-memory DB");
        let config = Config::default();
        let ctx = AppContext {
            db: &db,
            config: &config,
        };

        let cmd = ListCommand {
            format: Some("plain".to_string()),
            nc: true,
        };
        assert!(cmd.execute(&ctx).is_ok());

        db.add_rec(&BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true))
            .unwrap();
        assert!(cmd.execute(&ctx).is_ok());
    }
}
