use super::{AppContext, CodemarkCommand};
use codemark::error::Result;
use codemark::import_export;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportCommand {
    pub file: PathBuf,
}

impl CodemarkCommand for ExportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let count = import_export::export_to_file(ctx.db, &self.file)?;
        eprintln!("Exported {} bookmark(s) to {:?}", count, self.file);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportCommand {
    pub file: PathBuf,
    pub replace: bool,
}

impl CodemarkCommand for ImportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let summary = import_export::import_from_file(ctx.db, &self.file, self.replace)?;
        if summary.removed > 0 {
            eprintln!("Removed {} existing bookmark(s)", summary.removed);
        }
        eprintln!(
            "Imported {} new and {} updated bookmark(s) from {:?}",
            summary.added, summary.updated, self.file
        );
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
    fn test_export_import_round_trip_between_stores() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bookmarks.yaml");

        let source = CodemarkDb::init_in_memory().unwrap();
        source
            .add_rec(&BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true))
            .unwrap();
        let config = Config::default();

        ExportCommand { file: file.clone() }
            .execute(&AppContext {
                db: &source,
                config: &config,
            })
            .unwrap();

        let target = CodemarkDb::init_in_memory().unwrap();
        ImportCommand {
            file,
            replace: false,
        }
        .execute(&AppContext {
            db: &target,
            config: &config,
        })
        .unwrap();

        let records = target.get_rec_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bookmark, "hello");
        assert!(records[0].enabled);
    }
}
