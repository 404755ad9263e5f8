use super::{AppContext, CodemarkCommand};
use codemark::error::Result;
use codemark::eval::evaluator_from_config;
use codemark::filter::PlaceholderFilter;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessCommand {
    pub file: Option<PathBuf>,
    pub lang: String,
    pub output: Option<PathBuf>,
}

impl CodemarkCommand for ProcessCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let text = match &self.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let evaluator = evaluator_from_config(ctx.config)?;
        let filter = PlaceholderFilter::new(ctx.db, evaluator.as_ref());
        let result = filter.process(&text, &self.lang);

        match &self.output {
            Some(path) => std::fs::write(path, &result.text)?,
            None => print!("{}", result.text),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemark::config::{Config, EvaluatorChoice};
    use codemark::db::CodemarkDb;
    use codemark::models::bookmark::BookmarkDraft;

    fn seeded_db() -> CodemarkDb {
        let db = CodemarkDb::init_in_memory().expect("Failed to init in-memory DB");
        db.add_rec(&BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true))
            .unwrap();
        db.add_rec(&BookmarkDraft::new("off", "Off", "echo 'X'", false))
            .unwrap();
        db
    }

    #[test]
    fn test_process_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        std::fs::write(&input, "A [bookmark:hello] B [bookmark:off]!").unwrap();

        let db = seeded_db();
        let config = Config::default();
        let ctx = AppContext {
            db: &db,
            config: &config,
        };

        ProcessCommand {
            file: Some(input),
            lang: "en".to_string(),
            output: Some(output.clone()),
        }
        .execute(&ctx)
        .unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "A Hi B !");
    }

    #[test]
    fn test_process_fails_when_native_is_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "x").unwrap();

        let db = seeded_db();
        let config = Config {
            evaluator: EvaluatorChoice::Native,
            allow_native: false,
            ..Config::default()
        };
        let ctx = AppContext {
            db: &db,
            config: &config,
        };

        let result = ProcessCommand {
            file: Some(input),
            lang: "en".to_string(),
            output: None,
        }
        .execute(&ctx);
        assert!(result.is_err());
    }
}
