//! Export and import of bookmark definitions.
//!
//! Definitions travel without ids or timestamps; import matches on the
//! bookmark identifier and upserts. The file format follows the extension:
//! `.json`, `.yaml`/`.yml` or `.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::db::CodemarkDb;
use crate::error::{CodemarkError, Result};
use crate::models::bookmark::BookmarkDraft;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ExportFile {
    bookmarks: Vec<BookmarkDraft>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

fn detect_format(path: &Path) -> Result<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
        Some("toml") => Ok(FileFormat::Toml),
        _ => Err(CodemarkError::ImportExport(format!(
            "unsupported file extension for {:?} (expected .json, .yaml or .toml)",
            path
        ))),
    }
}

/// Write every bookmark definition to `path`. Returns the number exported.
pub fn export_to_file(db: &CodemarkDb, path: &Path) -> Result<usize> {
    let format = detect_format(path)?;
    let bookmarks: Vec<BookmarkDraft> = db.get_rec_all()?.iter().map(|r| r.draft()).collect();
    let count = bookmarks.len();
    let file = ExportFile { bookmarks };

    let contents = match format {
        FileFormat::Json => serde_json::to_string_pretty(&file)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
        FileFormat::Yaml => serde_yaml::to_string(&file)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
        FileFormat::Toml => toml::to_string_pretty(&file)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
    };

    fs::write(path, contents)?;
    Ok(count)
}

/// Read bookmark definitions from `path` and upsert them by identifier.
/// With `replace`, the store is emptied first.
pub fn import_from_file(db: &CodemarkDb, path: &Path, replace: bool) -> Result<ImportSummary> {
    let format = detect_format(path)?;
    let contents = fs::read_to_string(path)?;

    let file: ExportFile = match format {
        FileFormat::Json => serde_json::from_str(&contents)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
        FileFormat::Yaml => serde_yaml::from_str(&contents)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
        FileFormat::Toml => toml::from_str(&contents)
            .map_err(|e| CodemarkError::ImportExport(e.to_string()))?,
    };

    for (idx, draft) in file.bookmarks.iter().enumerate() {
        if draft.bookmark.trim().is_empty() || draft.title.trim().is_empty() {
            return Err(CodemarkError::Validation(format!(
                "entry {}: bookmark identifier and title are required",
                idx + 1
            )));
        }
    }

    let mut summary = ImportSummary::default();
    if replace {
        summary.removed = db.clear()?;
    }

    for draft in &file.bookmarks {
        match db.get_rec_by_bookmark(&draft.bookmark)? {
            Some(existing) => {
                db.update_rec(existing.id, draft)?;
                summary.updated += 1;
            }
            None => {
                db.add_rec(draft)?;
                summary.added += 1;
            }
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn seeded_db() -> CodemarkDb {
        let db = CodemarkDb::init_in_memory().expect("Failed to init in-memory DB");
        db.add_rec(&BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true))
            .unwrap();
        db.add_rec(&BookmarkDraft::new("off", "Off", "", false))
            .unwrap();
        db
    }

    #[rstest]
    #[case("bookmarks.json")]
    #[case("bookmarks.yaml")]
    #[case("bookmarks.toml")]
    fn test_export_then_import_restores_definitions(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);

        let source = seeded_db();
        assert_eq!(export_to_file(&source, &path).unwrap(), 2);

        let target = CodemarkDb::init_in_memory().unwrap();
        let summary = import_from_file(&target, &path, false).unwrap();
        assert_eq!(summary.added, 2);
        assert_eq!(summary.updated, 0);

        let records = target.get_rec_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].bookmark, "hello");
        assert_eq!(records[0].code, "echo 'Hi'");
        assert!(records[0].enabled);
        assert_eq!(records[1].bookmark, "off");
    }

    #[test]
    fn test_import_upserts_by_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(
            &path,
            r#"{"bookmarks": [
                {"bookmark": "hello", "title": "Hello v2", "code": "echo 'new'", "enabled": false},
                {"bookmark": "extra", "title": "Extra", "code": "", "enabled": true}
            ]}"#,
        )
        .unwrap();

        let db = seeded_db();
        let summary = import_from_file(&db, &path, false).unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.updated, 1);

        let hello = db.get_rec_by_bookmark("hello").unwrap().unwrap();
        assert_eq!(hello.title, "Hello v2");
        assert!(!hello.enabled);
        assert_eq!(db.get_rec_all().unwrap().len(), 3);
    }

    #[test]
    fn test_import_replace_empties_the_store_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(
            &path,
            r#"{"bookmarks": [{"bookmark": "only", "title": "Only", "code": "", "enabled": true}]}"#,
        )
        .unwrap();

        let db = seeded_db();
        let summary = import_from_file(&db, &path, true).unwrap();
        assert_eq!(summary.removed, 2);
        assert_eq!(summary.added, 1);

        let records = db.get_rec_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bookmark, "only");
    }

    #[test]
    fn test_import_rejects_invalid_entries_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.json");
        fs::write(
            &path,
            r#"{"bookmarks": [{"bookmark": "", "title": "Nameless", "code": "", "enabled": true}]}"#,
        )
        .unwrap();

        let db = CodemarkDb::init_in_memory().unwrap();
        let err = import_from_file(&db, &path, false).unwrap_err();
        assert!(matches!(err, CodemarkError::Validation(_)));
        assert!(db.get_rec_all().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.csv");
        let db = CodemarkDb::init_in_memory().unwrap();
        assert!(matches!(
            export_to_file(&db, &path),
            Err(CodemarkError::ImportExport(_))
        ));
    }
}
