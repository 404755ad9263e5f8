//! The admin editor's working set: the in-memory, not-yet-persisted
//! collection of rows during one editing session.
//!
//! The session owns the full row list explicitly. "Add another block"
//! mutates only this transient state; nothing reaches the store until
//! [`EditorSession::save`], which validates the whole set first and then
//! applies all writes in one transaction.

use std::fmt;

use crate::db::{CodemarkDb, SaveSummary, StoreOp};
use crate::error::{CodemarkError, Result};
use crate::models::bookmark::{BookmarkDraft, BookmarkRecord};

/// One editable row: either an existing record (carries an id) or a new
/// one (no id until saved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorRow {
    pub id: Option<i64>,
    pub bookmark: String,
    pub title: String,
    pub code: String,
    pub enabled: bool,
    /// Marked for deletion on the next save.
    pub remove: bool,
}

impl EditorRow {
    fn from_record(record: &BookmarkRecord) -> Self {
        Self {
            id: Some(record.id),
            bookmark: record.bookmark.clone(),
            title: record.title.clone(),
            code: record.code.clone(),
            enabled: record.enabled,
            remove: false,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    fn draft(&self) -> BookmarkDraft {
        BookmarkDraft {
            bookmark: self.bookmark.clone(),
            title: self.title.clone(),
            code: self.code.clone(),
            enabled: self.enabled,
        }
    }
}

/// A validation failure attributed to one row (1-based, as displayed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {}: {}", self.row, self.message)
    }
}

pub struct EditorSession {
    rows: Vec<EditorRow>,
}

impl EditorSession {
    /// Load all persisted records into a fresh working set. An empty store
    /// seeds exactly one blank row.
    pub fn load(db: &CodemarkDb) -> Result<Self> {
        let mut rows: Vec<EditorRow> = db
            .get_rec_all()?
            .iter()
            .map(EditorRow::from_record)
            .collect();
        if rows.is_empty() {
            rows.push(EditorRow::default());
        }
        Ok(Self { rows })
    }

    /// Append one blank new row. Existing rows, including unsaved edits,
    /// are untouched.
    pub fn add_row(&mut self) {
        self.rows.push(EditorRow::default());
    }

    pub fn rows(&self) -> &[EditorRow] {
        &self.rows
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut EditorRow> {
        self.rows.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check the whole working set. Rows marked for removal are exempt;
    /// every other row needs a non-empty identifier and title, and no two
    /// surviving rows may share an identifier.
    pub fn validate(&self) -> Vec<RowError> {
        let mut errors = Vec::new();
        let surviving: Vec<(usize, &EditorRow)> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.remove)
            .collect();

        for (idx, row) in &surviving {
            if row.bookmark.trim().is_empty() {
                errors.push(RowError {
                    row: idx + 1,
                    message: "bookmark identifier is required".to_string(),
                });
            }
            if row.title.trim().is_empty() {
                errors.push(RowError {
                    row: idx + 1,
                    message: "title is required".to_string(),
                });
            }
        }

        for (pos, (idx, row)) in surviving.iter().enumerate() {
            if row.bookmark.trim().is_empty() {
                continue;
            }
            let first_use = surviving[..pos]
                .iter()
                .any(|(_, earlier)| earlier.bookmark == row.bookmark);
            if first_use {
                errors.push(RowError {
                    row: idx + 1,
                    message: format!("duplicate bookmark identifier '{}'", row.bookmark),
                });
            }
        }

        errors.sort_by_key(|e| e.row);
        errors
    }

    /// Persist the working set: delete removed rows that have an id,
    /// silently discard removed rows that never got one, update rows with
    /// an id, insert the rest.
    ///
    /// All-or-nothing: any validation failure aborts the save before a
    /// single write, and the write pass itself runs in one transaction.
    /// On success the session reloads from the store, so new rows carry
    /// their assigned ids.
    pub fn save(&mut self, db: &CodemarkDb) -> Result<SaveSummary> {
        let errors = self.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(RowError::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CodemarkError::Validation(joined));
        }

        let mut ops = Vec::new();
        for row in &self.rows {
            if row.remove {
                if let Some(id) = row.id {
                    ops.push(StoreOp::Delete(id));
                }
                continue;
            }
            match row.id {
                Some(id) => ops.push(StoreOp::Update(id, row.draft())),
                None => ops.push(StoreOp::Insert(row.draft())),
            }
        }

        let summary = db.apply_working_set(&ops)?;
        self.rows = Self::load(db)?.rows;
        Ok(summary)
    }
}
