use crate::clock::{SystemTimeSource, TimeSource};
use crate::error::{CodemarkError, Result};
use crate::models::bookmark::{BookmarkDraft, BookmarkRecord};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A single write against the store, produced by the editor's save pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Insert(BookmarkDraft),
    Update(i64, BookmarkDraft),
    Delete(i64),
}

/// Counts reported back after a save pass, used for the confirmation notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

pub struct CodemarkDb {
    conn: Connection,
    db_path: PathBuf,
    clock: Arc<dyn TimeSource>,
}

impl CodemarkDb {
    pub fn init(db_path: &Path) -> Result<Self> {
        Self::with_time_source(db_path, Arc::new(SystemTimeSource))
    }

    pub fn init_in_memory() -> Result<Self> {
        Self::in_memory_with_time_source(Arc::new(SystemTimeSource))
    }

    /// Open a database with an injected time source. `created`/`changed`
    /// values come from the given clock.
    pub fn with_time_source(db_path: &Path, clock: Arc<dyn TimeSource>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn,
            db_path: db_path.to_path_buf(),
            clock,
        };
        db.setup_tables()?;
        Ok(db)
    }

    pub fn in_memory_with_time_source(clock: Arc<dyn TimeSource>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            db_path: PathBuf::from(":memory:"),
            clock,
        };
        db.setup_tables()?;
        Ok(db)
    }

    /// Get the database file path
    pub fn get_path(&self) -> &Path {
        &self.db_path
    }

    fn setup_tables(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE if not exists bookmarks (
                id integer PRIMARY KEY AUTOINCREMENT,
                bookmark text NOT NULL,
                title text NOT NULL,
                code text NOT NULL default '',
                enabled integer NOT NULL default 0,
                created integer NOT NULL,
                changed integer NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<BookmarkRecord> {
        Ok(BookmarkRecord {
            id: row.get(0)?,
            bookmark: row.get(1)?,
            title: row.get(2)?,
            code: row.get(3)?,
            enabled: row.get::<_, i64>(4)? != 0,
            created: row.get(5)?,
            changed: row.get(6)?,
        })
    }

    pub fn get_rec_all(&self) -> Result<Vec<BookmarkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bookmark, title, code, enabled, created, changed
             FROM bookmarks ORDER BY id",
        )?;
        let rows = stmt.query_map([], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn get_rec_by_id(&self, id: i64) -> Result<Option<BookmarkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bookmark, title, code, enabled, created, changed
             FROM bookmarks WHERE id = ?1",
        )?;
        let mut rows = stmt.query([id])?;

        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    /// Look up a record by its bookmark identifier.
    ///
    /// Identifiers are unique at write time, but a table populated before
    /// that rule may still carry duplicates; the lowest id wins and a
    /// warning is logged.
    pub fn get_rec_by_bookmark(&self, bookmark: &str) -> Result<Option<BookmarkRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, bookmark, title, code, enabled, created, changed
             FROM bookmarks WHERE bookmark = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map([bookmark], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        if records.len() > 1 {
            log::warn!(
                "{} records share bookmark identifier '{}'; using id {}",
                records.len(),
                bookmark,
                records[0].id
            );
        }
        Ok(records.into_iter().next())
    }

    /// Whether `bookmark` is already used by a record other than `exclude_id`.
    fn bookmark_taken(&self, bookmark: &str, exclude_id: Option<i64>) -> Result<bool> {
        let count: i64 = match exclude_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM bookmarks WHERE bookmark = ?1 AND id != ?2",
                (bookmark, id),
                |row| row.get(0),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*) FROM bookmarks WHERE bookmark = ?1",
                [bookmark],
                |row| row.get(0),
            )?,
        };
        Ok(count > 0)
    }

    /// Insert a new record. Sets `created` and `changed` to the same
    /// timestamp and returns the assigned id.
    pub fn add_rec(&self, draft: &BookmarkDraft) -> Result<i64> {
        if self.bookmark_taken(&draft.bookmark, None)? {
            return Err(CodemarkError::DuplicateBookmark(draft.bookmark.clone()));
        }

        let now = self.clock.now();
        self.conn.execute(
            "INSERT INTO bookmarks (bookmark, title, code, enabled, created, changed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &draft.bookmark,
                &draft.title,
                &draft.code,
                draft.enabled as i64,
                now,
                now,
            ),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Update all mutable fields of an existing record and refresh `changed`.
    pub fn update_rec(&self, id: i64, draft: &BookmarkDraft) -> Result<()> {
        if self.bookmark_taken(&draft.bookmark, Some(id))? {
            return Err(CodemarkError::DuplicateBookmark(draft.bookmark.clone()));
        }

        let now = self.clock.now();
        let affected = self.conn.execute(
            "UPDATE bookmarks SET bookmark = ?1, title = ?2, code = ?3, enabled = ?4, changed = ?5
             WHERE id = ?6",
            (
                &draft.bookmark,
                &draft.title,
                &draft.code,
                draft.enabled as i64,
                now,
                id,
            ),
        )?;
        if affected == 0 {
            return Err(CodemarkError::BookmarkNotFound(id));
        }
        Ok(())
    }

    /// Delete a record by id. Deleting a missing id is tolerated.
    pub fn delete_rec(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
        if affected == 0 {
            log::debug!("delete of missing bookmark id {} ignored", id);
        }
        Ok(())
    }

    /// Remove every record. Returns the number deleted.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM bookmarks", [])?;
        Ok(affected)
    }

    /// Apply one editor save pass in a single transaction.
    ///
    /// All operations share one submission timestamp, so every row written
    /// by the same save carries the same `changed` value. The caller has
    /// already validated the working set; deletes of missing ids are
    /// tolerated here as everywhere else.
    pub fn apply_working_set(&self, ops: &[StoreOp]) -> Result<SaveSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let now = self.clock.now();
        let mut summary = SaveSummary::default();

        for op in ops {
            match op {
                StoreOp::Insert(draft) => {
                    tx.execute(
                        "INSERT INTO bookmarks (bookmark, title, code, enabled, created, changed)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        (
                            &draft.bookmark,
                            &draft.title,
                            &draft.code,
                            draft.enabled as i64,
                            now,
                            now,
                        ),
                    )?;
                    summary.inserted += 1;
                }
                StoreOp::Update(id, draft) => {
                    let affected = tx.execute(
                        "UPDATE bookmarks SET bookmark = ?1, title = ?2, code = ?3, enabled = ?4, changed = ?5
                         WHERE id = ?6",
                        (
                            &draft.bookmark,
                            &draft.title,
                            &draft.code,
                            draft.enabled as i64,
                            now,
                            *id,
                        ),
                    )?;
                    if affected == 0 {
                        return Err(CodemarkError::BookmarkNotFound(*id));
                    }
                    summary.updated += 1;
                }
                StoreOp::Delete(id) => {
                    let affected = tx.execute("DELETE FROM bookmarks WHERE id = ?1", [*id])?;
                    if affected == 0 {
                        log::debug!("delete of missing bookmark id {} ignored", id);
                    } else {
                        summary.deleted += 1;
                    }
                }
            }
        }

        tx.commit()?;
        Ok(summary)
    }
}
