use serde::{Deserialize, Serialize};

/// A persisted bookmark record: a named binding between an identifier and a
/// code body plus enabled flag. The identifier is what appears in content as
/// `[bookmark:identifier]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    /// Database-assigned id, present only after the first save.
    pub id: i64,
    /// Identifier used in content placeholders. Unique per record.
    pub bookmark: String,
    /// Display label in the admin surface.
    pub title: String,
    /// Code body executed when the placeholder is encountered.
    pub code: String,
    /// Disabled records resolve to an empty replacement.
    pub enabled: bool,
    /// Unix timestamp, set once at insert.
    pub created: i64,
    /// Unix timestamp, refreshed on every insert or update.
    pub changed: i64,
}

impl BookmarkRecord {
    /// The mutable fields of this record, as a draft for resubmission.
    pub fn draft(&self) -> BookmarkDraft {
        BookmarkDraft {
            bookmark: self.bookmark.clone(),
            title: self.title.clone(),
            code: self.code.clone(),
            enabled: self.enabled,
        }
    }
}

/// The writable fields of a bookmark record, used for inserts and updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub bookmark: String,
    pub title: String,
    pub code: String,
    pub enabled: bool,
}

impl BookmarkDraft {
    pub fn new(bookmark: &str, title: &str, code: &str, enabled: bool) -> Self {
        Self {
            bookmark: bookmark.to_string(),
            title: title.to_string(),
            code: code.to_string(),
            enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_carries_mutable_fields() {
        let rec = BookmarkRecord {
            id: 7,
            bookmark: "hello".to_string(),
            title: "Hello".to_string(),
            code: "echo 'Hi'".to_string(),
            enabled: true,
            created: 100,
            changed: 200,
        };
        let draft = rec.draft();
        assert_eq!(draft, BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true));
    }
}
