//! Content filter replacing `[bookmark:identifier]` placeholder tokens with
//! the captured output of the bound code body.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::db::CodemarkDb;
use crate::eval::CodeEvaluator;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[bookmark:([A-Za-z0-9_-]+)\]").expect("placeholder pattern is valid")
    })
}

/// Result of one filter pass.
///
/// The filter declares its output safe to embed as-is: replacements are
/// whatever the executed code wrote, spliced into the surrounding text
/// without further escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub text: String,
}

impl FilterResult {
    pub fn is_html_safe(&self) -> bool {
        true
    }
}

/// The placeholder filter. Borrows the store and an evaluator; one store
/// lookup per matched token, executed serially left to right.
pub struct PlaceholderFilter<'a> {
    db: &'a CodemarkDb,
    evaluator: &'a dyn CodeEvaluator,
}

impl<'a> PlaceholderFilter<'a> {
    pub fn new(db: &'a CodemarkDb, evaluator: &'a dyn CodeEvaluator) -> Self {
        Self { db, evaluator }
    }

    /// Replace every placeholder token in `text`.
    ///
    /// Missing and disabled bookmarks resolve to an empty replacement
    /// without logging; evaluation failures are logged with the offending
    /// identifier and also resolve to empty. All non-matching text is
    /// preserved unchanged. The language code is part of the filter
    /// pipeline contract; replacement does not depend on it.
    pub fn process(&self, text: &str, _langcode: &str) -> FilterResult {
        let processed = placeholder_pattern()
            .replace_all(text, |caps: &Captures| self.replacement(&caps[1]));
        FilterResult {
            text: processed.into_owned(),
        }
    }

    fn replacement(&self, bookmark: &str) -> String {
        let record = match self.db.get_rec_by_bookmark(bookmark) {
            Ok(record) => record,
            Err(e) => {
                log::error!("lookup failed for bookmark '{}': {}", bookmark, e);
                return String::new();
            }
        };

        match record {
            Some(record) if record.enabled => {
                match self.evaluator.execute(&terminated(&record.code)) {
                    Ok(output) => output,
                    Err(e) => {
                        log::error!("error executing code for bookmark '{}': {}", bookmark, e);
                        String::new()
                    }
                }
            }
            _ => String::new(),
        }
    }
}

/// Append a statement terminator unless the code already ends with one,
/// trailing whitespace aside.
fn terminated(code: &str) -> String {
    let trimmed = code.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{};", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CodemarkDb;
    use crate::eval::ScriptEvaluator;
    use crate::models::bookmark::BookmarkDraft;
    use rstest::rstest;

    fn filter_db() -> CodemarkDb {
        let db = CodemarkDb::init_in_memory().expect("Failed to init in-memory DB");
        db.add_rec(&BookmarkDraft::new("hello", "Hello", "echo 'Hi'", true))
            .unwrap();
        db.add_rec(&BookmarkDraft::new("off", "Off", "echo 'X'", false))
            .unwrap();
        db.add_rec(&BookmarkDraft::new("broken", "Broken", "echo $undefined", true))
            .unwrap();
        db.add_rec(&BookmarkDraft::new("semi", "Semi", "echo 'Y';", true))
            .unwrap();
        db
    }

    fn process(db: &CodemarkDb, text: &str) -> String {
        let evaluator = ScriptEvaluator::new();
        PlaceholderFilter::new(db, &evaluator).process(text, "en").text
    }

    #[rstest]
    #[case("A [bookmark:hello] B", "A Hi B")]
    #[case("[bookmark:off]!", "!")]
    #[case("x [bookmark:missing] y", "x  y")]
    #[case("[bookmark:hello][bookmark:hello]", "HiHi")]
    #[case("no tokens here", "no tokens here")]
    #[case("[bookmark:]", "[bookmark:]")] // empty identifier never matches
    #[case("[bookmark:bad id]", "[bookmark:bad id]")] // identifier charset is strict
    #[case("[Bookmark:hello]", "[Bookmark:hello]")] // delimiters are case-sensitive
    fn test_process(#[case] input: &str, #[case] expected: &str) {
        let db = filter_db();
        assert_eq!(process(&db, input), expected);
    }

    #[test]
    fn test_failing_code_degrades_to_empty_and_continues() {
        let db = filter_db();
        assert_eq!(
            process(&db, "a [bookmark:broken] b [bookmark:hello] c"),
            "a  b Hi c"
        );
    }

    #[test]
    fn test_terminator_fixup_is_equivalent() {
        let db = filter_db();
        // "echo 'Hi'" (no terminator) and "echo 'Y';" behave the same way.
        assert_eq!(process(&db, "[bookmark:hello]"), "Hi");
        assert_eq!(process(&db, "[bookmark:semi]"), "Y");
    }

    #[test]
    fn test_processing_is_idempotent_once_tokens_are_gone() {
        let db = filter_db();
        let once = process(&db, "A [bookmark:hello] B [bookmark:off] C");
        let twice = process(&db, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_result_is_declared_trusted() {
        let db = filter_db();
        let evaluator = ScriptEvaluator::new();
        let result = PlaceholderFilter::new(&db, &evaluator).process("x", "en");
        assert!(result.is_html_safe());
    }

    #[rstest]
    #[case("echo 'x'", "echo 'x';")]
    #[case("echo 'x';", "echo 'x';")]
    #[case("echo 'x';   ", "echo 'x';")]
    #[case("echo 'x'  \n", "echo 'x';")]
    #[case("", ";")]
    fn test_terminated(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(terminated(code), expected);
    }
}
