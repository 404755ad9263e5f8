use crate::format::traits::BookmarkFormat;
use codemark::models::bookmark::BookmarkRecord;

pub struct PlainBookmark<'a>(pub &'a BookmarkRecord);

impl<'a> BookmarkFormat for PlainBookmark<'a> {
    fn to_string(&self) -> String {
        let mut s = String::new();
        let status = if self.0.enabled { "enabled" } else { "disabled" };
        s.push_str(&format!("{}. {} ({})\n", self.0.id, self.0.title, status));
        s.push_str(&format!("   > [bookmark:{}]\n", self.0.bookmark));
        if !self.0.code.trim().is_empty() {
            for line in self.0.code.lines() {
                s.push_str(&format!("   | {}\n", line));
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BookmarkRecord {
        BookmarkRecord {
            id: 1,
            bookmark: "hello".to_string(),
            title: "Hello".to_string(),
            code: "echo 'Hi'".to_string(),
            enabled: true,
            created: 0,
            changed: 0,
        }
    }

    #[test]
    fn test_plain_format_shows_token_and_code() {
        let text = PlainBookmark(&record()).to_string();
        assert!(text.contains("[bookmark:hello]"));
        assert!(text.contains("echo 'Hi'"));
        assert!(text.contains("enabled"));
    }

    #[test]
    fn test_plain_format_skips_empty_code() {
        let mut rec = record();
        rec.code = String::new();
        rec.enabled = false;
        let text = PlainBookmark(&rec).to_string();
        assert!(!text.contains("| "));
        assert!(text.contains("disabled"));
    }
}
