use crate::format::traits::BookmarkFormat;
use codemark::models::bookmark::BookmarkRecord;

pub struct JsonBookmark<'a>(pub &'a BookmarkRecord);

impl<'a> BookmarkFormat for JsonBookmark<'a> {
    fn to_string(&self) -> String {
        serde_json::to_string_pretty(self.0).unwrap_or_default()
    }
}
