use crate::format::traits::BookmarkFormat;
use codemark::models::bookmark::BookmarkRecord;

pub struct TomlBookmark<'a>(pub &'a BookmarkRecord);

impl<'a> BookmarkFormat for TomlBookmark<'a> {
    fn to_string(&self) -> String {
        toml::to_string_pretty(self.0).unwrap_or_default()
    }
}
