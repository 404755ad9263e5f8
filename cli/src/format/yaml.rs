use crate::format::traits::BookmarkFormat;
use codemark::models::bookmark::BookmarkRecord;

pub struct YamlBookmark<'a>(pub &'a BookmarkRecord);

impl<'a> BookmarkFormat for YamlBookmark<'a> {
    fn to_string(&self) -> String {
        serde_yaml::to_string(self.0).unwrap_or_default()
    }
}
