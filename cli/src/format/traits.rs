pub trait BookmarkFormat {
    fn to_string(&self) -> String;
}
