use codemark::models::bookmark::BookmarkRecord;
use owo_colors::OwoColorize;

pub trait Colorize {
    fn to_colored(&self) -> String;
}

pub struct ColorizeBookmark<'a>(pub &'a BookmarkRecord);

impl<'a> Colorize for ColorizeBookmark<'a> {
    fn to_colored(&self) -> String {
        let mut s = String::new();
        let id = self.0.id.to_string();
        let status = if self.0.enabled {
            format!("{}", "enabled".green())
        } else {
            format!("{}", "disabled".red())
        };
        s.push_str(&format!(
            "{}. {} ({})\n",
            id.bright_blue(),
            self.0.title.bold().green(),
            status,
        ));
        let padding = id.len() + 3;
        // padding for alignment
        s.push_str(&format!(
            "{:>padding$} {}\n",
            ">".red(),
            format!("[bookmark:{}]", self.0.bookmark).yellow()
        ));

        // Only show the code body if non-empty
        if !self.0.code.trim().is_empty() {
            for line in self.0.code.lines() {
                s.push_str(&format!("{:>padding$} {}\n", "|".red(), line));
            }
        }
        s
    }
}
