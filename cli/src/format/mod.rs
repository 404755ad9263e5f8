use crate::{
    format::{
        json::JsonBookmark, plain::PlainBookmark, toml::TomlBookmark, traits::BookmarkFormat,
        yaml::YamlBookmark,
    },
    output::colorize::{Colorize, ColorizeBookmark},
};

pub mod json;
pub mod plain;
pub mod toml;
pub mod traits;
pub mod yaml;

#[derive(Clone, Copy)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
    Plain,
    Colored,
}

impl OutputFormat {
    pub fn from_string(format: &str) -> Self {
        match format {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            "toml" => OutputFormat::Toml,
            "plain" => OutputFormat::Plain,
            _ => OutputFormat::Colored,
        }
    }

    pub fn print_records(
        self,
        records: &[codemark::models::bookmark::BookmarkRecord],
        no_color: bool,
    ) {
        match self {
            OutputFormat::Json => {
                for r in records {
                    println!("{}", JsonBookmark(r).to_string());
                }
            }
            OutputFormat::Yaml => {
                for r in records {
                    println!("{}", YamlBookmark(r).to_string());
                }
            }
            OutputFormat::Toml => {
                for r in records {
                    println!("{}", TomlBookmark(r).to_string());
                }
            }
            OutputFormat::Plain => {
                for r in records {
                    println!("{}", PlainBookmark(r).to_string());
                }
            }
            OutputFormat::Colored => {
                for r in records {
                    if no_color {
                        println!("{}", PlainBookmark(r).to_string());
                    } else {
                        println!("{}", ColorizeBookmark(r).to_colored());
                    }
                }
            }
        }
    }
}
