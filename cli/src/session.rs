//! Interactive admin editor: one rustyline loop over a working set.
//!
//! Mirrors the multi-fieldset admin form: every record becomes an editable
//! block, `add` appends another blank block, and nothing touches the store
//! until `save`, which validates the whole set and writes it in one pass.

use codemark::editor::{EditorRow, EditorSession};
use codemark::error::{CodemarkError, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::commands::AppContext;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCmd {
    Show,
    Add,
    Set {
        row: usize,
        field: String,
        value: String,
    },
    Code {
        row: usize,
    },
    Remove {
        row: usize,
    },
    Save,
    Help,
    Quit,
}

fn parse_command(line: &str) -> std::result::Result<SessionCmd, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let usage = "type '?' for help";

    match tokens.first().copied() {
        None => Err(usage.to_string()),
        Some("show") | Some("ls") => Ok(SessionCmd::Show),
        Some("add") | Some("a") => Ok(SessionCmd::Add),
        Some("save") | Some("w") => Ok(SessionCmd::Save),
        Some("?") | Some("help") => Ok(SessionCmd::Help),
        Some("q") | Some("quit") | Some("exit") => Ok(SessionCmd::Quit),
        Some("rm") | Some("remove") => {
            let row = parse_row(tokens.get(1))?;
            Ok(SessionCmd::Remove { row })
        }
        Some("code") => {
            let row = parse_row(tokens.get(1))?;
            Ok(SessionCmd::Code { row })
        }
        Some("set") => {
            let row = parse_row(tokens.get(1))?;
            let field = tokens
                .get(2)
                .ok_or_else(|| "Usage: set <block> <field> <value>".to_string())?
                .to_string();
            if tokens.len() < 4 {
                return Err("Usage: set <block> <field> <value>".to_string());
            }
            Ok(SessionCmd::Set {
                row,
                field,
                value: tokens[3..].join(" "),
            })
        }
        Some(other) => Err(format!("Unknown command '{}'; {}", other, usage)),
    }
}

fn parse_row(token: Option<&&str>) -> std::result::Result<usize, String> {
    let token = token.ok_or_else(|| "Missing block number".to_string())?;
    let row: usize = token
        .parse()
        .map_err(|_| format!("Invalid block number '{}'", token))?;
    if row == 0 {
        return Err("Block numbers start at 1".to_string());
    }
    Ok(row)
}

fn set_field(row: &mut EditorRow, field: &str, value: &str) -> std::result::Result<(), String> {
    match field {
        "bookmark" => row.bookmark = value.to_string(),
        "title" => row.title = value.to_string(),
        "code" => row.code = value.to_string(),
        "enabled" => match value {
            "true" | "yes" | "1" | "on" => row.enabled = true,
            "false" | "no" | "0" | "off" => row.enabled = false,
            other => return Err(format!("Invalid enabled value '{}'", other)),
        },
        other => {
            return Err(format!(
                "Unknown field '{}' (bookmark, title, code, enabled)",
                other
            ))
        }
    }
    Ok(())
}

fn code_preview(code: &str) -> String {
    let first_line = code.lines().next().unwrap_or("");
    let mut preview: String = first_line.chars().take(48).collect();
    if preview.len() < first_line.len() || code.lines().count() > 1 {
        preview.push_str("...");
    }
    preview
}

fn render(session: &EditorSession) {
    for (idx, row) in session.rows().iter().enumerate() {
        let id = match row.id {
            Some(id) => format!("id {}", id),
            None => "new".to_string(),
        };
        let status = if row.enabled { "enabled" } else { "disabled" };
        let marker = if row.remove { "  (marked for deletion)" } else { "" };
        println!(
            "{}. [{}] {} \"{}\" ({}){}",
            idx + 1,
            id,
            row.bookmark,
            row.title,
            status,
            marker
        );
        if !row.code.is_empty() {
            println!("     code: {}", code_preview(&row.code));
        }
    }
}

fn print_help() {
    println!(
        "
WORKING SET COMMANDS:

    show                       List all blocks in the working set
    add                        Add another blank block
    set <block> <field> <value>
                               Set a field (bookmark, title, code, enabled)
                               Example: set 2 bookmark greeting
                               Example: set 2 enabled true
    code <block>               Enter a multi-line code body, terminated
                               by a '.' on its own line
    rm <block>                 Toggle the delete marker on a block
    save                       Validate everything and write it in one pass
    q / quit                   Leave without saving pending changes
    ?  / help                  Show this help

Nothing is persisted until 'save'. Blocks marked for deletion are removed
on save; marked blocks that were never saved are simply discarded.
"
    );
}

fn read_code_block(rl: &mut DefaultEditor) -> Result<Option<String>> {
    println!("Enter code, end with '.' on its own line:");
    let mut lines = Vec::new();
    loop {
        match rl.readline("... ") {
            Ok(line) => {
                if line.trim() == "." {
                    break;
                }
                lines.push(line);
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => return Ok(None),
            Err(err) => return Err(CodemarkError::Other(err.to_string())),
        }
    }
    Ok(Some(lines.join("\n")))
}

pub fn run(ctx: &AppContext) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(|e| CodemarkError::Other(e.to_string()))?;
    let mut session = EditorSession::load(ctx.db)?;
    let mut dirty = false;

    println!("codemark edit - type '?' for help");
    render(&session);

    loop {
        let readline = rl.readline("codemark> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)
                    .map_err(|e| CodemarkError::Other(e.to_string()))?;

                let cmd = match parse_command(line) {
                    Ok(cmd) => cmd,
                    Err(msg) => {
                        eprintln!("{}", msg);
                        continue;
                    }
                };

                match cmd {
                    SessionCmd::Quit => {
                        if dirty {
                            eprintln!("Discarding unsaved changes.");
                        }
                        break;
                    }
                    SessionCmd::Help => print_help(),
                    SessionCmd::Show => render(&session),
                    SessionCmd::Add => {
                        session.add_row();
                        dirty = true;
                        println!("Added block {}", session.len());
                    }
                    SessionCmd::Remove { row } => match session.row_mut(row - 1) {
                        Some(r) => {
                            r.remove = !r.remove;
                            dirty = true;
                            println!(
                                "Block {} {} for deletion",
                                row,
                                if r.remove { "marked" } else { "unmarked" }
                            );
                        }
                        None => eprintln!("No block {}", row),
                    },
                    SessionCmd::Set { row, field, value } => match session.row_mut(row - 1) {
                        Some(r) => match set_field(r, &field, &value) {
                            Ok(()) => dirty = true,
                            Err(msg) => eprintln!("{}", msg),
                        },
                        None => eprintln!("No block {}", row),
                    },
                    SessionCmd::Code { row } => {
                        if session.row_mut(row - 1).is_none() {
                            eprintln!("No block {}", row);
                            continue;
                        }
                        match read_code_block(&mut rl)? {
                            Some(code) => {
                                if let Some(r) = session.row_mut(row - 1) {
                                    r.code = code;
                                    dirty = true;
                                }
                            }
                            None => eprintln!("Cancelled."),
                        }
                    }
                    SessionCmd::Save => {
                        let errors = session.validate();
                        if !errors.is_empty() {
                            eprintln!("Nothing saved:");
                            for error in errors {
                                eprintln!("  {}", error);
                            }
                            continue;
                        }
                        match session.save(ctx.db) {
                            Ok(summary) => {
                                dirty = false;
                                println!(
                                    "Configuration saved: {} added, {} updated, {} deleted.",
                                    summary.inserted, summary.updated, summary.deleted
                                );
                                render(&session);
                            }
                            Err(e) => eprintln!("Save failed: {}", e),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("show", SessionCmd::Show)]
    #[case("ls", SessionCmd::Show)]
    #[case("add", SessionCmd::Add)]
    #[case("save", SessionCmd::Save)]
    #[case("q", SessionCmd::Quit)]
    #[case("help", SessionCmd::Help)]
    #[case("rm 2", SessionCmd::Remove { row: 2 })]
    #[case("code 1", SessionCmd::Code { row: 1 })]
    fn test_parse_command(#[case] line: &str, #[case] expected: SessionCmd) {
        assert_eq!(parse_command(line).unwrap(), expected);
    }

    #[test]
    fn test_parse_set_joins_value_words() {
        let cmd = parse_command("set 1 title My Fine Title").unwrap();
        assert_eq!(
            cmd,
            SessionCmd::Set {
                row: 1,
                field: "title".to_string(),
                value: "My Fine Title".to_string(),
            }
        );
    }

    #[rstest]
    #[case("bogus")]
    #[case("rm")]
    #[case("rm zero")]
    #[case("rm 0")]
    #[case("set 1 title")]
    #[case("set 1")]
    fn test_parse_errors(#[case] line: &str) {
        assert!(parse_command(line).is_err());
    }

    #[test]
    fn test_set_field() {
        let mut row = EditorRow::default();
        set_field(&mut row, "bookmark", "greeting").unwrap();
        set_field(&mut row, "title", "Greeting").unwrap();
        set_field(&mut row, "code", "echo 'Hi'").unwrap();
        set_field(&mut row, "enabled", "true").unwrap();
        assert_eq!(row.bookmark, "greeting");
        assert_eq!(row.title, "Greeting");
        assert_eq!(row.code, "echo 'Hi'");
        assert!(row.enabled);

        set_field(&mut row, "enabled", "off").unwrap();
        assert!(!row.enabled);

        assert!(set_field(&mut row, "enabled", "maybe").is_err());
        assert!(set_field(&mut row, "nonsense", "x").is_err());
    }

    #[rstest]
    #[case("echo 'Hi'", "echo 'Hi'")]
    #[case("", "")]
    #[case("first line\nsecond", "first line...")]
    fn test_code_preview(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(code_preview(code), expected);
    }
}
