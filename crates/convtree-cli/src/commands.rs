//! Command parsing for the shell.
//!
//! Commands start with the configured prefix (`:` by default), followed by a
//! name and an optional argument, e.g. `:save mylog.json`.

use std::path::PathBuf;

/// Commands understood by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Exit,
    /// Show available commands.
    Help,
    /// Show every exchange in the tree.
    Context,
    /// Delete the current branch.
    Remove,
    /// Show the tree with branch connectors.
    Tree,
    /// Show the exchanges leading to the current node.
    Line,
    /// Write the tree to a file.
    Save(Option<PathBuf>),
    /// Replace the tree with one read from a file.
    Load(Option<PathBuf>),
    /// Move to the parent exchange.
    Up,
    /// Pick a branch to follow.
    Down,
    /// Anything else after the prefix.
    Unknown(String),
}

/// Parse a line as a command.
///
/// Returns `None` if the line doesn't start with `prefix`.
pub fn parse(line: &str, prefix: char) -> Option<Command> {
    let body = line.trim().strip_prefix(prefix)?;

    let mut parts = body.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(PathBuf::from);

    let command = match name.as_str() {
        "exit" | "q" | "quit" => Command::Exit,
        "help" | "h" => Command::Help,
        "context" | "c" => Command::Context,
        "rm" => Command::Remove,
        "tree" => Command::Tree,
        "line" => Command::Line,
        "save" => Command::Save(arg),
        "load" => Command::Load(arg),
        "up" => Command::Up,
        "down" => Command::Down,
        _ => Command::Unknown(line.trim().to_string()),
    };

    Some(command)
}

/// Help text listing all commands under `prefix`.
pub fn help_lines(prefix: char) -> Vec<String> {
    [
        ("exit", "End the session (alias: q)"),
        ("help", "Show this help message (alias: h)"),
        ("context", "Show every exchange in the tree (alias: c)"),
        ("tree", "Show the tree with its branches"),
        ("line", "Show the exchanges leading to the current one"),
        ("up", "Move to the parent exchange"),
        ("down", "Choose a branch to follow"),
        ("rm", "Delete the current exchange and its branches"),
        ("save [file]", "Save the tree (default: conversation.json)"),
        ("load [file]", "Load a saved tree (default: conversation.json)"),
    ]
    .iter()
    .map(|(name, about)| format!("  {prefix}{name:<12} {about}"))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse(":exit", ':'), Some(Command::Exit));
        assert_eq!(parse(":q", ':'), Some(Command::Exit));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse(":h", ':'), Some(Command::Help));
        assert_eq!(parse(":c", ':'), Some(Command::Context));
        assert_eq!(parse(":CONTEXT", ':'), Some(Command::Context));
    }

    #[test]
    fn test_parse_save() {
        assert_eq!(parse(":save", ':'), Some(Command::Save(None)));
        assert_eq!(
            parse(":save mylog.json", ':'),
            Some(Command::Save(Some(PathBuf::from("mylog.json"))))
        );
        assert_eq!(
            parse(":save   my log.json  ", ':'),
            Some(Command::Save(Some(PathBuf::from("my log.json"))))
        );
    }

    #[test]
    fn test_parse_navigation() {
        assert_eq!(parse(":up", ':'), Some(Command::Up));
        assert_eq!(parse(":down", ':'), Some(Command::Down));
        assert_eq!(parse(":rm", ':'), Some(Command::Remove));
        assert_eq!(parse(":tree", ':'), Some(Command::Tree));
        assert_eq!(parse(":line", ':'), Some(Command::Line));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world", ':'), None);
        assert_eq!(parse("/help", ':'), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse(":foo", ':'), Some(Command::Unknown(":foo".to_string())));
        assert_eq!(parse(":", ':'), Some(Command::Unknown(":".to_string())));
    }

    #[test]
    fn test_custom_prefix() {
        assert_eq!(parse("/tree", '/'), Some(Command::Tree));
        assert_eq!(parse(":tree", '/'), None);
    }

    #[test]
    fn test_help_mentions_every_command() {
        let help = help_lines(':').join("\n");
        for name in ["exit", "help", "context", "tree", "line", "up", "down", "rm", "save", "load"] {
            assert!(help.contains(&format!(":{name}")), "missing {name}");
        }
    }
}
