use std::fmt;

use serde::{Deserialize, Serialize};

use crate::navigator::NavigatorEvent;

/// Scripted user commands, replayed against a navigator by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Search(String),
    ClearSearch,
    Toggle(usize),
    OpenAll(usize),

    // Multi-step commands
    Sequence(Vec<Command>),
}

impl Command {
    /// Parse a command from a string representation
    pub fn from_string(s: &str) -> Result<Self, String> {
        let s = s.trim();
        match s {
            "clear_search" | "clear" => return Ok(Command::ClearSearch),
            "" => return Err("Empty command".to_string()),
            _ => {}
        }

        if let Some(text) = s.strip_prefix("search:") {
            return Ok(Command::Search(text.to_string()));
        }
        if let Some(row) = s.strip_prefix("toggle:") {
            return parse_row(row).map(Command::Toggle);
        }
        if let Some(row) = s.strip_prefix("open_all:") {
            return parse_row(row).map(Command::OpenAll);
        }

        if let Some(inner) = s.strip_prefix("sequence:[").and_then(|rest| rest.strip_suffix(']')) {
            if inner.trim().is_empty() {
                return Ok(Command::Sequence(vec![]));
            }

            let mut commands = Vec::new();
            for cmd_str in inner.split(',') {
                match Command::from_string(cmd_str) {
                    Ok(cmd) => commands.push(cmd),
                    Err(e) => return Err(format!("Invalid command in sequence '{}': {}", cmd_str.trim(), e)),
                }
            }
            return Ok(Command::Sequence(commands));
        }

        Err(format!("Unknown command: {}", s))
    }

    /// Flatten into the navigator events this command triggers
    pub fn into_events(self) -> Vec<NavigatorEvent> {
        match self {
            Command::Search(text) => vec![NavigatorEvent::SearchInput(text)],
            Command::ClearSearch => vec![NavigatorEvent::SearchInput(String::new())],
            Command::Toggle(row) => vec![NavigatorEvent::FolderToggle(row)],
            Command::OpenAll(row) => vec![NavigatorEvent::OpenAllClick(row)],
            Command::Sequence(commands) => commands.into_iter().flat_map(Command::into_events).collect(),
        }
    }
}

fn parse_row(row: &str) -> Result<usize, String> {
    row.trim()
        .parse()
        .map_err(|_| format!("Invalid row number: {}", row))
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Search(text) => write!(f, "search:{}", text),
            Command::ClearSearch => write!(f, "clear_search"),
            Command::Toggle(row) => write!(f, "toggle:{}", row),
            Command::OpenAll(row) => write!(f, "open_all:{}", row),
            Command::Sequence(commands) => {
                let inner: Vec<String> = commands.iter().map(|c| c.to_string()).collect();
                write!(f, "sequence:[{}]", inner.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_parsing() {
        assert_eq!(Command::from_string("search:rust").unwrap(), Command::Search("rust".to_string()));
        assert_eq!(Command::from_string("search:").unwrap(), Command::Search(String::new()));
        assert_eq!(Command::from_string("clear").unwrap(), Command::ClearSearch);
        assert_eq!(Command::from_string("toggle:3").unwrap(), Command::Toggle(3));
        assert_eq!(Command::from_string(" open_all:0 ").unwrap(), Command::OpenAll(0));

        assert!(Command::from_string("invalid").is_err());
        assert!(Command::from_string("").is_err());
        assert!(Command::from_string("toggle:x").is_err());
    }

    #[test]
    fn test_search_text_is_taken_verbatim() {
        assert_eq!(
            Command::from_string("search:a.b (c)").unwrap(),
            Command::Search("a.b (c)".to_string())
        );
    }

    #[test]
    fn test_sequence_parsing() {
        let cmd = Command::from_string("sequence:[search:news, toggle:0,open_all:0]").unwrap();
        assert_eq!(
            cmd,
            Command::Sequence(vec![
                Command::Search("news".to_string()),
                Command::Toggle(0),
                Command::OpenAll(0),
            ])
        );
        assert_eq!(Command::from_string("sequence:[]").unwrap(), Command::Sequence(vec![]));

        let err = Command::from_string("sequence:[toggle:1,bogus]").unwrap_err();
        assert!(err.contains("bogus"));
    }

    #[test]
    fn test_command_to_string() {
        assert_eq!(Command::Toggle(4).to_string(), "toggle:4");
        assert_eq!(
            Command::Sequence(vec![Command::ClearSearch, Command::OpenAll(2)]).to_string(),
            "sequence:[clear_search,open_all:2]"
        );
    }

    #[test]
    fn test_into_events() {
        let events = Command::Sequence(vec![
            Command::Search("x".to_string()),
            Command::ClearSearch,
            Command::Toggle(1),
        ])
        .into_events();

        assert_eq!(
            events,
            vec![
                NavigatorEvent::SearchInput("x".to_string()),
                NavigatorEvent::SearchInput(String::new()),
                NavigatorEvent::FolderToggle(1),
            ]
        );
    }
}
