//! Line commands.

pub const USAGE: &str = "\
commands:
  add <text>   create a todo
  done <n>     mark row n completed
  rm <n>       delete row n
  refresh      reload the list from the server
  toggle       show or hide completed todos
  help         show this message
  quit         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text is passed through untrimmed; the form does its own validation.
    Add(String),
    Done(usize),
    Remove(usize),
    Refresh,
    Toggle,
    Help,
    Quit,
    /// Blank line: just redraw.
    Redraw,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs a row number")]
    MissingRow(&'static str),
    #[error("not a row number: {0}")]
    BadRow(String),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_start();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (line.trim_end(), ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Ok(Command::Redraw),
            "add" | "a" => Ok(Command::Add(rest.to_string())),
            "done" | "d" => parse_row("done", rest).map(Command::Done),
            "rm" | "del" | "delete" => parse_row("rm", rest).map(Command::Remove),
            "refresh" | "r" | "retry" => Ok(Command::Refresh),
            "toggle" | "t" => Ok(Command::Toggle),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_row(cmd: &'static str, arg: &str) -> Result<usize, CommandError> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(CommandError::MissingRow(cmd));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadRow(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_spaces_in_text() {
        assert_eq!(
            Command::parse("add buy  milk"),
            Ok(Command::Add("buy  milk".to_string()))
        );
        assert_eq!(Command::parse("add"), Ok(Command::Add(String::new())));
    }

    #[test]
    fn parses_row_commands() {
        assert_eq!(Command::parse("done 2"), Ok(Command::Done(2)));
        assert_eq!(Command::parse("  rm 1 "), Ok(Command::Remove(1)));
        assert_eq!(Command::parse("done"), Err(CommandError::MissingRow("done")));
        assert_eq!(
            Command::parse("rm zero"),
            Err(CommandError::BadRow("zero".to_string()))
        );
        assert_eq!(Command::parse("rm 0"), Err(CommandError::BadRow("0".to_string())));
    }

    #[test]
    fn parses_bare_words() {
        assert_eq!(Command::parse("REFRESH"), Ok(Command::Refresh));
        assert_eq!(Command::parse("toggle"), Ok(Command::Toggle));
        assert_eq!(Command::parse("quit\n"), Ok(Command::Quit));
        assert_eq!(Command::parse("   "), Ok(Command::Redraw));
        assert_eq!(
            Command::parse("frobnicate 3"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
