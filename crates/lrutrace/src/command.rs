//! Trace line parser

/// One cache operation from a trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `put <key> <value>`
    Put { key: String, value: String },
    /// `get <key>`
    Get { key: String },
}

/// Malformed trace line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),
}

/// Parse a single trace line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (command, rest) = split_token(line);

    match command.to_uppercase().as_str() {
        "PUT" => {
            let (key, value) = split_token(rest);
            if key.is_empty() || value.is_empty() {
                return Err(ParseError::WrongArity("put"));
            }
            Ok(Some(Command::Put {
                key: key.to_string(),
                value: value.to_string(),
            }))
        }
        "GET" => {
            let (key, extra) = split_token(rest);
            if key.is_empty() || !extra.is_empty() {
                return Err(ParseError::WrongArity("get"));
            }
            Ok(Some(Command::Get {
                key: key.to_string(),
            }))
        }
        _ => Err(ParseError::UnknownCommand(command.to_string())),
    }
}

// First whitespace-delimited token and the trimmed remainder
fn split_token(s: &str) -> (&str, &str) {
    match s.split_once(char::is_whitespace) {
        Some((token, rest)) => (token, rest.trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_put() {
        assert_eq!(
            parse_line("put k1 v1").unwrap(),
            Some(Command::Put {
                key: "k1".to_string(),
                value: "v1".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_put_value_with_spaces() {
        assert_eq!(
            parse_line("PUT greeting  hello there ").unwrap(),
            Some(Command::Put {
                key: "greeting".to_string(),
                value: "hello there".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_get() {
        assert_eq!(
            parse_line("  Get k1").unwrap(),
            Some(Command::Get {
                key: "k1".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# warm up").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_line("put k1"), Err(ParseError::WrongArity("put")));
        assert_eq!(parse_line("get"), Err(ParseError::WrongArity("get")));
        assert_eq!(parse_line("get a b"), Err(ParseError::WrongArity("get")));
        assert_eq!(
            parse_line("del k1"),
            Err(ParseError::UnknownCommand("del".to_string()))
        );
    }
}
