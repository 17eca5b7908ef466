use panel_core::ButtonId;
use thiserror::Error;

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Verify,
    Process(String),
    Download,
    Read,
    Clear,
    Pause,
    Resume,
    SetUrl(String),
    ResetUrl,
    Status,
    Help,
    Quit,
}

impl ReplCommand {
    /// Button that must be enabled for the command to run.
    pub fn button(&self) -> Option<ButtonId> {
        match self {
            ReplCommand::Verify => Some(ButtonId::Verify),
            ReplCommand::Process(_) => Some(ButtonId::Process),
            ReplCommand::Download => Some(ButtonId::Download),
            ReplCommand::Read => Some(ButtonId::Read),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}`; type `help`")]
    Unknown(String),
    #[error("`url` needs a value; use `reset-url` for the default")]
    MissingUrl,
}

pub const HELP: &str = "\
commands:
  verify            locate the largest archive at the current URL
  process <text>    download the largest archive and search it for <text>
  download          download the last located archive
  read              read the last located archive
  clear             clear the log panel
  pause | resume    stop or restart log updates
  url <value>       set the listing URL
  reset-url         restore the default listing URL
  status            show the panel summary
  help              show this list
  quit              leave the panel";

pub fn parse(line: &str) -> Result<ReplCommand, ParseError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "" => return Err(ParseError::Empty),
        "verify" | "v" => ReplCommand::Verify,
        // Blank search text is passed through and rejected by validation.
        "process" | "p" => ReplCommand::Process(rest.to_string()),
        "download" | "d" => ReplCommand::Download,
        "read" | "r" => ReplCommand::Read,
        "clear" => ReplCommand::Clear,
        "pause" => ReplCommand::Pause,
        "resume" => ReplCommand::Resume,
        "url" => {
            if rest.is_empty() {
                return Err(ParseError::MissingUrl);
            }
            ReplCommand::SetUrl(rest.to_string())
        }
        "reset-url" => ReplCommand::ResetUrl,
        "status" | "s" => ReplCommand::Status,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operations() {
        assert_eq!(parse("verify"), Ok(ReplCommand::Verify));
        assert_eq!(parse("  Download "), Ok(ReplCommand::Download));
        assert_eq!(parse("read"), Ok(ReplCommand::Read));
        assert_eq!(
            parse("process marca registrada"),
            Ok(ReplCommand::Process("marca registrada".to_string()))
        );
    }

    #[test]
    fn process_without_text_is_left_to_validation() {
        assert_eq!(parse("process"), Ok(ReplCommand::Process(String::new())));
    }

    #[test]
    fn url_requires_value() {
        assert_eq!(parse("url"), Err(ParseError::MissingUrl));
        assert_eq!(
            parse("url https://example.org/rpi/"),
            Ok(ReplCommand::SetUrl("https://example.org/rpi/".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("launch"), Err(ParseError::Unknown("launch".to_string())));
    }

    #[test]
    fn operations_map_to_buttons() {
        assert_eq!(ReplCommand::Verify.button(), Some(ButtonId::Verify));
        assert_eq!(ReplCommand::Read.button(), Some(ButtonId::Read));
        assert_eq!(ReplCommand::Clear.button(), None);
    }
}
