use thiserror::Error;

pub const HELP: &str = "\
Commands:
  grant [email] [days]  grant a demo (uses the pending email/days when omitted)
  email <address>       set the pending email
  days <n>              set the pending demo length in days
  revoke <email>        revoke a demo
  refresh | list        reload the account list
  logout                sign out and forget the admin key
  help                  show this help
  quit | exit           leave the console";

// Console commands accepted once signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Grant {
        email: Option<String>,
        days: Option<u32>,
    },
    Email(String),
    Days(u32),
    Revoke(String),
    Refresh,
    SignOut,
    Help,
    Quit,
    // Blank line: just redraw.
    Redraw,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`, type `help` for the list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("days must be a positive whole number, got `{0}`")]
    InvalidDays(String),
}

pub fn parse_command(line: &str) -> Result<Command, ParseCommandError> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(Command::Redraw);
    };
    let args: Vec<&str> = parts.collect();

    match verb.to_ascii_lowercase().as_str() {
        "grant" => match args.as_slice() {
            [] => Ok(Command::Grant {
                email: None,
                days: None,
            }),
            [email] => Ok(Command::Grant {
                email: Some(email.to_string()),
                days: None,
            }),
            [email, days] => Ok(Command::Grant {
                email: Some(email.to_string()),
                days: Some(parse_days(days)?),
            }),
            _ => Err(ParseCommandError::Usage("grant [email] [days]")),
        },
        "email" => match args.as_slice() {
            [email] => Ok(Command::Email(email.to_string())),
            _ => Err(ParseCommandError::Usage("email <address>")),
        },
        "days" => match args.as_slice() {
            [days] => Ok(Command::Days(parse_days(days)?)),
            _ => Err(ParseCommandError::Usage("days <n>")),
        },
        "revoke" => match args.as_slice() {
            [email] => Ok(Command::Revoke(email.to_string())),
            _ => Err(ParseCommandError::Usage("revoke <email>")),
        },
        "refresh" | "list" => Ok(Command::Refresh),
        "logout" => Ok(Command::SignOut),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseCommandError::Unknown(other.to_string())),
    }
}

// Whether a line typed at the sign-in prompt asks to leave instead of being a key.
pub fn is_quit(line: &str) -> bool {
    matches!(line.trim(), "quit" | "exit")
}

fn parse_days(raw: &str) -> Result<u32, ParseCommandError> {
    match raw.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ParseCommandError::InvalidDays(raw.to_string())),
    }
}
