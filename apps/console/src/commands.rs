//! Operator command lines and their mapping onto controller operations.

use shared::domain::{StatusFilter, TicketId, TicketStatus, UnknownStatus, UserId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Chat(String),
    Tickets(Option<StatusFilter>),
    NewTicket { title: String, assignee: String },
    SetStatus { id: TicketId, status: TicketStatus },
    RemoveTicket(TicketId),
    Reset,
    Users,
    NewUser { user_id: String, name: String },
    RemoveUser(UserId),
    Help,
    Quit,
}

impl ShellCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Chat(_) => "chat",
            Self::Tickets(_) => "tickets",
            Self::NewTicket { .. } => "ticket_new",
            Self::SetStatus { .. } => "ticket_status",
            Self::RemoveTicket(_) => "ticket_rm",
            Self::Reset => "reset",
            Self::Users => "users",
            Self::NewUser { .. } => "user_new",
            Self::RemoveUser(_) => "user_rm",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command {0:?}; type 'help' for usage")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid id {0:?}")]
    InvalidId(String),
    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

const TICKET_NEW_USAGE: &str = "ticket new <title> | <assignee>";
const TICKET_STATUS_USAGE: &str = "ticket status <id> <OPEN|IN_PROGRESS|CLOSED>";
const TICKET_RM_USAGE: &str = "ticket rm <id>";
const USER_NEW_USAGE: &str = "user new <id> <name>";
const USER_RM_USAGE: &str = "user rm <id>";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (head, rest) = split_word(line);
    let command = match head.to_ascii_lowercase().as_str() {
        "chat" => ShellCommand::Chat(rest.to_string()),
        "tickets" if rest.is_empty() => ShellCommand::Tickets(None),
        "tickets" => ShellCommand::Tickets(Some(rest.parse()?)),
        "ticket" => parse_ticket(rest)?,
        "reset" => ShellCommand::Reset,
        "users" => ShellCommand::Users,
        "user" => parse_user(rest)?,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        _ => return Err(ParseError::Unknown(head.to_string())),
    };
    Ok(Some(command))
}

fn parse_ticket(input: &str) -> Result<ShellCommand, ParseError> {
    let (action, rest) = split_word(input);
    match action {
        "new" => {
            let (title, assignee) = rest
                .split_once('|')
                .ok_or(ParseError::Usage(TICKET_NEW_USAGE))?;
            Ok(ShellCommand::NewTicket {
                title: title.trim().to_string(),
                assignee: assignee.trim().to_string(),
            })
        }
        "status" => {
            let (id, status) = split_word(rest);
            if id.is_empty() || status.is_empty() {
                return Err(ParseError::Usage(TICKET_STATUS_USAGE));
            }
            Ok(ShellCommand::SetStatus {
                id: TicketId(parse_id(id)?),
                status: status.parse()?,
            })
        }
        "rm" | "delete" => {
            if rest.is_empty() {
                return Err(ParseError::Usage(TICKET_RM_USAGE));
            }
            Ok(ShellCommand::RemoveTicket(TicketId(parse_id(rest)?)))
        }
        _ => Err(ParseError::Usage(TICKET_NEW_USAGE)),
    }
}

// The id stays raw here; the users controller decides whether it is usable.
fn parse_user(input: &str) -> Result<ShellCommand, ParseError> {
    let (action, rest) = split_word(input);
    match action {
        "new" => {
            let (user_id, name) = split_word(rest);
            Ok(ShellCommand::NewUser {
                user_id: user_id.to_string(),
                name: name.to_string(),
            })
        }
        "rm" | "delete" => {
            if rest.is_empty() {
                return Err(ParseError::Usage(USER_RM_USAGE));
            }
            Ok(ShellCommand::RemoveUser(UserId(parse_id(rest)?)))
        }
        _ => Err(ParseError::Usage(USER_NEW_USAGE)),
    }
}

fn parse_id(raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::InvalidId(raw.to_string()))
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}
