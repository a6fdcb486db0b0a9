use std::fmt;

use shared::domain::{ChatMessage, Ticket, User};

/// The controller a request or event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Chat,
    Tickets,
    Users,
}

impl Panel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Tickets => "tickets",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State changes published by the controllers for whoever renders them.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    TicketsReloaded(Vec<Ticket>),
    UsersReloaded(Vec<User>),
    ChatAppended(ChatMessage),
    RequestFailed { panel: Panel, message: String },
}
