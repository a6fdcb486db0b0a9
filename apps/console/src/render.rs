//! Terminal views for the three panels, driven by controller events.

use client_core::{ClientEvent, Panel};
use shared::domain::{ChatMessage, ChatRole, Ticket, User};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::warn;

const TITLE_WIDTH: usize = 32;
const CHAT_ERROR_HINT: &str = "Is your bridge server running?";

pub const HELP: &str = "\
commands:
  chat <text>                                 talk to the admin agent
  tickets [ALL|OPEN|IN_PROGRESS|CLOSED]       reload, optionally switching filter
  ticket new <title> | <assignee>             create a ticket
  ticket status <id> <OPEN|IN_PROGRESS|CLOSED>
  ticket rm <id>
  reset                                       delete every ticket and user
  users                                       reload users
  user new <id> <name>
  user rm <id>
  help | quit";

/// Prints every event until the client is dropped.
pub async fn run(mut events: broadcast::Receiver<ClientEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => println!("{}", render_event(&event)),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind; some updates were not shown");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

pub fn render_event(event: &ClientEvent) -> String {
    match event {
        ClientEvent::TicketsReloaded(tickets) => ticket_table(tickets),
        ClientEvent::UsersReloaded(users) => user_table(users),
        ClientEvent::ChatAppended(message) => chat_line(message),
        ClientEvent::RequestFailed { panel, message } => failure_line(*panel, message),
    }
}

pub fn ticket_table(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "[tickets] No tickets. Create one above or use the Chat tab.".to_string();
    }
    let mut out = format!(
        "[tickets]\n{:<6} {:<width$} {:<16} {}",
        "ID",
        "TITLE",
        "ASSIGNEE",
        "STATUS",
        width = TITLE_WIDTH
    );
    for ticket in tickets {
        out.push_str(&format!(
            "\n{:<6} {:<width$} {:<16} {}",
            ticket.id.to_string(),
            truncate(&ticket.title, TITLE_WIDTH),
            ticket.assignee,
            ticket.status.label(),
            width = TITLE_WIDTH
        ));
    }
    out
}

pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "[users] No users yet. Create your first user above.".to_string();
    }
    let mut out = format!("[users]\n{:<8} {}", "USER ID", "NAME");
    for user in users {
        out.push_str(&format!("\n{:<8} {}", user.user_id.to_string(), user.name));
    }
    out
}

pub fn chat_line(message: &ChatMessage) -> String {
    let speaker = match message.role {
        ChatRole::User => "You",
        ChatRole::Assistant => "Agent",
    };
    format!("[chat] {speaker}: {}", message.text)
}

pub fn failure_line(panel: Panel, message: &str) -> String {
    match panel {
        Panel::Chat => format!("[chat] error: {message} - {CHAT_ERROR_HINT}"),
        _ => format!("[{panel}] error: {message}"),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{TicketId, TicketStatus, UserId};

    #[test]
    fn empty_tables_show_hints() {
        assert!(ticket_table(&[]).contains("No tickets"));
        assert!(user_table(&[]).contains("No users yet"));
    }

    #[test]
    fn ticket_rows_use_readable_status_and_truncate_titles() {
        let table = ticket_table(&[Ticket {
            id: TicketId(12),
            title: "A".repeat(40),
            assignee: "Alice".to_string(),
            status: TicketStatus::InProgress,
        }]);
        let row = table.lines().last().expect("row");
        assert!(row.starts_with("12 "));
        assert!(row.contains("IN PROGRESS"));
        assert!(row.contains('…'));
        assert!(!row.contains(&"A".repeat(40)));
    }

    #[test]
    fn user_rows_list_id_and_name() {
        let table = user_table(&[User {
            user_id: UserId(3),
            name: "Bob".to_string(),
        }]);
        assert!(table.lines().last().expect("row").contains("Bob"));
    }

    #[test]
    fn chat_failures_carry_bridge_hint() {
        assert_eq!(
            failure_line(Panel::Chat, "500 Internal Server Error"),
            "[chat] error: 500 Internal Server Error - Is your bridge server running?"
        );
        assert_eq!(
            failure_line(Panel::Users, "400 Bad Request"),
            "[users] error: 400 Bad Request"
        );
    }

    #[test]
    fn chat_lines_name_the_speaker() {
        assert_eq!(chat_line(&ChatMessage::user("hi")), "[chat] You: hi");
        assert_eq!(
            chat_line(&ChatMessage::assistant("hello")),
            "[chat] Agent: hello"
        );
    }
}
