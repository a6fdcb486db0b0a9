//! Runs one parsed command against the matching controller.

use std::sync::Arc;

use client_core::{DraftOutcome, GatewayError, MiniJiraClient, TicketDraft, UserDraft};
use tracing::debug;

use crate::commands::ShellCommand;

pub async fn dispatch(client: Arc<MiniJiraClient>, command: ShellCommand) {
    let name = command.name();
    debug!(command = name, "dispatching command");

    // Failed calls are already reported through ClientEvent::RequestFailed.
    let result = match command {
        ShellCommand::Chat(text) => {
            let chat = client.chat();
            chat.set_draft(text).await;
            report_draft(chat.send_draft().await, "type a message after 'chat'")
        }
        ShellCommand::Tickets(None) => client.tickets().reload().await,
        ShellCommand::Tickets(Some(filter)) => client.tickets().set_filter(filter).await,
        ShellCommand::NewTicket { title, assignee } => {
            let tickets = client.tickets();
            tickets.set_draft(TicketDraft::new(title, assignee)).await;
            report_draft(
                tickets.create().await,
                "a ticket needs both a title and an assignee",
            )
        }
        ShellCommand::SetStatus { id, status } => client.tickets().set_status(id, status).await,
        ShellCommand::RemoveTicket(id) => client.tickets().remove(id).await,
        ShellCommand::Reset => client.tickets().reset_all().await,
        ShellCommand::Users => client.users().reload().await,
        ShellCommand::NewUser { user_id, name } => {
            let users = client.users();
            users.set_draft(UserDraft::new(user_id, name)).await;
            report_draft(
                users.create().await,
                "a user needs an integer id and a name",
            )
        }
        ShellCommand::RemoveUser(user_id) => client.users().remove(user_id).await,
        ShellCommand::Help | ShellCommand::Quit => Ok(()),
    };

    if let Err(err) = result {
        debug!(command = name, error = %err, "command failed");
    }
}

fn report_draft(
    outcome: Result<DraftOutcome, GatewayError>,
    hint: &str,
) -> Result<(), GatewayError> {
    if outcome? == DraftOutcome::Incomplete {
        println!("{hint}");
    }
    Ok(())
}
