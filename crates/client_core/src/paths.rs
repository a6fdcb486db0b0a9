use shared::domain::{StatusFilter, TicketId, UserId};

pub const CHAT: &str = "/api/chat";
pub const USERS: &str = "/api/users";
pub const TICKETS: &str = "/api/tickets";
pub const RESET: &str = "/api/reset";

pub fn user(user_id: UserId) -> String {
    format!("{USERS}/{user_id}")
}

pub fn ticket(id: TicketId) -> String {
    format!("{TICKETS}/{id}")
}

pub fn tickets_with_status(filter: StatusFilter) -> String {
    format!("{TICKETS}?status={}", filter.as_query())
}
