//! Ticket records and the request wire format.
//!
//! A ticket arrives as JSON with camelCase field names. The record is
//! immutable for the duration of a render: every downstream stage reads
//! from it, none write back.

use serde::Deserialize;

/// One ticket to render and print.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRecord {
    /// Show name; also keys the logo asset via [`TicketRecord::show_slug`].
    pub show: String,
    /// Free-form display text, e.g. "Friday, March 13 - 7:30PM".
    pub date_time: String,
    /// Attendee name.
    pub name: String,
    /// Accepted on the wire; not drawn anywhere yet.
    #[serde(default)]
    pub ticket_type: Option<String>,
    pub is_subscriber: bool,
    pub section: String,
    pub row: String,
    pub seat: String,
    /// QR payload and staged-file name.
    pub ticket_id: String,
}

/// Request body for `POST /`.
#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    pub tickets: Vec<TicketRecord>,
}

/// Section code for general admission, which gets an extra seating note
/// for subscribers.
pub const GENERAL_ADMISSION: &str = "GA";

impl TicketRecord {
    /// Normalized slug used to look up the show's logo asset.
    pub fn show_slug(&self) -> String {
        show_slug(&self.show)
    }

    /// The ticket id doubles as the staged file name, so it must be
    /// non-empty and free of path separators or other special characters.
    pub fn has_safe_id(&self) -> bool {
        !self.ticket_id.is_empty()
            && self
                .ticket_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

/// Derive a logo slug from a show name: lowercased, each whitespace run
/// becomes a single hyphen, and the characters `!?,':.` are dropped.
pub fn show_slug(show: &str) -> String {
    let mut slug = String::with_capacity(show.len());
    let mut in_space = false;
    for c in show.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
                in_space = true;
            }
        } else {
            in_space = false;
            if !matches!(c, '!' | '?' | ',' | '\'' | ':' | '.') {
                slug.push(c);
            }
        }
    }
    slug
}
