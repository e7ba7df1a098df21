//! External collaborators, specified by the interface the core needs.
//!
//! The pipeline only ever talks to these traits; the REST clients in
//! this module are the production implementations, and the test suite
//! substitutes in-memory mocks.

pub mod gcal;
pub mod gemini;
pub mod gmail;
pub mod token;

pub use gcal::GoogleCalendarClient;
pub use gemini::GeminiClient;
pub use gmail::GmailClient;
pub use token::GoogleToken;

use async_trait::async_trait;
use chrono::DateTime;

use crate::error::{CalendarError, LlmError, MailError};

/// A message fetched from the mailbox, read-only to the core.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    /// Provider-assigned, unique, stable identifier.
    pub id: String,
    /// Raw From header (may carry a display name).
    pub sender: String,
    pub subject: String,
    /// Plain-text body part.
    pub body: String,
}

/// Mailbox collaborator: list unread, fetch by id, send.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Ids of unread messages currently in the inbox.
    async fn list_unread(&self) -> Result<Vec<String>, MailError>;

    /// Headers and plain-text body for one message.
    async fn fetch(&self, id: &str) -> Result<FetchedMessage, MailError>;

    /// Send a message under the authenticated account.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError>;
}

/// A calendar event insertion request with a conferencing resource.
#[derive(Debug, Clone)]
pub struct EventRequest {
    pub title: String,
    pub start: DateTime<chrono_tz::Tz>,
    pub end: DateTime<chrono_tz::Tz>,
    /// IANA zone name the provider stores alongside the bounds.
    pub timezone: String,
    pub attendee: String,
}

/// Calendar collaborator: insert an event, get back a join link.
#[async_trait]
pub trait Calendar: Send + Sync {
    async fn insert_event(&self, event: &EventRequest) -> Result<String, CalendarError>;
}

/// Language-model collaborator: one prompt in, free text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, LlmError>;
}
