//! Gmail REST client — list unread, fetch one message, send raw mail.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MailError;
use crate::providers::{FetchedMessage, GoogleToken, Mailbox};

const GMAIL_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";

/// Gmail mailbox collaborator over REST, authenticated with the
/// bootstrap token artifact.
pub struct GmailClient {
    http: reqwest::Client,
    token: GoogleToken,
    base_url: String,
}

impl GmailClient {
    pub fn new(http: reqwest::Client, token: GoogleToken) -> Self {
        Self {
            http,
            token,
            base_url: GMAIL_BASE.to_string(),
        }
    }

    fn bearer(&self) -> &str {
        // Validated non-empty at load time.
        self.token.bearer().unwrap_or_default()
    }
}

#[async_trait]
impl Mailbox for GmailClient {
    async fn list_unread(&self) -> Result<Vec<String>, MailError> {
        let url = format!("{}/messages", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.bearer())
            .query(&[("labelIds", "INBOX"), ("q", "is:unread")])
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let listing: MessageList = resp
            .json()
            .await
            .map_err(|e| MailError::Request(format!("decode listing: {e}")))?;

        let ids: Vec<String> = listing
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect();
        debug!(count = ids.len(), "Listed unread messages");
        Ok(ids)
    }

    async fn fetch(&self, id: &str) -> Result<FetchedMessage, MailError> {
        let url = format!("{}/messages/{id}", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(self.bearer())
            .query(&[("format", "full")])
            .send()
            .await
            .map_err(|e| MailError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let msg: GmailMessage = resp
            .json()
            .await
            .map_err(|e| MailError::Request(format!("decode message: {e}")))?;

        let subject = msg.payload.header("Subject").unwrap_or_default();
        let sender = msg.payload.header("From").unwrap_or_default();
        let body = msg.payload.plain_text_body().unwrap_or_default();

        Ok(FetchedMessage {
            id: msg.id,
            sender,
            subject,
            body,
        })
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let rfc822 = format!("To: {to}\r\nSubject: {subject}\r\n\r\n{body}");
        let raw = URL_SAFE.encode(rfc822.as_bytes());

        let url = format!("{}/messages/send", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.bearer())
            .json(&SendRequest { raw })
            .send()
            .await
            .map_err(|e| MailError::SendFailed {
                to: to.to_string(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::SendFailed {
                to: to.to_string(),
                reason: format!("status {}: {body}", status.as_u16()),
            });
        }

        debug!(to = %to, "Mail sent");
        Ok(())
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct MessageList {
    messages: Option<Vec<MessageRef>>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct GmailMessage {
    id: String,
    payload: MessagePart,
}

#[derive(Debug, Deserialize)]
struct MessagePart {
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default, rename = "mimeType")]
    mime_type: String,
    #[serde(default)]
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PartBody {
    data: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendRequest {
    raw: String,
}

impl MessagePart {
    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
    }

    /// First `text/plain` part, walking one level of multipart nesting;
    /// falls back to the top-level body for single-part messages.
    fn plain_text_body(&self) -> Option<String> {
        for part in &self.parts {
            if part.mime_type == "text/plain"
                && let Some(text) = part.decoded_body()
            {
                return Some(text);
            }
            // multipart/alternative nests the text part one level down
            for nested in &part.parts {
                if nested.mime_type == "text/plain"
                    && let Some(text) = nested.decoded_body()
                {
                    return Some(text);
                }
            }
        }
        self.decoded_body()
    }

    fn decoded_body(&self) -> Option<String> {
        let data = self.body.as_ref()?.data.as_deref()?;
        decode_base64url(data)
    }
}

/// Decode Gmail's base64url body data, which arrives unpadded.
fn decode_base64url(data: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(data.trim_end_matches('='))
        .ok()?;
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(mime: &str, data: Option<&str>, parts: Vec<MessagePart>) -> MessagePart {
        MessagePart {
            headers: vec![],
            mime_type: mime.to_string(),
            body: data.map(|d| PartBody {
                data: Some(d.to_string()),
            }),
            parts,
        }
    }

    #[test]
    fn decodes_unpadded_base64url() {
        // "Can we meet?" encoded without padding
        let encoded = URL_SAFE_NO_PAD.encode("Can we meet?");
        assert_eq!(decode_base64url(&encoded).as_deref(), Some("Can we meet?"));
    }

    #[test]
    fn decodes_padded_base64url() {
        let encoded = URL_SAFE.encode("hello");
        assert_eq!(decode_base64url(&encoded).as_deref(), Some("hello"));
    }

    #[test]
    fn picks_first_text_plain_part() {
        let html = URL_SAFE_NO_PAD.encode("<p>hi</p>");
        let text = URL_SAFE_NO_PAD.encode("hi");
        let payload = part(
            "multipart/alternative",
            None,
            vec![
                part("text/html", Some(&html), vec![]),
                part("text/plain", Some(&text), vec![]),
            ],
        );
        assert_eq!(payload.plain_text_body().as_deref(), Some("hi"));
    }

    #[test]
    fn falls_back_to_top_level_body() {
        let text = URL_SAFE_NO_PAD.encode("single part");
        let payload = part("text/plain", Some(&text), vec![]);
        assert_eq!(payload.plain_text_body().as_deref(), Some("single part"));
    }

    #[test]
    fn finds_nested_text_part() {
        let text = URL_SAFE_NO_PAD.encode("nested");
        let payload = part(
            "multipart/mixed",
            None,
            vec![part(
                "multipart/alternative",
                None,
                vec![part("text/plain", Some(&text), vec![])],
            )],
        );
        assert_eq!(payload.plain_text_body().as_deref(), Some("nested"));
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let payload = MessagePart {
            headers: vec![Header {
                name: "subject".into(),
                value: "Hi".into(),
            }],
            mime_type: String::new(),
            body: None,
            parts: vec![],
        };
        assert_eq!(payload.header("Subject").as_deref(), Some("Hi"));
    }
}
