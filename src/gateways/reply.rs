//! Reply gateway — sends an email under a fixed auto-reply subject.

use std::sync::Arc;

use tracing::info;

use crate::error::MailError;
use crate::providers::Mailbox;

/// Subject line on every outbound reply.
const REPLY_SUBJECT: &str = "Re: Auto-Reply";

/// Gateway over the mailbox collaborator's send operation. No retry;
/// the provider's synchronous acknowledgment is the only confirmation.
pub struct ReplyGateway {
    mailbox: Arc<dyn Mailbox>,
}

impl ReplyGateway {
    pub fn new(mailbox: Arc<dyn Mailbox>) -> Self {
        Self { mailbox }
    }

    /// Send `message_text` to `to`.
    pub async fn reply(&self, to: &str, message_text: &str) -> Result<(), MailError> {
        self.mailbox.send(to, REPLY_SUBJECT, message_text).await?;
        info!(to = %to, "Reply sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FetchedMessage;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingMailbox {
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl Mailbox for RecordingMailbox {
        async fn list_unread(&self) -> Result<Vec<String>, MailError> {
            Ok(vec![])
        }

        async fn fetch(&self, id: &str) -> Result<FetchedMessage, MailError> {
            Err(MailError::Malformed {
                id: id.into(),
                reason: "not used".into(),
            })
        }

        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.into(), subject.into(), body.into()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn reply_uses_fixed_subject() {
        let mailbox = Arc::new(RecordingMailbox {
            sent: Mutex::new(Vec::new()),
        });
        let gateway = ReplyGateway::new(mailbox.clone());

        gateway.reply("a@x.com", "Sure, happy to meet.").await.unwrap();

        let sent = mailbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@x.com");
        assert_eq!(sent[0].1, "Re: Auto-Reply");
        assert_eq!(sent[0].2, "Sure, happy to meet.");
    }
}
