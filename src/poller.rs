//! Inbox poller — discovers unread messages and feeds them to the pipeline.
//!
//! Runs forever on its own tokio task: list unread ids, skip anything
//! already seen, extract sender/subject/body, submit through the same
//! pipeline the ingress endpoint uses. An id enters the seen-set only
//! after the full pipeline (gateway calls included) returns, so a
//! failed message is retried on the next cycle rather than lost.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::pipeline::TriagePipeline;
use crate::providers::Mailbox;

/// Dedup guard over provider-assigned message ids.
///
/// The poller is the only writer today; the mutex is what lets a second
/// poller worker appear later without a redesign.
#[derive(Debug, Default)]
pub struct SeenSet {
    ids: Mutex<HashSet<String>>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.lock().unwrap().contains(id)
    }

    pub fn insert(&self, id: &str) {
        self.ids.lock().unwrap().insert(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.ids.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.lock().unwrap().is_empty()
    }
}

/// Spawn the background poll loop.
///
/// Returns a `JoinHandle` and a shutdown flag; set the flag to stop
/// polling after the current cycle.
pub fn spawn_inbox_poller(
    mailbox: Arc<dyn Mailbox>,
    pipeline: Arc<TriagePipeline>,
    interval_secs: u64,
) -> (JoinHandle<()>, Arc<AtomicBool>) {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = Arc::clone(&shutdown);

    let handle = tokio::spawn(async move {
        info!("Inbox poller started, polling every {interval_secs}s");

        let seen = SeenSet::new();
        let mut tick = tokio::time::interval(Duration::from_secs(interval_secs));

        loop {
            tick.tick().await;

            if shutdown.load(Ordering::Relaxed) {
                info!("Inbox poller shutting down");
                return;
            }

            poll_once(&mailbox, &pipeline, &seen).await;
        }
    });

    (handle, shutdown_flag)
}

/// Run a single poll cycle: list unread → dedup → extract → submit.
pub async fn poll_once(mailbox: &Arc<dyn Mailbox>, pipeline: &TriagePipeline, seen: &SeenSet) {
    let ids = match mailbox.list_unread().await {
        Ok(ids) => ids,
        Err(e) => {
            error!(error = %e, "Inbox listing failed, skipping cycle");
            return;
        }
    };

    for id in ids {
        if seen.contains(&id) {
            continue;
        }

        let message = match mailbox.fetch(&id).await {
            Ok(msg) => msg,
            Err(e) => {
                // Leave unmarked so the fetch is retried next cycle.
                warn!(id = %id, error = %e, "Fetch failed");
                continue;
            }
        };

        let sender = extract_bare_address(&message.sender);

        match pipeline.handle(sender, &message.subject, &message.body).await {
            Ok(result) => {
                debug!(
                    id = %id,
                    sender = %sender,
                    status = ?result.status(),
                    "Message processed"
                );
                seen.insert(&id);
            }
            Err(e) => {
                // Gateway failure: retried next cycle, at-least-once.
                warn!(id = %id, sender = %sender, error = %e, "Pipeline failed, will retry");
            }
        }
    }
}

/// Normalize a From header to a bare address: the content inside angle
/// brackets when a display name is present, else the raw field.
pub fn extract_bare_address(from: &str) -> &str {
    if let Some(open) = from.find('<')
        && let Some(close) = from[open..].find('>')
    {
        return &from[open + 1..open + close];
    }
    from
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_address_from_display_name() {
        assert_eq!(
            extract_bare_address("Alice Smith <alice@example.com>"),
            "alice@example.com"
        );
    }

    #[test]
    fn bare_address_passthrough() {
        assert_eq!(extract_bare_address("alice@example.com"), "alice@example.com");
    }

    #[test]
    fn bare_address_unclosed_bracket_left_verbatim() {
        assert_eq!(extract_bare_address("Alice <alice@x.com"), "Alice <alice@x.com");
    }

    #[test]
    fn seen_set_grows_monotonically() {
        let seen = SeenSet::new();
        assert!(seen.is_empty());
        seen.insert("a");
        seen.insert("a");
        seen.insert("b");
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("a"));
        assert!(!seen.contains("c"));
    }
}
