//! Triage pipeline — the single code path for every message.
//!
//! Filter → Classifier → Dispatcher, in that order. The poller and the
//! ingress endpoint both funnel through `handle`, so behavior is
//! identical regardless of trigger source.

use tracing::info;

use crate::classifier::IntentClassifier;
use crate::dispatch::{ActionDispatcher, ActionResult};
use crate::error::PipelineError;
use crate::filter::SenderFilter;

pub struct TriagePipeline {
    filter: SenderFilter,
    classifier: IntentClassifier,
    dispatcher: ActionDispatcher,
}

impl TriagePipeline {
    pub fn new(
        filter: SenderFilter,
        classifier: IntentClassifier,
        dispatcher: ActionDispatcher,
    ) -> Self {
        Self {
            filter,
            classifier,
            dispatcher,
        }
    }

    /// Run one already-extracted message through the pipeline.
    ///
    /// Filter rejection short-circuits with no side effects. The
    /// classifier never errors (it degrades to a fallback decision);
    /// the only `Err` here is a gateway failure, which aborts the
    /// message's remaining actions.
    pub async fn handle(
        &self,
        sender: &str,
        subject: &str,
        body: &str,
    ) -> Result<ActionResult, PipelineError> {
        if !self.filter.is_allowed(sender) {
            info!(sender = %sender, "Rejected by sender filter");
            return Ok(ActionResult::rejected());
        }

        info!(sender = %sender, subject = %subject, "Triaging message");
        let decision = self.classifier.classify(body).await;
        self.dispatcher.dispatch(sender, &decision).await
    }
}
