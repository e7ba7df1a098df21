//! Action dispatcher — maps a classified `Decision` onto gateway calls.
//!
//! Total over intent: the four recognized values each have a recipe,
//! and anything else becomes an explicit `unhandled` result with zero
//! side effects, so classifier drift stays observable.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::classifier::{Decision, Intent};
use crate::error::PipelineError;
use crate::gateways::{ReplyGateway, SchedulingGateway};

/// Lead time for an urgent meeting.
const URGENT_LEAD_MINUTES: i64 = 10;

/// Lead time for a casual meeting.
const CASUAL_LEAD_HOURS: i64 = 1;

/// Outcome status of a dispatched message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Replied,
    Scheduled,
    Urgent,
    Casual,
    Rejected,
    Unhandled,
}

/// Which side-effecting surface handled the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Reply,
    Calendar,
}

/// Caller-visible result of the pipeline, serialized exactly as the
/// ingress endpoint's wire contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    /// Sender filter rejection; no side effects were performed.
    Rejected { reason: String },
    /// A classified message, acted on or explicitly left unhandled.
    Acted {
        status: ActionStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        action: Option<ActionKind>,
        #[serde(skip_serializing_if = "Option::is_none")]
        link: Option<String>,
        summary: String,
        intent: String,
    },
}

impl ActionResult {
    pub fn rejected() -> Self {
        ActionResult::Rejected {
            reason: "sender not in whitelist".to_string(),
        }
    }

    pub fn status(&self) -> ActionStatus {
        match self {
            ActionResult::Rejected { .. } => ActionStatus::Rejected,
            ActionResult::Acted { status, .. } => *status,
        }
    }
}

/// Dispatcher over the two gateways.
pub struct ActionDispatcher {
    scheduling: SchedulingGateway,
    reply: ReplyGateway,
}

impl ActionDispatcher {
    pub fn new(scheduling: SchedulingGateway, reply: ReplyGateway) -> Self {
        Self { scheduling, reply }
    }

    /// Execute the recipe for `decision` on behalf of `sender`.
    ///
    /// Meeting intents schedule first and reply second: a reply never
    /// references a link that does not exist yet, and a failed
    /// scheduling call aborts the reply entirely.
    pub async fn dispatch(
        &self,
        sender: &str,
        decision: &Decision,
    ) -> Result<ActionResult, PipelineError> {
        let now = Utc::now();

        match &decision.intent {
            Intent::Reply => {
                self.reply.reply(sender, &decision.reply_text).await?;
                Ok(acted(
                    ActionStatus::Replied,
                    Some(ActionKind::Reply),
                    None,
                    decision,
                ))
            }

            Intent::ScheduleMeeting => {
                let start = decision.meeting_time.unwrap_or_else(|| {
                    warn!(
                        sender = %sender,
                        "schedule_meeting without a parsed meeting time, defaulting to one hour out"
                    );
                    now + Duration::hours(CASUAL_LEAD_HOURS)
                });
                let link = self
                    .scheduling
                    .schedule(start, "Scheduled Meeting", sender)
                    .await?;
                let followup = compose_scheduled(&decision.reply_text, start, &link);
                self.reply.reply(sender, &followup).await?;
                Ok(acted(
                    ActionStatus::Scheduled,
                    Some(ActionKind::Calendar),
                    Some(link),
                    decision,
                ))
            }

            Intent::UrgentMeeting => {
                let start = now + Duration::minutes(URGENT_LEAD_MINUTES);
                let link = self
                    .scheduling
                    .schedule(start, "Urgent Meeting", sender)
                    .await?;
                let followup = compose_urgent(&decision.reply_text, &link);
                self.reply.reply(sender, &followup).await?;
                Ok(acted(ActionStatus::Urgent, None, Some(link), decision))
            }

            Intent::CasualMeeting => {
                let start = now + Duration::hours(CASUAL_LEAD_HOURS);
                let link = self
                    .scheduling
                    .schedule(start, "Casual Meeting", sender)
                    .await?;
                let followup = compose_casual(&decision.reply_text, &link);
                self.reply.reply(sender, &followup).await?;
                Ok(acted(ActionStatus::Casual, None, Some(link), decision))
            }

            Intent::Other(raw) => {
                info!(intent = %raw, sender = %sender, "Unrecognized intent, no action taken");
                Ok(acted(ActionStatus::Unhandled, None, None, decision))
            }
        }
    }
}

fn acted(
    status: ActionStatus,
    action: Option<ActionKind>,
    link: Option<String>,
    decision: &Decision,
) -> ActionResult {
    ActionResult::Acted {
        status,
        action,
        link,
        summary: decision.summary.clone(),
        intent: decision.intent.as_str().to_string(),
    }
}

// ── Reply composition ───────────────────────────────────────────────

fn compose_scheduled(reply_text: &str, start: DateTime<Utc>, link: &str) -> String {
    format!(
        "{reply_text}\n\nI've scheduled our meeting at {}. You can join via this Google Meet \
         link: {link}. Please let me know if this time works for you.",
        start.format("%Y-%m-%d %H:%M")
    )
}

fn compose_urgent(reply_text: &str, link: &str) -> String {
    format!(
        "{reply_text}\n\nI've created an urgent Google Meet that starts in 10 minutes. \
         Join here: {link}. I'll be available to discuss immediately."
    )
}

fn compose_casual(reply_text: &str, link: &str) -> String {
    format!(
        "{reply_text}\n\nLooking forward to catching up! I've scheduled a casual Google Meet \
         in 1 hour. Here's the link: {link}."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_serializes_to_reason_only() {
        let json = serde_json::to_value(ActionResult::rejected()).unwrap();
        assert_eq!(json, serde_json::json!({"reason": "sender not in whitelist"}));
    }

    #[test]
    fn replied_serializes_without_link() {
        let result = ActionResult::Acted {
            status: ActionStatus::Replied,
            action: Some(ActionKind::Reply),
            link: None,
            summary: "hi".into(),
            intent: "reply".into(),
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "replied",
                "action": "reply",
                "summary": "hi",
                "intent": "reply",
            })
        );
    }

    #[test]
    fn urgent_serializes_without_action_key() {
        let result = ActionResult::Acted {
            status: ActionStatus::Urgent,
            action: None,
            link: Some("https://meet.example/x".into()),
            summary: "s".into(),
            intent: "urgent_meeting".into(),
        };
        let json = serde_json::to_value(result).unwrap();
        assert!(json.get("action").is_none());
        assert_eq!(json["status"], "urgent");
        assert_eq!(json["link"], "https://meet.example/x");
    }

    #[test]
    fn composed_bodies_reference_the_link() {
        let body = compose_urgent("On it.", "https://meet.example/u");
        assert!(body.starts_with("On it.\n\n"));
        assert!(body.contains("10 minutes"));
        assert!(body.contains("https://meet.example/u"));

        let body = compose_casual("Sounds fun!", "https://meet.example/c");
        assert!(body.contains("1 hour"));
        assert!(body.contains("https://meet.example/c"));

        let start = "2024-06-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let body = compose_scheduled("Sure.", start, "https://meet.example/s");
        assert!(body.contains("2024-06-01 10:00"));
        assert!(body.contains("Please let me know if this time works for you."));
    }
}
