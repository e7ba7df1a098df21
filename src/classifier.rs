//! Intent classifier — turns a raw email body into a structured `Decision`.
//!
//! One model call per message with a fixed instruction template, then
//! line-anchored extraction of the four labeled fields. Every field
//! degrades independently, and a failed model call degrades to a fixed
//! fallback `Decision` — classification never errors to the caller, so
//! an email always gets some acknowledgment instead of vanishing.

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::providers::LanguageModel;

/// Sampling temperature for classification calls.
const CLASSIFY_TEMPERATURE: f32 = 0.7;

/// Fallback summary when the model omits the Summary line.
const FALLBACK_SUMMARY: &str = "No summary";

/// Fallback reply when the model omits the Reply line.
const FALLBACK_REPLY: &str = "Thank you for your email. I'll follow up shortly.";

/// Summary used when the model call itself fails.
const ERROR_SUMMARY: &str = "Could not summarize";

/// Apology sent when the model call itself fails.
const ERROR_REPLY: &str = "Apologies, we couldn't process your message.";

/// The classifier's categorical judgment of what an email requires.
///
/// Values outside the four-item enum are preserved, not rejected:
/// the dispatcher is responsible for treating them as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Reply,
    ScheduleMeeting,
    UrgentMeeting,
    CasualMeeting,
    Other(String),
}

impl Intent {
    /// Parse a raw intent value, lower-casing first.
    pub fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "reply" => Intent::Reply,
            "schedule_meeting" => Intent::ScheduleMeeting,
            "urgent_meeting" => Intent::UrgentMeeting,
            "casual_meeting" => Intent::CasualMeeting,
            other => Intent::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Intent::Reply => "reply",
            Intent::ScheduleMeeting => "schedule_meeting",
            Intent::UrgentMeeting => "urgent_meeting",
            Intent::CasualMeeting => "casual_meeting",
            Intent::Other(raw) => raw,
        }
    }
}

/// Structured decision produced once per message, consumed once by the
/// dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub summary: String,
    pub intent: Intent,
    pub reply_text: String,
    pub meeting_time: Option<DateTime<Utc>>,
}

impl Decision {
    /// Hard-coded decision substituted when the model call fails.
    pub fn fallback() -> Self {
        Self {
            summary: ERROR_SUMMARY.to_string(),
            intent: Intent::Reply,
            reply_text: ERROR_REPLY.to_string(),
            meeting_time: None,
        }
    }
}

/// Classifier over a language-model collaborator.
pub struct IntentClassifier {
    llm: Arc<dyn LanguageModel>,
    extractor: FieldExtractor,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            llm,
            extractor: FieldExtractor::new(),
        }
    }

    /// Classify one email body.
    ///
    /// Never errors: a failed model call yields `Decision::fallback()`.
    pub async fn classify(&self, body: &str) -> Decision {
        let prompt = build_prompt(body);

        match self.llm.complete(&prompt, CLASSIFY_TEMPERATURE).await {
            Ok(raw) => {
                let decision = self.extractor.parse_decision(&raw);
                debug!(intent = decision.intent.as_str(), "Email classified");
                decision
            }
            Err(e) => {
                warn!(error = %e, "Model call failed, using fallback decision");
                Decision::fallback()
            }
        }
    }
}

/// Build the fixed instruction template around the raw body.
fn build_prompt(email_body: &str) -> String {
    format!(
        "You are a professional AI email assistant.\n\n\
         TASK:\n\
         - Carefully analyze the following email.\n\
         - Write a full, detailed, emotionally appropriate reply (at least 5 sentences).\n\
         - Detect intent: reply, urgent_meeting, schedule_meeting, casual_meeting.\n\
         - Use professional tone, show understanding and clarity.\n\
         - NEVER only reply with short greetings or simple links.\n\
         - If needed, include the meeting link in context with explanation.\n\
         - DO NOT begin reply with \"Hi\" or \"Dear\" only, address the issue meaningfully.\n\
         - Add meeting time if mentioned or required.\n\n\
         RESPONSE FORMAT:\n\
         Summary: <...>\n\
         Intent: <reply | urgent_meeting | schedule_meeting | casual_meeting>\n\
         Reply: <long-form, helpful, contextual reply>\n\
         MeetingTime: <YYYY-MM-DD HH:MM or None>\n\n\
         EMAIL:\n\
         \"\"\"\n\
         {email_body}\n\
         \"\"\"\n"
    )
}

// ── Field extraction ────────────────────────────────────────────────

/// Line-anchored extraction of the four labeled fields.
///
/// Each field is pulled out independently, so a response missing one
/// label (or padded with extra prose) still yields the others.
struct FieldExtractor {
    summary: Regex,
    intent: Regex,
    reply: Regex,
    meeting_time: Regex,
}

impl FieldExtractor {
    fn new() -> Self {
        Self {
            summary: Regex::new(r"(?m)^\s*Summary:\s*(.*)").unwrap(),
            intent: Regex::new(r"(?m)^\s*Intent:\s*(.*)").unwrap(),
            reply: Regex::new(r"(?m)^\s*Reply:\s*(.*)").unwrap(),
            meeting_time: Regex::new(r"(?m)^\s*MeetingTime:\s*(.*)").unwrap(),
        }
    }

    /// Parse a raw model response, applying per-field fallbacks.
    fn parse_decision(&self, raw: &str) -> Decision {
        let summary = self
            .capture(&self.summary, raw)
            .unwrap_or_else(|| FALLBACK_SUMMARY.to_string());

        let intent = self
            .capture(&self.intent, raw)
            .map(|v| Intent::parse(&v))
            .unwrap_or(Intent::Reply);

        let reply_text = self
            .capture(&self.reply, raw)
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        let meeting_time = self
            .capture(&self.meeting_time, raw)
            .filter(|v| !v.eq_ignore_ascii_case("none"))
            .and_then(|v| parse_meeting_time(&v));

        Decision {
            summary,
            intent,
            reply_text,
            meeting_time,
        }
    }

    fn capture(&self, re: &Regex, raw: &str) -> Option<String> {
        re.captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

/// Parse the template's `YYYY-MM-DD HH:MM` format as a UTC instant.
/// Unparseable values degrade to `None` rather than failing the message.
fn parse_meeting_time(raw: &str) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        Ok(naive) => Some(naive.and_utc()),
        Err(_) => {
            warn!(value = %raw, "Unparseable meeting time, treating as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn parse(raw: &str) -> Decision {
        FieldExtractor::new().parse_decision(raw)
    }

    #[test]
    fn full_response_parses_all_fields() {
        let raw = "Summary: meeting request\n\
                   Intent: schedule_meeting\n\
                   Reply: Sure, happy to meet.\n\
                   MeetingTime: 2024-06-01 10:00";
        let d = parse(raw);
        assert_eq!(d.summary, "meeting request");
        assert_eq!(d.intent, Intent::ScheduleMeeting);
        assert_eq!(d.reply_text, "Sure, happy to meet.");
        let t = d.meeting_time.unwrap();
        assert_eq!(t.hour(), 10);
    }

    #[test]
    fn missing_summary_falls_back() {
        let d = parse("Intent: reply\nReply: ok\nMeetingTime: None");
        assert_eq!(d.summary, "No summary");
    }

    #[test]
    fn missing_intent_defaults_to_reply() {
        let d = parse("Summary: hi\nReply: ok\nMeetingTime: None");
        assert_eq!(d.intent, Intent::Reply);
    }

    #[test]
    fn missing_reply_uses_generic_acknowledgment() {
        let d = parse("Summary: hi\nIntent: reply");
        assert_eq!(d.reply_text, "Thank you for your email. I'll follow up shortly.");
    }

    #[test]
    fn empty_response_uses_every_fallback() {
        let d = parse("");
        assert_eq!(d.summary, "No summary");
        assert_eq!(d.intent, Intent::Reply);
        assert_eq!(d.reply_text, "Thank you for your email. I'll follow up shortly.");
        assert_eq!(d.meeting_time, None);
    }

    #[test]
    fn meeting_time_none_any_case() {
        for v in ["None", "none", "NONE", "nOnE"] {
            let d = parse(&format!("MeetingTime: {v}"));
            assert_eq!(d.meeting_time, None, "value: {v}");
        }
    }

    #[test]
    fn meeting_time_unparseable_degrades_to_none() {
        let d = parse("MeetingTime: next Tuesday afternoon");
        assert_eq!(d.meeting_time, None);
    }

    #[test]
    fn intent_is_lowercased() {
        let d = parse("Intent: Urgent_Meeting");
        assert_eq!(d.intent, Intent::UrgentMeeting);
    }

    #[test]
    fn unrecognized_intent_preserved_not_validated() {
        let d = parse("Intent: forward_to_legal");
        assert_eq!(d.intent, Intent::Other("forward_to_legal".into()));
        assert_eq!(d.intent.as_str(), "forward_to_legal");
    }

    #[test]
    fn fields_survive_extra_prose() {
        let raw = "Here is my analysis of the email.\n\n\
                   Summary: quick question\n\
                   Some extra commentary the model added.\n\
                   Intent: reply\n\
                   Reply: Happy to help with that.\n\
                   MeetingTime: None\n\
                   Let me know if you need anything else.";
        let d = parse(raw);
        assert_eq!(d.summary, "quick question");
        assert_eq!(d.intent, Intent::Reply);
        assert_eq!(d.reply_text, "Happy to help with that.");
    }

    #[test]
    fn fallback_decision_shape() {
        let d = Decision::fallback();
        assert_eq!(d.summary, "Could not summarize");
        assert_eq!(d.intent, Intent::Reply);
        assert_eq!(d.reply_text, "Apologies, we couldn't process your message.");
        assert_eq!(d.meeting_time, None);
    }

    #[test]
    fn prompt_carries_body_and_labels() {
        let prompt = build_prompt("Can we meet?");
        assert!(prompt.contains("Can we meet?"));
        assert!(prompt.contains("Summary:"));
        assert!(prompt.contains("Intent:"));
        assert!(prompt.contains("Reply:"));
        assert!(prompt.contains("MeetingTime:"));
    }
}
