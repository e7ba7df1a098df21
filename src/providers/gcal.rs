//! Google Calendar REST client — event insert with a Meet link.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::CalendarError;
use crate::providers::{Calendar, EventRequest, GoogleToken};

const CALENDAR_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar collaborator over REST, writing to the primary calendar.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    token: GoogleToken,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(http: reqwest::Client, token: GoogleToken) -> Self {
        Self {
            http,
            token,
            base_url: CALENDAR_BASE.to_string(),
        }
    }
}

#[async_trait]
impl Calendar for GoogleCalendarClient {
    async fn insert_event(&self, event: &EventRequest) -> Result<String, CalendarError> {
        let payload = EventPayload::from(event);

        let url = format!("{}/calendars/primary/events", self.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.token.bearer().unwrap_or_default())
            .query(&[("conferenceDataVersion", "1")])
            .json(&payload)
            .send()
            .await
            .map_err(|e| CalendarError::Request(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedEvent = resp
            .json()
            .await
            .map_err(|e| CalendarError::Request(format!("decode event: {e}")))?;

        let link = created.hangout_link.ok_or(CalendarError::MissingJoinLink)?;
        debug!(title = %event.title, link = %link, "Event created");
        Ok(link)
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct EventPayload {
    summary: String,
    start: EventBound,
    end: EventBound,
    attendees: Vec<Attendee>,
    #[serde(rename = "conferenceData")]
    conference_data: ConferenceData,
}

#[derive(Debug, Serialize)]
struct EventBound {
    #[serde(rename = "dateTime")]
    date_time: String,
    #[serde(rename = "timeZone")]
    time_zone: String,
}

#[derive(Debug, Serialize)]
struct Attendee {
    email: String,
}

#[derive(Debug, Serialize)]
struct ConferenceData {
    #[serde(rename = "createRequest")]
    create_request: CreateRequest,
}

#[derive(Debug, Serialize)]
struct CreateRequest {
    #[serde(rename = "requestId")]
    request_id: String,
    #[serde(rename = "conferenceSolutionKey")]
    conference_solution_key: SolutionKey,
}

#[derive(Debug, Serialize)]
struct SolutionKey {
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CreatedEvent {
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
}

impl From<&EventRequest> for EventPayload {
    fn from(event: &EventRequest) -> Self {
        Self {
            summary: event.title.clone(),
            start: EventBound {
                date_time: event.start.to_rfc3339(),
                time_zone: event.timezone.clone(),
            },
            end: EventBound {
                date_time: event.end.to_rfc3339(),
                time_zone: event.timezone.clone(),
            },
            attendees: vec![Attendee {
                email: event.attendee.clone(),
            }],
            conference_data: ConferenceData {
                create_request: CreateRequest {
                    request_id: Uuid::new_v4().to_string(),
                    conference_solution_key: SolutionKey {
                        kind: "hangoutsMeet".to_string(),
                    },
                },
            },
        }
    }
}
