//! Scheduling gateway — creates a 30-minute event and returns the join link.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::info;

use crate::error::CalendarError;
use crate::providers::{Calendar, EventRequest};

/// Meeting length attached to every scheduled event.
const MEETING_MINUTES: i64 = 30;

/// Gateway over the calendar collaborator. Failures propagate uncaught
/// so that no reply referencing a missing link is ever composed.
pub struct SchedulingGateway {
    calendar: std::sync::Arc<dyn Calendar>,
    timezone: Tz,
}

impl SchedulingGateway {
    pub fn new(calendar: std::sync::Arc<dyn Calendar>, timezone: Tz) -> Self {
        Self { calendar, timezone }
    }

    /// Create an event starting at `start` and return the join link.
    ///
    /// Both bounds are localized to the configured zone for display;
    /// the end is fixed at start + 30 minutes.
    pub async fn schedule(
        &self,
        start: DateTime<Utc>,
        title: &str,
        attendee: &str,
    ) -> Result<String, CalendarError> {
        let local_start = start.with_timezone(&self.timezone);
        let local_end = local_start + Duration::minutes(MEETING_MINUTES);

        let event = EventRequest {
            title: title.to_string(),
            start: local_start,
            end: local_end,
            timezone: self.timezone.name().to_string(),
            attendee: attendee.to_string(),
        };

        let link = self.calendar.insert_event(&event).await?;
        info!(title = %title, attendee = %attendee, "Meeting scheduled");
        Ok(link)
    }
}
