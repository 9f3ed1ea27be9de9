use chrono::{DateTime, Utc};
use courtside_core::schedule::{ResolutionState, Schedulable, TimeSlot};
use courtside_core::types::{SessionId, UserId};
use serde::{Deserialize, Serialize};

/// Coaching-session document. Sessions are never deleted; they resolve one
/// way (pending to accepted or rejected) and age out of views through
/// bucketing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub coach: UserId,
    pub students: Vec<UserId>,
    pub slot: TimeSlot,
    pub total_participants: u32,
    #[serde(default)]
    pub resolution: ResolutionState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedulable for Session {
    fn slot(&self) -> TimeSlot {
        self.slot
    }

    fn resolution(&self) -> Option<ResolutionState> {
        Some(self.resolution)
    }
}
