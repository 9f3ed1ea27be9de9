use chrono::{DateTime, Utc};
use courtside_core::schedule::{Schedulable, TimeSlot};
use courtside_core::types::{TournamentId, UserId};
use serde::{Deserialize, Serialize};

/// Tournament document. Carries no resolution state: any temporal overlap
/// with another tournament of the same user is a conflict regardless of
/// acceptance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub owner: UserId,
    pub name: String,
    pub max_players: u32,
    pub location: String,
    pub slot: TimeSlot,
    pub sport: String,
    pub members: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Whether `user` owns this tournament or plays in it.
    #[must_use]
    pub fn involves(&self, user: &UserId) -> bool {
        self.owner == *user || self.members.contains(user)
    }
}

impl Schedulable for Tournament {
    fn slot(&self) -> TimeSlot {
        self.slot
    }
}
