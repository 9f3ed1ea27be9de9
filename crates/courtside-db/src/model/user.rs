use courtside_core::types::{CoachStatus, Role, SessionId, TournamentId, UserId};
use serde::{Deserialize, Serialize};

/// Badge shown on a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub icon: String,
    pub name: String,
    pub color: String,
}

/// Link from a student to a coach through the session that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachLink {
    pub coach_id: UserId,
    pub session_id: SessionId,
}

/// User document: identity fields synced from the directory, extended with
/// platform state (friend graph, tournament and session links).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub coach_status: CoachStatus,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub friend_requests: Vec<UserId>,
    #[serde(default)]
    pub sent_requests: Vec<UserId>,
    #[serde(default)]
    pub friends: Vec<UserId>,
    #[serde(default)]
    pub created_tournaments: Vec<TournamentId>,
    #[serde(default)]
    pub invited_tournaments: Vec<TournamentId>,
    #[serde(default)]
    pub coaches: Vec<CoachLink>,
    #[serde(default)]
    pub invited_sessions: Vec<SessionId>,
    #[serde(default)]
    pub created_sessions: Vec<SessionId>,
    #[serde(default)]
    pub invited_sessions_as_coach: Vec<SessionId>,
}

impl User {
    /// Fresh document for a newly synced directory subject: default role,
    /// not a coach, empty link arrays.
    #[must_use]
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: Role::default(),
            profile_image_url: String::new(),
            coach_status: CoachStatus::default(),
            bio: String::new(),
            achievements: Vec::new(),
            friend_requests: Vec::new(),
            sent_requests: Vec::new(),
            friends: Vec::new(),
            created_tournaments: Vec::new(),
            invited_tournaments: Vec::new(),
            coaches: Vec::new(),
            invited_sessions: Vec::new(),
            created_sessions: Vec::new(),
            invited_sessions_as_coach: Vec::new(),
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    #[must_use]
    pub fn is_friend_of(&self, other: &UserId) -> bool {
        self.friends.contains(other)
    }

    #[must_use]
    pub fn is_coach(&self) -> bool {
        self.coach_status == CoachStatus::Coach
    }
}
