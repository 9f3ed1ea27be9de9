use chrono::{DateTime, Utc};
use courtside_core::types::UserId;
use serde::{Deserialize, Serialize};

/// Coach registration document; at most one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachProfile {
    pub user_id: UserId,
    pub years_of_experience: u32,
    pub certifications: Vec<String>,
    pub specialities: Vec<String>,
    pub preferred_session_duration: String,
    pub bio: String,
    pub languages: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `$set`-style patch; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoachProfilePatch {
    pub years_of_experience: Option<u32>,
    pub certifications: Option<Vec<String>>,
    pub specialities: Option<Vec<String>>,
    pub preferred_session_duration: Option<String>,
    pub bio: Option<String>,
    pub languages: Option<Vec<String>>,
}

impl CoachProfile {
    pub fn apply(&mut self, patch: CoachProfilePatch, now: DateTime<Utc>) {
        if let Some(years) = patch.years_of_experience {
            self.years_of_experience = years;
        }
        if let Some(certifications) = patch.certifications {
            self.certifications = certifications;
        }
        if let Some(specialities) = patch.specialities {
            self.specialities = specialities;
        }
        if let Some(duration) = patch.preferred_session_duration {
            self.preferred_session_duration = duration;
        }
        if let Some(bio) = patch.bio {
            self.bio = bio;
        }
        if let Some(languages) = patch.languages {
            self.languages = languages;
        }
        self.updated_at = now;
    }
}
