//! Coach registration, the coach directory, and coach profile upkeep.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use courtside_core::types::{CoachStatus, UserId};
use courtside_db::model::{CoachProfile, CoachProfilePatch, User};
use courtside_db::store::{CoachStore, UserStore};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::DirectoryClient;

#[derive(Debug, Clone)]
pub struct RegisterCoachRequest {
    pub user_id: UserId,
    pub years_of_experience: u32,
    pub certifications: Vec<String>,
    pub specialities: Vec<String>,
    pub preferred_session_duration: String,
    pub bio: String,
    pub languages: Vec<String>,
}

/// Directory entry: the coach's user document plus registration details.
#[derive(Debug, Clone, Serialize)]
pub struct CoachListing {
    pub user: User,
    /// `None` when the user is flagged as a coach but never completed
    /// registration.
    pub profile: Option<CoachProfile>,
}

/// A coach profile merged with identity fields for display.
#[derive(Debug, Clone, Serialize)]
pub struct CoachProfileView {
    pub profile: CoachProfile,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_image_url: String,
}

pub struct CoachService {
    users: Arc<dyn UserStore>,
    coaches: Arc<dyn CoachStore>,
    directory: Arc<dyn DirectoryClient>,
}

impl CoachService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        coaches: Arc<dyn CoachStore>,
        directory: Arc<dyn DirectoryClient>,
    ) -> Self {
        Self {
            users,
            coaches,
            directory,
        }
    }

    /// ## Summary
    /// Registers a user as a coach: persists the profile, flips the user's
    /// coach status (resetting their coach session links), and mirrors the
    /// registration into the identity directory's public metadata.
    ///
    /// ## Errors
    /// `NotFound` when the directory does not know the subject,
    /// `ValidationError` when a profile already exists for the user.
    #[tracing::instrument(skip(self, request), fields(user = %request.user_id))]
    pub async fn register(
        &self,
        request: RegisterCoachRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<CoachProfile> {
        if !self.directory.subject_exists(&request.user_id).await? {
            return Err(ServiceError::NotFound(format!(
                "no account found for subject {}",
                request.user_id
            )));
        }

        if self.coaches.get(&request.user_id).await?.is_some() {
            return Err(ServiceError::ValidationError(
                "coach already registered for this user".to_owned(),
            ));
        }

        let profile = CoachProfile {
            user_id: request.user_id.clone(),
            years_of_experience: request.years_of_experience,
            certifications: request.certifications,
            specialities: request.specialities,
            preferred_session_duration: request.preferred_session_duration,
            bio: request.bio,
            languages: request.languages,
            created_at: now,
            updated_at: now,
        };
        self.coaches.insert(profile.clone()).await?;

        self.directory
            .set_coach_metadata(&request.user_id, &profile)
            .await?;

        if let Some(mut user) = self.users.get(&request.user_id).await? {
            user.coach_status = CoachStatus::Coach;
            user.invited_sessions_as_coach.clear();
            self.users.save(user).await?;
        }

        tracing::info!(user = %request.user_id, "coach registered");
        Ok(profile)
    }

    /// Every active coach, enriched with registration details.
    pub async fn directory(&self) -> ServiceResult<Vec<CoachListing>> {
        let coach_users = self.users.coaches().await?;
        let mut listings = Vec::with_capacity(coach_users.len());
        for user in coach_users {
            let profile = self.coaches.get(&user.id).await?;
            listings.push(CoachListing { user, profile });
        }
        Ok(listings)
    }

    /// ## Summary
    /// One coach's profile merged with their identity fields.
    ///
    /// ## Errors
    /// `NotFound` when either the profile or the user document is missing.
    pub async fn profile(&self, coach_id: &UserId) -> ServiceResult<CoachProfileView> {
        let profile = self
            .coaches
            .get(coach_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("coach profile {coach_id}")))?;
        let user = self
            .users
            .get(coach_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {coach_id}")))?;

        Ok(CoachProfileView {
            profile,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            profile_image_url: user.profile_image_url,
        })
    }

    /// ## Summary
    /// Applies a field patch to a coach profile.
    ///
    /// ## Errors
    /// `NotFound` when no profile exists for the user.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit_profile(
        &self,
        coach_id: &UserId,
        patch: CoachProfilePatch,
        now: DateTime<Utc>,
    ) -> ServiceResult<CoachProfile> {
        self.coaches
            .update(coach_id, patch, now)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("coach profile {coach_id}")))
    }
}
