//! Profile and role upkeep for individual users.

use std::sync::Arc;

use courtside_core::types::{Role, UserId};
use courtside_db::model::{Achievement, User};
use courtside_db::store::UserStore;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::DirectoryClient;

pub struct UserService {
    users: Arc<dyn UserStore>,
    directory: Arc<dyn DirectoryClient>,
}

impl UserService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, directory: Arc<dyn DirectoryClient>) -> Self {
        Self { users, directory }
    }

    /// ## Summary
    /// Updates a user's bio and achievements and mirrors both into the
    /// identity directory's public metadata.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    #[tracing::instrument(skip(self, bio, achievements))]
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        bio: String,
        achievements: Vec<Achievement>,
    ) -> ServiceResult<User> {
        let mut user = self.require(user_id).await?;
        user.bio = bio;
        user.achievements = achievements;
        self.users.save(user.clone()).await?;

        self.directory
            .publish_profile(user_id, &user.bio, &user.achievements)
            .await?;

        Ok(user)
    }

    /// ## Summary
    /// Fetches one user document.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn info(&self, user_id: &UserId) -> ServiceResult<User> {
        self.require(user_id).await
    }

    /// ## Summary
    /// Sets the user's platform role and mirrors it into the directory.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn set_role(&self, user_id: &UserId, role: Role) -> ServiceResult<User> {
        let mut user = self.require(user_id).await?;
        user.role = role;
        self.users.save(user.clone()).await?;

        self.directory.set_role(user_id, role).await?;

        Ok(user)
    }

    async fn require(&self, id: &UserId) -> ServiceResult<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))
    }
}
