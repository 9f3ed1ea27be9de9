//! Identity-directory sync: applies account events delivered by the
//! webhook layer. Signature verification happens before events reach this
//! service; here they are trusted facts about accounts.

use std::sync::Arc;

use courtside_core::types::{CoachStatus, UserId};
use courtside_db::model::User;
use courtside_db::store::UserStore;

use crate::error::ServiceResult;
use crate::ports::{DirectoryClient, Notifier};

/// Identity fields carried by a directory account event.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: String,
    /// Absent when the account was created before the platform started
    /// stamping the flag.
    pub coach_status: Option<CoachStatus>,
}

/// Account event from the identity directory.
#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    /// Account created or updated upstream.
    UserUpserted(DirectoryUser),
    /// Account removed upstream.
    UserDeleted { id: UserId },
}

pub struct DirectorySyncService {
    users: Arc<dyn UserStore>,
    directory: Arc<dyn DirectoryClient>,
    notifier: Arc<dyn Notifier>,
}

impl DirectorySyncService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        directory: Arc<dyn DirectoryClient>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            directory,
            notifier,
        }
    }

    /// ## Summary
    /// Applies one directory event to the local user collection.
    ///
    /// Upserts refresh identity fields but leave platform state (friend
    /// graph, tournament and session links) untouched on existing
    /// documents; a first-time upsert creates a fresh document and sends
    /// the welcome notification. Deletes remove the document.
    ///
    /// ## Errors
    /// Store and port failures.
    #[tracing::instrument(skip(self, event))]
    pub async fn apply(&self, event: DirectoryEvent) -> ServiceResult<()> {
        match event {
            DirectoryEvent::UserUpserted(subject) => self.upsert(subject).await,
            DirectoryEvent::UserDeleted { id } => {
                let removed = self.users.delete(&id).await?;
                tracing::info!(user = %id, removed, "directory delete applied");
                Ok(())
            }
        }
    }

    async fn upsert(&self, subject: DirectoryUser) -> ServiceResult<()> {
        let coach_status = match subject.coach_status {
            Some(status) => status,
            None => {
                // The directory has not stamped the flag yet; default it
                // locally and write it back so later events carry it.
                self.directory.mark_not_coach(&subject.id).await?;
                CoachStatus::NotCoach
            }
        };

        match self.users.get(&subject.id).await? {
            Some(mut existing) => {
                existing.email = subject.email;
                existing.first_name = subject.first_name;
                existing.last_name = subject.last_name;
                existing.profile_image_url = subject.profile_image_url;
                existing.coach_status = coach_status;
                self.users.save(existing).await?;
                tracing::debug!(user = %subject.id, "directory update applied");
            }
            None => {
                let mut user = User::new(
                    subject.id.clone(),
                    subject.email,
                    subject.first_name,
                    subject.last_name,
                );
                user.profile_image_url = subject.profile_image_url;
                user.coach_status = coach_status;
                self.users.save(user.clone()).await?;

                self.notifier.welcome(&user).await?;
                tracing::info!(user = %subject.id, "directory create applied");
            }
        }
        Ok(())
    }
}
