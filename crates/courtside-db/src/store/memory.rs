//! In-memory store over `BTreeMap`s behind async locks. Backs the test
//! suites; listing order is deterministic (key order), where a production
//! store would order by query plan or sample randomly.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courtside_core::schedule::TimeSlot;
use courtside_core::types::{SessionId, TournamentId, UserId};
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::model::{CoachProfile, CoachProfilePatch, Session, Tournament, User};
use crate::store::{CoachStore, SessionStore, TournamentStore, UserStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<UserId, User>>,
    coaches: RwLock<BTreeMap<UserId, CoachProfile>>,
    sessions: RwLock<BTreeMap<SessionId, Session>>,
    tournaments: RwLock<BTreeMap<TournamentId, Tournament>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: &UserId) -> DbResult<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn save(&self, user: User) -> DbResult<()> {
        tracing::trace!(user = %user.id, "saving user document");
        self.users.write().await.insert(user.id.clone(), user);
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> DbResult<bool> {
        tracing::trace!(user = %id, "deleting user document");
        Ok(self.users.write().await.remove(id).is_some())
    }

    async fn coaches(&self) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| u.is_coach()).cloned().collect())
    }

    async fn search_by_name(
        &self,
        exclude: &UserId,
        letters: &str,
        limit: usize,
    ) -> DbResult<Vec<User>> {
        let needle = letters.to_lowercase();
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.id != *exclude)
            .filter(|u| {
                u.first_name.to_lowercase().contains(&needle)
                    || u.last_name.to_lowercase().contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn sample_excluding(&self, exclude: &[UserId], limit: usize) -> DbResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| !exclude.contains(&u.id))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CoachStore for MemoryStore {
    async fn get(&self, user_id: &UserId) -> DbResult<Option<CoachProfile>> {
        Ok(self.coaches.read().await.get(user_id).cloned())
    }

    async fn insert(&self, profile: CoachProfile) -> DbResult<()> {
        let mut coaches = self.coaches.write().await;
        if coaches.contains_key(&profile.user_id) {
            return Err(DbError::DuplicateKey(format!(
                "coach profile for {}",
                profile.user_id
            )));
        }
        tracing::trace!(user = %profile.user_id, "inserting coach profile");
        coaches.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn update(
        &self,
        user_id: &UserId,
        patch: CoachProfilePatch,
        now: DateTime<Utc>,
    ) -> DbResult<Option<CoachProfile>> {
        let mut coaches = self.coaches.write().await;
        let Some(profile) = coaches.get_mut(user_id) else {
            return Ok(None);
        };
        profile.apply(patch, now);
        Ok(Some(profile.clone()))
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: SessionId) -> DbResult<Option<Session>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn insert(&self, session: Session) -> DbResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(DbError::DuplicateKey(format!("session {}", session.id)));
        }
        tracing::trace!(session = %session.id, coach = %session.coach, "inserting session");
        sessions.insert(session.id, session);
        Ok(())
    }

    async fn save(&self, session: Session) -> DbResult<()> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.id) {
            return Err(DbError::NotFound(format!("session {}", session.id)));
        }
        sessions.insert(session.id, session);
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[SessionId]) -> DbResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| sessions.get(id).cloned())
            .collect())
    }

    async fn find_by_coach(&self, coach: &UserId) -> DbResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.coach == *coach)
            .cloned()
            .collect())
    }

    async fn find_by_student(&self, student: &UserId) -> DbResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.students.contains(student))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TournamentStore for MemoryStore {
    async fn get(&self, id: TournamentId) -> DbResult<Option<Tournament>> {
        Ok(self.tournaments.read().await.get(&id).cloned())
    }

    async fn insert(&self, tournament: Tournament) -> DbResult<()> {
        let mut tournaments = self.tournaments.write().await;
        if tournaments.contains_key(&tournament.id) {
            return Err(DbError::DuplicateKey(format!(
                "tournament {}",
                tournament.id
            )));
        }
        tracing::trace!(tournament = %tournament.id, owner = %tournament.owner, "inserting tournament");
        tournaments.insert(tournament.id, tournament);
        Ok(())
    }

    async fn save(&self, tournament: Tournament) -> DbResult<()> {
        let mut tournaments = self.tournaments.write().await;
        if !tournaments.contains_key(&tournament.id) {
            return Err(DbError::NotFound(format!("tournament {}", tournament.id)));
        }
        tournaments.insert(tournament.id, tournament);
        Ok(())
    }

    async fn delete(&self, id: TournamentId) -> DbResult<bool> {
        tracing::trace!(tournament = %id, "deleting tournament");
        Ok(self.tournaments.write().await.remove(&id).is_some())
    }

    async fn find_by_ids(&self, ids: &[TournamentId]) -> DbResult<Vec<Tournament>> {
        let tournaments = self.tournaments.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tournaments.get(id).cloned())
            .collect())
    }

    async fn involvement_overlaps(&self, user: &UserId, slot: TimeSlot) -> DbResult<bool> {
        let tournaments = self.tournaments.read().await;
        Ok(tournaments
            .values()
            .any(|t| t.involves(user) && t.slot.overlaps(slot)))
    }
}
