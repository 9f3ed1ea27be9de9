//! Store contracts: exactly the query shapes the services need.
//!
//! Implementations are collaborators behind these traits. Callers compose
//! reads and writes with no transaction between them; in particular the
//! conflict-check-then-create flow can race with a concurrent booking (both
//! check against a stale read, both insert). Closing that window needs an
//! optimistic or transactional store and is out of scope here; the booking
//! tests document it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courtside_core::schedule::TimeSlot;
use courtside_core::types::{SessionId, TournamentId, UserId};

use crate::error::DbResult;
use crate::model::{CoachProfile, CoachProfilePatch, Session, Tournament, User};

pub mod memory;


#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &UserId) -> DbResult<Option<User>>;

    /// Documents for `ids`, in the requested order; unknown ids are skipped.
    async fn get_many(&self, ids: &[UserId]) -> DbResult<Vec<User>>;

    /// Full-document write; inserts or replaces.
    async fn save(&self, user: User) -> DbResult<()>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: &UserId) -> DbResult<bool>;

    /// All users currently offering coaching.
    async fn coaches(&self) -> DbResult<Vec<User>>;

    /// Case-insensitive substring match on first or last name, excluding
    /// the searcher, at most `limit` results.
    async fn search_by_name(
        &self,
        exclude: &UserId,
        letters: &str,
        limit: usize,
    ) -> DbResult<Vec<User>>;

    /// Up to `limit` users whose id is not in `exclude`. Selection order is
    /// implementation defined (production stores sample randomly).
    async fn sample_excluding(&self, exclude: &[UserId], limit: usize) -> DbResult<Vec<User>>;
}

#[async_trait]
pub trait CoachStore: Send + Sync {
    async fn get(&self, user_id: &UserId) -> DbResult<Option<CoachProfile>>;

    /// Fails with `DuplicateKey` when a profile already exists for the user.
    async fn insert(&self, profile: CoachProfile) -> DbResult<()>;

    /// Applies a field patch; returns the updated profile, or `None` when
    /// no profile exists.
    async fn update(
        &self,
        user_id: &UserId,
        patch: CoachProfilePatch,
        now: DateTime<Utc>,
    ) -> DbResult<Option<CoachProfile>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: SessionId) -> DbResult<Option<Session>>;

    async fn insert(&self, session: Session) -> DbResult<()>;

    /// Full-document write of an existing session.
    async fn save(&self, session: Session) -> DbResult<()>;

    /// Documents for `ids`, in the requested order; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[SessionId]) -> DbResult<Vec<Session>>;

    async fn find_by_coach(&self, coach: &UserId) -> DbResult<Vec<Session>>;

    async fn find_by_student(&self, student: &UserId) -> DbResult<Vec<Session>>;
}

#[async_trait]
pub trait TournamentStore: Send + Sync {
    async fn get(&self, id: TournamentId) -> DbResult<Option<Tournament>>;

    async fn insert(&self, tournament: Tournament) -> DbResult<()>;

    /// Full-document write of an existing tournament.
    async fn save(&self, tournament: Tournament) -> DbResult<()>;

    /// Returns whether a document was removed.
    async fn delete(&self, id: TournamentId) -> DbResult<bool>;

    /// Documents for `ids`, in the requested order; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[TournamentId]) -> DbResult<Vec<Tournament>>;

    /// Whether any tournament owned by or including `user` overlaps `slot`
    /// (half-open semantics).
    async fn involvement_overlaps(&self, user: &UserId, slot: TimeSlot) -> DbResult<bool>;
}
