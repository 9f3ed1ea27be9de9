//! Narrow contracts for the outbound collaborators: the mailer and the
//! identity directory. Message composition, transport, and webhook
//! signature verification all live behind these traits; services only
//! decide when to call them and with what payload.

use async_trait::async_trait;
use courtside_core::schedule::TimeSlot;
use courtside_core::types::{Role, UserId};
use courtside_db::model::{Achievement, CoachProfile, User};

/// What a coach needs to see about a proposed session.
#[derive(Debug, Clone)]
pub struct SessionInvite {
    pub session_name: String,
    pub slot: TimeSlot,
    pub organizer_name: String,
}

/// What an invited player needs to see about a tournament.
#[derive(Debug, Clone)]
pub struct TournamentInvite {
    pub tournament_name: String,
    pub sport: String,
    pub location: String,
    pub slot: TimeSlot,
}

/// Outbound notification port.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn welcome(&self, user: &User) -> anyhow::Result<()>;

    async fn friend_request_received(&self, receiver: &User, sender: &User) -> anyhow::Result<()>;

    async fn session_invite(&self, coach: &User, invite: &SessionInvite) -> anyhow::Result<()>;

    async fn tournament_invite(
        &self,
        member: &User,
        invite: &TournamentInvite,
    ) -> anyhow::Result<()>;
}

/// Identity-directory port: the external system that owns accounts and
/// their public metadata.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Whether the directory knows the subject at all.
    async fn subject_exists(&self, id: &UserId) -> anyhow::Result<bool>;

    /// Mirrors the platform role into the subject's public metadata.
    async fn set_role(&self, id: &UserId, role: Role) -> anyhow::Result<()>;

    /// Mirrors coach registration into the subject's public metadata.
    async fn set_coach_metadata(&self, id: &UserId, profile: &CoachProfile) -> anyhow::Result<()>;

    /// Mirrors profile fields into the subject's public metadata.
    async fn publish_profile(
        &self,
        id: &UserId,
        bio: &str,
        achievements: &[Achievement],
    ) -> anyhow::Result<()>;

    /// Records that the subject is not (yet) a coach. Used when a synced
    /// account arrives without the flag, so later events carry it.
    async fn mark_not_coach(&self, id: &UserId) -> anyhow::Result<()>;
}
