//! Shared fixtures and port doubles for the service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courtside_core::schedule::{ResolutionState, TimeSlot};
use courtside_core::types::{Role, SessionId, UserId};
use courtside_db::model::{Achievement, CoachProfile, Session, User};
use courtside_db::store::UserStore;
use courtside_db::store::memory::MemoryStore;

use crate::ports::{DirectoryClient, Notifier, SessionInvite, TournamentInvite};

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn slot(start: i64, end: i64) -> TimeSlot {
    TimeSlot::new(at(start), at(end))
}

pub fn user(id: &str, first: &str, last: &str) -> User {
    User::new(UserId::from(id), format!("{id}@example.com"), first, last)
}

pub fn session(coach: &str, start: i64, end: i64, resolution: ResolutionState) -> Session {
    Session {
        id: SessionId::new(),
        name: "practice".to_owned(),
        coach: UserId::from(coach),
        students: Vec::new(),
        slot: slot(start, end),
        total_participants: 0,
        resolution,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub async fn seed_users(store: &MemoryStore, users: Vec<User>) {
    for doc in users {
        UserStore::save(store, doc).await.unwrap();
    }
}

/// Notifier double that records every call.
#[derive(Default)]
pub struct RecordingNotifier {
    pub welcomes: Mutex<Vec<UserId>>,
    /// (receiver, sender)
    pub friend_requests: Mutex<Vec<(UserId, UserId)>>,
    /// (coach, organizer name)
    pub session_invites: Mutex<Vec<(UserId, String)>>,
    /// (member, tournament name)
    pub tournament_invites: Mutex<Vec<(UserId, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn welcome(&self, user: &User) -> anyhow::Result<()> {
        self.welcomes.lock().unwrap().push(user.id.clone());
        Ok(())
    }

    async fn friend_request_received(&self, receiver: &User, sender: &User) -> anyhow::Result<()> {
        self.friend_requests
            .lock()
            .unwrap()
            .push((receiver.id.clone(), sender.id.clone()));
        Ok(())
    }

    async fn session_invite(&self, coach: &User, invite: &SessionInvite) -> anyhow::Result<()> {
        self.session_invites
            .lock()
            .unwrap()
            .push((coach.id.clone(), invite.organizer_name.clone()));
        Ok(())
    }

    async fn tournament_invite(
        &self,
        member: &User,
        invite: &TournamentInvite,
    ) -> anyhow::Result<()> {
        self.tournament_invites
            .lock()
            .unwrap()
            .push((member.id.clone(), invite.tournament_name.clone()));
        Ok(())
    }
}

/// Directory double: a fixed subject set plus recorded metadata writes.
#[derive(Default)]
pub struct FakeDirectory {
    pub subjects: Mutex<Vec<UserId>>,
    pub roles: Mutex<Vec<(UserId, Role)>>,
    pub coach_metadata: Mutex<Vec<UserId>>,
    pub published_profiles: Mutex<Vec<UserId>>,
    pub not_coach_marks: Mutex<Vec<UserId>>,
}

impl FakeDirectory {
    pub fn with_subjects(ids: &[&str]) -> Self {
        let directory = Self::default();
        *directory.subjects.lock().unwrap() = ids.iter().map(|id| UserId::from(*id)).collect();
        directory
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn subject_exists(&self, id: &UserId) -> anyhow::Result<bool> {
        Ok(self.subjects.lock().unwrap().contains(id))
    }

    async fn set_role(&self, id: &UserId, role: Role) -> anyhow::Result<()> {
        self.roles.lock().unwrap().push((id.clone(), role));
        Ok(())
    }

    async fn set_coach_metadata(&self, id: &UserId, _profile: &CoachProfile) -> anyhow::Result<()> {
        self.coach_metadata.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn publish_profile(
        &self,
        id: &UserId,
        _bio: &str,
        _achievements: &[Achievement],
    ) -> anyhow::Result<()> {
        self.published_profiles.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn mark_not_coach(&self, id: &UserId) -> anyhow::Result<()> {
        self.not_coach_marks.lock().unwrap().push(id.clone());
        Ok(())
    }
}
