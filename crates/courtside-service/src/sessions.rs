//! Session booking, resolution, and schedule views.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use courtside_core::schedule::{
    self, Buckets, DashboardCounts, ResolutionState, Schedulable, TimeSlot,
};
use courtside_core::types::{SessionId, UserId};
use courtside_db::model::{Session, User, push_unique};
use courtside_db::store::{SessionStore, UserStore};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{Notifier, SessionInvite};

/// A session joined with its coach's user document for display.
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithCoach {
    pub session: Session,
    /// `None` when the coach's document has since disappeared.
    pub coach: Option<User>,
}

impl Schedulable for SessionWithCoach {
    fn slot(&self) -> TimeSlot {
        self.session.slot
    }

    fn resolution(&self) -> Option<ResolutionState> {
        Some(self.session.resolution)
    }
}

/// Schedule view for a student: sessions they attend, bucketed, plus the
/// ones they organized themselves.
#[derive(Debug, Clone, Serialize)]
pub struct UserSessions {
    pub buckets: Buckets<SessionWithCoach>,
    pub created: Vec<SessionWithCoach>,
}

#[derive(Debug, Clone)]
pub struct BookSessionRequest {
    pub creator: UserId,
    pub coach: UserId,
    pub invited: Vec<UserId>,
    pub name: String,
    pub slot: TimeSlot,
}

pub struct SessionService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            sessions,
            notifier,
        }
    }

    /// ## Summary
    /// Books a session with a coach, refusing the booking when the coach's
    /// calendar already holds an overlapping session.
    ///
    /// The conflict check runs against the coach's invited sessions as read
    /// here; check and insert are two separate store calls, so two
    /// concurrent bookings can both pass against a stale read. See the
    /// store contract notes and the booking tests.
    ///
    /// ## Errors
    /// `NotFound` when the coach is unknown, `Conflict` when the slot
    /// overlaps an existing session of the coach.
    #[tracing::instrument(skip(self, request), fields(creator = %request.creator, coach = %request.coach))]
    pub async fn book(
        &self,
        request: BookSessionRequest,
        now: DateTime<Utc>,
    ) -> ServiceResult<Session> {
        let mut students = vec![request.creator.clone()];
        for id in &request.invited {
            push_unique(&mut students, id.clone());
        }

        let coach = self
            .users
            .get(&request.coach)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("coach {}", request.coach)))?;

        let invited_sessions = self
            .sessions
            .find_by_ids(&coach.invited_sessions_as_coach)
            .await?;
        let booked: Vec<Session> = invited_sessions
            .into_iter()
            .filter(|s| s.coach == request.coach)
            .collect();

        if let Some(conflicting) = schedule::first_conflict(request.slot, &booked) {
            tracing::debug!(conflicting = %conflicting.id, "booking refused, coach already engaged");
            return Err(ServiceError::Conflict(format!(
                "Coach {} is already registered to another appointment in this time range",
                coach.full_name(),
            )));
        }

        let session = Session {
            id: SessionId::new(),
            name: request.name,
            coach: request.coach.clone(),
            students: students.clone(),
            slot: request.slot,
            total_participants: u32::try_from(students.len()).unwrap_or(u32::MAX),
            resolution: ResolutionState::Pending,
            created_at: now,
            updated_at: now,
        };
        self.sessions.insert(session.clone()).await?;

        // Link the new session onto every involved document.
        for student_id in &request.invited {
            if let Some(mut student) = self.users.get(student_id).await? {
                push_unique(&mut student.invited_sessions, session.id);
                self.users.save(student).await?;
            }
        }

        let organizer = self.users.get(&request.creator).await?;
        let organizer_name = match organizer {
            Some(mut creator) => {
                push_unique(&mut creator.created_sessions, session.id);
                let name = creator.full_name();
                self.users.save(creator).await?;
                name
            }
            None => "Someone".to_owned(),
        };

        let mut coach = coach;
        push_unique(&mut coach.invited_sessions_as_coach, session.id);
        self.users.save(coach.clone()).await?;

        self.notifier
            .session_invite(
                &coach,
                &SessionInvite {
                    session_name: session.name.clone(),
                    slot: session.slot,
                    organizer_name,
                },
            )
            .await?;

        tracing::info!(session = %session.id, "session booked");
        Ok(session)
    }

    /// ## Summary
    /// Resolves a pending session as accepted and counts the coach in as a
    /// participant.
    ///
    /// ## Errors
    /// `NotFound` for an unknown session; `ValidationError` when the
    /// session was already resolved either way (the transition is one-way).
    #[tracing::instrument(skip(self))]
    pub async fn approve(&self, id: SessionId, now: DateTime<Utc>) -> ServiceResult<Session> {
        let mut session = self.require(id).await?;
        match session.resolution {
            ResolutionState::Accepted => Err(ServiceError::ValidationError(format!(
                "session \"{}\" has already been approved",
                session.name
            ))),
            ResolutionState::Rejected => Err(ServiceError::ValidationError(format!(
                "session \"{}\" has already been rejected",
                session.name
            ))),
            ResolutionState::Pending => {
                session.resolution = ResolutionState::Accepted;
                session.total_participants += 1;
                session.updated_at = now;
                self.sessions.save(session.clone()).await?;
                Ok(session)
            }
        }
    }

    /// ## Summary
    /// Resolves a pending session as rejected.
    ///
    /// ## Errors
    /// `NotFound` for an unknown session; `ValidationError` when the
    /// session was already resolved either way.
    #[tracing::instrument(skip(self))]
    pub async fn reject(&self, id: SessionId, now: DateTime<Utc>) -> ServiceResult<Session> {
        let mut session = self.require(id).await?;
        match session.resolution {
            ResolutionState::Accepted => Err(ServiceError::ValidationError(format!(
                "session \"{}\" has already been approved",
                session.name
            ))),
            ResolutionState::Rejected => Err(ServiceError::ValidationError(format!(
                "session \"{}\" has already been rejected",
                session.name
            ))),
            ResolutionState::Pending => {
                session.resolution = ResolutionState::Rejected;
                session.updated_at = now;
                self.sessions.save(session.clone()).await?;
                Ok(session)
            }
        }
    }

    /// All of a coach's sessions, bucketed relative to `now`.
    pub async fn coach_sessions(
        &self,
        coach: &UserId,
        now: DateTime<Utc>,
    ) -> ServiceResult<Buckets<Session>> {
        let sessions = self.sessions.find_by_coach(coach).await?;
        Ok(schedule::bucketize(now, sessions))
    }

    /// ## Summary
    /// Schedule view for a student: sessions they attend (minus the ones
    /// they organized, which are listed separately), each joined with the
    /// coach's document, bucketed relative to `now`.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn user_sessions(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> ServiceResult<UserSessions> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))?;

        let attending = self.sessions.find_by_student(user_id).await?;
        let mut joined = Vec::new();
        for session in attending {
            if user.created_sessions.contains(&session.id) {
                continue;
            }
            let coach = self.users.get(&session.coach).await?;
            joined.push(SessionWithCoach { session, coach });
        }
        let buckets = schedule::bucketize(now, joined);

        let mut created = Vec::new();
        for session in self.sessions.find_by_ids(&user.created_sessions).await? {
            let coach = self.users.get(&session.coach).await?;
            created.push(SessionWithCoach { session, coach });
        }

        Ok(UserSessions { buckets, created })
    }

    /// Dashboard counts for a coach, including the this-week figure.
    pub async fn coach_dashboard(
        &self,
        coach: &UserId,
        now: DateTime<Utc>,
    ) -> ServiceResult<DashboardCounts> {
        let sessions = self.sessions.find_by_coach(coach).await?;
        Ok(schedule::dashboard_counts(now, &sessions))
    }

    async fn require(&self, id: SessionId) -> ServiceResult<Session> {
        self.sessions
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("session {id}")))
    }
}
