//! Tournament management: creation and edits with conflict checking,
//! owner-only deletion, listings, and friend-availability probes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use courtside_core::schedule::{self, TimeSlot};
use courtside_core::types::{TournamentId, UserId};
use courtside_db::model::{Tournament, User, pull, push_unique};
use courtside_db::store::{TournamentStore, UserStore};
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::{Notifier, TournamentInvite};

#[derive(Debug, Clone)]
pub struct TournamentDetails {
    pub name: String,
    pub max_players: u32,
    pub location: String,
    pub slot: TimeSlot,
    pub sport: String,
    pub members: Vec<UserId>,
}

/// A user's tournaments, split by how they are involved.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentLists {
    pub created: Vec<Tournament>,
    pub invited: Vec<Tournament>,
}

pub struct TournamentService {
    users: Arc<dyn UserStore>,
    tournaments: Arc<dyn TournamentStore>,
    notifier: Arc<dyn Notifier>,
}

impl TournamentService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        tournaments: Arc<dyn TournamentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            tournaments,
            notifier,
        }
    }

    /// ## Summary
    /// Creates a tournament for `owner`, refusing when the proposed slot
    /// overlaps any tournament the owner created or was invited to. On
    /// success the tournament is linked onto the owner's and members'
    /// documents and every member is sent an invitation.
    ///
    /// ## Errors
    /// `NotFound` for an unknown owner, `Conflict` on a slot overlap.
    #[tracing::instrument(skip(self, details), fields(owner = %owner, name = %details.name))]
    pub async fn create(
        &self,
        owner: &UserId,
        details: TournamentDetails,
        now: DateTime<Utc>,
    ) -> ServiceResult<Tournament> {
        let owner_doc = self.require_user(owner).await?;

        self.check_slot(&owner_doc, details.slot, None).await?;

        let tournament = Tournament {
            id: TournamentId::new(),
            owner: owner.clone(),
            name: details.name,
            max_players: details.max_players,
            location: details.location,
            slot: details.slot,
            sport: details.sport,
            members: details.members,
            created_at: now,
            updated_at: now,
        };
        self.tournaments.insert(tournament.clone()).await?;

        let mut owner_doc = owner_doc;
        push_unique(&mut owner_doc.created_tournaments, tournament.id);
        self.users.save(owner_doc).await?;

        self.link_and_invite_members(&tournament).await?;

        tracing::info!(tournament = %tournament.id, "tournament created");
        Ok(tournament)
    }

    /// ## Summary
    /// Replaces a tournament's details, running the same overlap check as
    /// [`create`](Self::create) but excluding the edited tournament itself
    /// from the candidate set (it always overlaps its own old slot).
    ///
    /// ## Errors
    /// `NotFound` for an unknown editor or tournament, `Conflict` on a
    /// slot overlap with any *other* tournament of the editor.
    #[tracing::instrument(skip(self, details), fields(tournament = %id, editor = %editor))]
    pub async fn edit(
        &self,
        id: TournamentId,
        editor: &UserId,
        details: TournamentDetails,
        now: DateTime<Utc>,
    ) -> ServiceResult<Tournament> {
        let editor_doc = self.require_user(editor).await?;

        self.check_slot(&editor_doc, details.slot, Some(id)).await?;

        let mut tournament = self
            .tournaments
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("tournament {id}")))?;

        tournament.name = details.name;
        tournament.max_players = details.max_players;
        tournament.location = details.location;
        tournament.slot = details.slot;
        tournament.sport = details.sport;
        tournament.members = details.members;
        tournament.updated_at = now;
        self.tournaments.save(tournament.clone()).await?;

        self.link_and_invite_members(&tournament).await?;

        Ok(tournament)
    }

    /// ## Summary
    /// Deletes a tournament and unlinks it from the creator's and members'
    /// documents.
    ///
    /// ## Errors
    /// `NotFound` for an unknown tournament, `Forbidden` when `requester`
    /// is not the creator.
    #[tracing::instrument(skip(self), fields(tournament = %id, requester = %requester))]
    pub async fn delete(&self, id: TournamentId, requester: &UserId) -> ServiceResult<()> {
        let tournament = self
            .tournaments
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("tournament {id}")))?;

        if tournament.owner != *requester {
            return Err(ServiceError::Forbidden(
                "only the tournament creator can delete it".to_owned(),
            ));
        }

        self.tournaments.delete(id).await?;

        if let Some(mut owner) = self.users.get(requester).await? {
            pull(&mut owner.created_tournaments, &id);
            self.users.save(owner).await?;
        }
        for member_id in &tournament.members {
            if let Some(mut member) = self.users.get(member_id).await? {
                pull(&mut member.invited_tournaments, &id);
                self.users.save(member).await?;
            }
        }

        tracing::info!(tournament = %id, "tournament deleted");
        Ok(())
    }

    /// ## Summary
    /// A user's created and invited tournaments as full documents.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn list(&self, user_id: &UserId) -> ServiceResult<TournamentLists> {
        let user = self.require_user(user_id).await?;
        let created = self
            .tournaments
            .find_by_ids(&user.created_tournaments)
            .await?;
        let invited = self
            .tournaments
            .find_by_ids(&user.invited_tournaments)
            .await?;
        Ok(TournamentLists { created, invited })
    }

    /// ## Summary
    /// Friends of `user_id` with no tournament involvement overlapping
    /// `slot`, in store order.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn available_friends(
        &self,
        user_id: &UserId,
        slot: TimeSlot,
    ) -> ServiceResult<Vec<User>> {
        self.free_friends(user_id, slot, false).await
    }

    /// Same probe as [`available_friends`](Self::available_friends), but
    /// restricted to friends who are not coaches (coaches are booked
    /// through sessions, not invited as players).
    pub async fn available_friends_for_session(
        &self,
        user_id: &UserId,
        slot: TimeSlot,
    ) -> ServiceResult<Vec<User>> {
        self.free_friends(user_id, slot, true).await
    }

    async fn free_friends(
        &self,
        user_id: &UserId,
        slot: TimeSlot,
        skip_coaches: bool,
    ) -> ServiceResult<Vec<User>> {
        let user = self.require_user(user_id).await?;
        let friends = self.users.get_many(&user.friends).await?;

        let mut available = Vec::new();
        for friend in friends {
            if skip_coaches && friend.is_coach() {
                continue;
            }
            if !self.tournaments.involvement_overlaps(&friend.id, slot).await? {
                available.push(friend);
            }
        }
        Ok(available)
    }

    /// Overlap check against every tournament the user created or was
    /// invited to, optionally excluding one id (the record being edited).
    async fn check_slot(
        &self,
        user: &User,
        slot: TimeSlot,
        exclude: Option<TournamentId>,
    ) -> ServiceResult<()> {
        let mut candidate_ids = user.created_tournaments.clone();
        candidate_ids.extend(user.invited_tournaments.iter().copied());

        let candidates = self.tournaments.find_by_ids(&candidate_ids).await?;
        let others: Vec<Tournament> = candidates
            .into_iter()
            .filter(|t| exclude != Some(t.id))
            .collect();

        if schedule::conflicts(slot, &others) {
            return Err(ServiceError::Conflict(
                "you have a conflicting tournament in this time range".to_owned(),
            ));
        }
        Ok(())
    }

    async fn link_and_invite_members(&self, tournament: &Tournament) -> ServiceResult<()> {
        for member_id in &tournament.members {
            if let Some(mut member) = self.users.get(member_id).await? {
                push_unique(&mut member.invited_tournaments, tournament.id);
                self.users.save(member.clone()).await?;

                self.notifier
                    .tournament_invite(
                        &member,
                        &TournamentInvite {
                            tournament_name: tournament.name.clone(),
                            sport: tournament.sport.clone(),
                            location: tournament.location.clone(),
                            slot: tournament.slot,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }

    async fn require_user(&self, id: &UserId) -> ServiceResult<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))
    }
}
