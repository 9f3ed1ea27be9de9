//! Friend graph operations: requests, acceptance, removal, and discovery.

use std::sync::Arc;

use courtside_core::types::UserId;
use courtside_db::model::{User, pull, push_unique};
use courtside_db::store::UserStore;
use serde::Serialize;

use crate::error::{ServiceError, ServiceResult};
use crate::ports::Notifier;

/// How many users a single suggestions call surfaces.
const SUGGESTION_LIMIT: usize = 6;

/// Result cap for name search.
const SEARCH_LIMIT: usize = 10;

/// A user's social surroundings as full documents.
#[derive(Debug, Clone, Serialize)]
pub struct Relationships {
    pub friend_requests: Vec<User>,
    pub sent_requests: Vec<User>,
    pub friends: Vec<User>,
}

pub struct FriendService {
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl FriendService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { users, notifier }
    }

    /// ## Summary
    /// Records a friend request from `from` to `to` on both documents and
    /// notifies the receiver.
    ///
    /// ## Errors
    /// `ValidationError` on self-requests, existing friendship, or a
    /// duplicate pending request in either direction; `NotFound` when
    /// either party is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn send_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        if from == to {
            return Err(ServiceError::ValidationError(
                "cannot send a friend request to yourself".to_owned(),
            ));
        }

        let mut sender = self.require(from).await?;
        let mut receiver = self.require(to).await?;

        if sender.is_friend_of(to) {
            return Err(ServiceError::ValidationError(
                "this user is already in your friends list".to_owned(),
            ));
        }
        if receiver.friend_requests.contains(from) {
            return Err(ServiceError::ValidationError(
                "friend request already sent".to_owned(),
            ));
        }
        if sender.sent_requests.contains(to) {
            return Err(ServiceError::ValidationError(
                "you already sent a friend request to this user".to_owned(),
            ));
        }

        self.notifier
            .friend_request_received(&receiver, &sender)
            .await?;

        receiver.friend_requests.push(from.clone());
        sender.sent_requests.push(to.clone());
        self.users.save(receiver).await?;
        self.users.save(sender).await?;

        Ok(())
    }

    /// Sender withdraws a pending request.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        self.remove_pending(from, to).await
    }

    /// Receiver declines a pending request. Same bookkeeping as a cancel,
    /// initiated from the other side.
    #[tracing::instrument(skip(self))]
    pub async fn decline_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        self.remove_pending(from, to).await
    }

    /// ## Summary
    /// Accepts a pending request: both parties become friends and the
    /// pending entries are cleared.
    ///
    /// ## Errors
    /// `ValidationError` when no pending request exists; `NotFound` when
    /// either party is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn accept_request(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        let mut sender = self.require(from).await?;
        let mut receiver = self.require(to).await?;

        if !receiver.friend_requests.contains(from) {
            return Err(ServiceError::ValidationError(
                "no friend request to accept".to_owned(),
            ));
        }

        push_unique(&mut receiver.friends, from.clone());
        push_unique(&mut sender.friends, to.clone());
        pull(&mut receiver.friend_requests, from);
        pull(&mut sender.sent_requests, to);

        self.users.save(receiver).await?;
        self.users.save(sender).await?;

        Ok(())
    }

    /// ## Summary
    /// Dissolves an existing friendship in both directions.
    ///
    /// ## Errors
    /// `ValidationError` when the two are not friends; `NotFound` when
    /// either party is unknown.
    #[tracing::instrument(skip(self))]
    pub async fn unfriend(&self, user_id: &UserId, target_id: &UserId) -> ServiceResult<()> {
        let mut user = self.require(user_id).await?;
        let mut target = self.require(target_id).await?;

        if !user.is_friend_of(target_id) {
            return Err(ServiceError::ValidationError(
                "users are not friends".to_owned(),
            ));
        }

        pull(&mut user.friends, target_id);
        pull(&mut target.friends, user_id);

        self.users.save(user).await?;
        self.users.save(target).await?;

        Ok(())
    }

    /// ## Summary
    /// Resolves the user's request/sent/friend id lists into full documents.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn relationships(&self, user_id: &UserId) -> ServiceResult<Relationships> {
        let user = self.require(user_id).await?;
        Ok(Relationships {
            friend_requests: self.users.get_many(&user.friend_requests).await?,
            sent_requests: self.users.get_many(&user.sent_requests).await?,
            friends: self.users.get_many(&user.friends).await?,
        })
    }

    /// ## Summary
    /// Users the requester might know: everyone except themselves, their
    /// friends, and anyone with a pending request in either direction,
    /// capped at the suggestion limit.
    ///
    /// ## Errors
    /// `NotFound` when the user is unknown.
    pub async fn suggestions(&self, user_id: &UserId) -> ServiceResult<Vec<User>> {
        let user = self.require(user_id).await?;

        let mut exclude = vec![user_id.clone()];
        exclude.extend(user.friends.iter().cloned());
        exclude.extend(user.friend_requests.iter().cloned());
        exclude.extend(user.sent_requests.iter().cloned());

        Ok(self
            .users
            .sample_excluding(&exclude, SUGGESTION_LIMIT)
            .await?)
    }

    /// Name search for the social UI, excluding the searcher.
    pub async fn search(&self, user_id: &UserId, letters: &str) -> ServiceResult<Vec<User>> {
        Ok(self
            .users
            .search_by_name(user_id, letters, SEARCH_LIMIT)
            .await?)
    }

    async fn remove_pending(&self, from: &UserId, to: &UserId) -> ServiceResult<()> {
        let mut sender = self.require(from).await?;
        let mut receiver = self.require(to).await?;

        pull(&mut sender.sent_requests, to);
        pull(&mut receiver.friend_requests, from);

        self.users.save(sender).await?;
        self.users.save(receiver).await?;

        Ok(())
    }

    async fn require(&self, id: &UserId) -> ServiceResult<User> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {id}")))
    }
}
