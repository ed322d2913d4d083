//! Friend-request state machine, friend suggestions and account operations
//! over a [`UserRepo`].
//!
//! Every operation takes the acting user's id as already authenticated by the
//! caller. The actor is re-read from the store; a token that outlived its
//! user is rejected as unauthorized.

mod account;
mod friendship;
mod search;
mod suggest;

use std::sync::Arc;

use abi::errors::{Error, Result};
use abi::{User, UserSummary};
use db::{UserFilter, UserRepo};

pub use friendship::FriendList;
pub use suggest::{Suggestions, FALLBACK_LIMIT};

#[derive(Debug, Clone)]
pub struct RelationService {
    repo: Arc<dyn UserRepo>,
}

impl RelationService {
    pub fn new(repo: Arc<dyn UserRepo>) -> Self {
        Self { repo }
    }

    async fn actor(&self, id: &str) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::unauthorized_with_details("User not found, authorization failed"))
    }

    async fn target(&self, id: &str) -> Result<User> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(Error::not_found)
    }

    /// resolve ids to summaries, skipping ids whose user is gone
    async fn summaries(&self, ids: &[String]) -> Result<Vec<UserSummary>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = self
            .repo
            .find_many(&UserFilter::IdIn(ids.to_vec()), None)
            .await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}

fn required_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::bad_request("friendId is required"));
    }
    Ok(id)
}
