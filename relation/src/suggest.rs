use serde::Serialize;
use tracing::{debug, warn};

use abi::errors::Result;
use abi::UserSummary;
use db::UserFilter;

use crate::RelationService;

/// cap on the degraded suggestion list
pub const FALLBACK_LIMIT: i64 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    pub users: Vec<UserSummary>,
    /// set when nobody unrelated was left and `users` is just "everyone but
    /// the actor"; it may then contain friends and pending contacts
    pub fallback: bool,
}

impl RelationService {
    /// users with no relation to `actor` in either direction
    pub async fn suggest(&self, actor_id: &str) -> Result<Suggestions> {
        let actor = self.actor(actor_id).await?;

        let mut excluded = vec![actor.id.clone()];
        excluded.extend(actor.friends.iter().cloned());
        excluded.extend(actor.incoming_requests.iter().cloned());
        let requested = self
            .repo
            .find_many(&UserFilter::RequestedBy(actor.id.clone()), None)
            .await?;
        excluded.extend(requested.into_iter().map(|u| u.id));
        excluded.sort();
        excluded.dedup();

        let users = self
            .repo
            .find_many(&UserFilter::IdNotIn(excluded), None)
            .await?;
        if !users.is_empty() {
            debug!("{} suggestions for {}", users.len(), actor.id);
            return Ok(Suggestions {
                users: users.into_iter().map(UserSummary::from).collect(),
                fallback: false,
            });
        }

        warn!(
            "no unrelated users left for {}, suggesting anyone (max {})",
            actor.id, FALLBACK_LIMIT
        );
        let users = self
            .repo
            .find_many(&UserFilter::IdNotIn(vec![actor.id]), Some(FALLBACK_LIMIT))
            .await?;
        Ok(Suggestions {
            users: users.into_iter().map(UserSummary::from).collect(),
            fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{seed, service};

    fn names(suggestions: &Suggestions) -> Vec<&str> {
        suggestions
            .users
            .iter()
            .map(|u| u.username.as_str())
            .collect()
    }

    #[tokio::test]
    async fn suggest_should_skip_related_users() {
        let service = service();
        let ids = seed(&service, &["alice", "bob", "carol", "dave", "erin"]).await;
        let (alice, bob, carol, dave) = (&ids[0], &ids[1], &ids[2], &ids[3]);

        // bob: friend, carol: sent to alice, dave: alice sent to dave
        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();
        service.send_request(carol, alice).await.unwrap();
        service.send_request(alice, dave).await.unwrap();

        let suggestions = service.suggest(alice).await.unwrap();
        assert!(!suggestions.fallback);
        assert_eq!(names(&suggestions), vec!["erin"]);
    }

    #[tokio::test]
    async fn suggest_should_fall_back_when_everyone_is_related() {
        let service = service();
        let ids = seed(&service, &["alice", "bob", "carol"]).await;
        let (alice, bob, carol) = (&ids[0], &ids[1], &ids[2]);
        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();
        service.send_request(alice, carol).await.unwrap();

        let suggestions = service.suggest(alice).await.unwrap();
        assert!(suggestions.fallback);
        // friends and pending contacts come back, never the actor
        assert_eq!(names(&suggestions), vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn fallback_should_be_capped() {
        let service = service();
        let mut usernames = vec!["alice".to_string()];
        usernames.extend((0..12).map(|i| format!("user{i:02}")));
        let usernames: Vec<&str> = usernames.iter().map(String::as_str).collect();
        let ids = seed(&service, &usernames).await;
        for id in &ids[1..] {
            service.send_request(&ids[0], id).await.unwrap();
        }

        let suggestions = service.suggest(&ids[0]).await.unwrap();
        assert!(suggestions.fallback);
        assert_eq!(suggestions.users.len(), FALLBACK_LIMIT as usize);
        assert!(suggestions.users.iter().all(|u| u.id != ids[0]));
    }

    #[tokio::test]
    async fn lone_user_should_get_empty_fallback() {
        let service = service();
        let ids = seed(&service, &["alice"]).await;
        let suggestions = service.suggest(&ids[0]).await.unwrap();
        assert!(suggestions.fallback);
        assert!(suggestions.users.is_empty());
    }
}
