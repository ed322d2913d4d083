use serde::Serialize;
use tracing::debug;

use abi::errors::{Error, Result};
use abi::UserSummary;

use crate::{required_id, RelationService};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FriendList {
    pub friends: Vec<UserSummary>,
    #[serde(rename = "totalFriends")]
    pub total: usize,
}

impl RelationService {
    /// queue `actor` in `target`'s incoming requests
    pub async fn send_request(&self, actor_id: &str, target_id: &str) -> Result<()> {
        let target_id = required_id(target_id)?;
        if actor_id == target_id {
            return Err(Error::bad_request(
                "You cannot send a friend request to yourself",
            ));
        }
        let actor = self.actor(actor_id).await?;
        let mut target = self.target(target_id).await?;

        if target.has_request_from(&actor.id) {
            return Err(Error::duplicate_request());
        }
        if actor.has_friend(&target.id) || target.has_friend(&actor.id) {
            return Err(Error::already_friends());
        }

        target.push_request_from(&actor.id);
        self.repo.save(&target).await?;
        debug!("friend request {} -> {}", actor.id, target.id);
        Ok(())
    }

    /// withdraw a request `actor` sent; succeeds when there is nothing to
    /// withdraw, including when `target` no longer exists
    pub async fn cancel_request(&self, actor_id: &str, target_id: &str) -> Result<()> {
        let target_id = required_id(target_id)?;
        let actor = self.actor(actor_id).await?;
        let Some(mut target) = self.repo.find_by_id(target_id).await? else {
            debug!("no user {} to cancel a request to", target_id);
            return Ok(());
        };

        if !target.remove_request_from(&actor.id) {
            debug!("no request {} -> {} to cancel", actor.id, target.id);
            return Ok(());
        }
        self.repo.save(&target).await?;
        debug!("friend request {} -> {} cancelled", actor.id, target.id);
        Ok(())
    }

    /// befriend `actor` and `target`, clearing the request between them;
    /// both records are written together
    pub async fn accept_request(&self, actor_id: &str, target_id: &str) -> Result<()> {
        let target_id = required_id(target_id)?;
        if actor_id == target_id {
            return Err(Error::bad_request(
                "You cannot accept a friend request from yourself",
            ));
        }
        let mut actor = self.actor(actor_id).await?;
        let mut target = self.target(target_id).await?;

        // also clears a crossed request actor -> target
        actor.add_friend(&target.id);
        target.add_friend(&actor.id);
        target.remove_request_from(&actor.id);

        self.repo.save_pair(&actor, &target).await?;
        debug!("{} accepted friend request from {}", actor.id, target.id);
        Ok(())
    }

    /// drop `target`'s request to `actor`; friends are never touched
    pub async fn decline_request(&self, actor_id: &str, target_id: &str) -> Result<()> {
        let target_id = required_id(target_id)?;
        let mut actor = self.actor(actor_id).await?;

        if actor.remove_request_from(target_id) {
            self.repo.save(&actor).await?;
            debug!("{} declined friend request from {}", actor.id, target_id);
        }
        Ok(())
    }

    pub async fn list_friends(&self, actor_id: &str) -> Result<FriendList> {
        let actor = self.actor(actor_id).await?;
        let friends = self.summaries(&actor.friends).await?;
        Ok(FriendList {
            total: friends.len(),
            friends,
        })
    }

    pub async fn list_incoming_requests(&self, actor_id: &str) -> Result<Vec<UserSummary>> {
        let actor = self.actor(actor_id).await?;
        self.summaries(&actor.incoming_requests).await
    }
}

#[cfg(test)]
mod tests {
    use abi::errors::ErrorKind;

    use crate::test_utils::{load, seed, service};

    #[tokio::test]
    async fn alice_and_bob_should_become_friends() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);

        service.send_request(alice, bob).await.unwrap();
        let requests = service.list_incoming_requests(bob).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].username, "alice");

        service.accept_request(bob, alice).await.unwrap();
        let bob_user = load(&service, bob).await;
        let alice_user = load(&service, alice).await;
        assert!(bob_user.has_friend(alice));
        assert!(alice_user.has_friend(bob));
        assert!(bob_user.incoming_requests.is_empty());

        let list = service.list_friends(alice).await.unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.friends[0].username, "bob");
        assert_eq!(list.friends[0].email, "bob@x.com");
    }

    #[tokio::test]
    async fn duplicate_request_should_fail_until_cancelled() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);

        service.send_request(alice, bob).await.unwrap();
        let err = service.send_request(alice, bob).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateRequest);
        assert_eq!(load(&service, bob).await.incoming_requests.len(), 1);

        service.cancel_request(alice, bob).await.unwrap();
        assert!(load(&service, bob).await.incoming_requests.is_empty());
        service.send_request(alice, bob).await.unwrap();
    }

    #[tokio::test]
    async fn cancel_without_request_should_be_noop() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let before = load(&service, &ids[1]).await;
        service.cancel_request(&ids[0], &ids[1]).await.unwrap();
        // nothing was written
        assert_eq!(load(&service, &ids[1]).await.version, before.version);
    }

    #[tokio::test]
    async fn send_request_should_validate_target() {
        let service = service();
        let ids = seed(&service, &["alice"]).await;
        let alice = &ids[0];

        let err = service.send_request(alice, "").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let err = service.send_request(alice, alice).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        let err = service.send_request(alice, "ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn cancel_to_missing_user_should_be_noop() {
        let service = service();
        let ids = seed(&service, &["alice"]).await;
        service.cancel_request(&ids[0], "ghost").await.unwrap();
        let err = service.cancel_request(&ids[0], " ").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn request_to_friend_should_fail() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);
        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();

        let err = service.send_request(bob, alice).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyFriends);
        let err = service.send_request(alice, bob).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyFriends);
    }

    #[tokio::test]
    async fn accept_without_request_should_befriend_both() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);

        service.accept_request(bob, alice).await.unwrap();
        assert_eq!(load(&service, bob).await.friends, vec![alice.clone()]);
        assert_eq!(load(&service, alice).await.friends, vec![bob.clone()]);
    }

    #[tokio::test]
    async fn accept_from_missing_user_should_fail() {
        let service = service();
        let ids = seed(&service, &["bob"]).await;

        let err = service.accept_request(&ids[0], "ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(load(&service, &ids[0]).await.friends.is_empty());
    }

    #[tokio::test]
    async fn accept_twice_should_not_duplicate_friends() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);
        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();

        assert_eq!(load(&service, bob).await.friends.len(), 1);
        assert_eq!(load(&service, alice).await.friends.len(), 1);
    }

    #[tokio::test]
    async fn accept_should_clear_crossed_requests() {
        let service = service();
        let ids = seed(&service, &["alice", "bob"]).await;
        let (alice, bob) = (&ids[0], &ids[1]);
        service.send_request(alice, bob).await.unwrap();
        service.send_request(bob, alice).await.unwrap();

        service.accept_request(bob, alice).await.unwrap();
        let alice_user = load(&service, alice).await;
        let bob_user = load(&service, bob).await;
        assert!(alice_user.incoming_requests.is_empty());
        assert!(bob_user.incoming_requests.is_empty());
        assert!(alice_user.has_friend(bob) && bob_user.has_friend(alice));
    }

    #[tokio::test]
    async fn decline_should_never_touch_friends() {
        let service = service();
        let ids = seed(&service, &["alice", "bob", "carol"]).await;
        let (alice, bob, carol) = (&ids[0], &ids[1], &ids[2]);
        service.send_request(alice, bob).await.unwrap();
        service.accept_request(bob, alice).await.unwrap();
        service.send_request(carol, bob).await.unwrap();

        let friends_before = load(&service, bob).await.friends;
        service.decline_request(bob, carol).await.unwrap();
        // declining a friend who has no pending request is a no-op too
        service.decline_request(bob, alice).await.unwrap();

        let bob_user = load(&service, bob).await;
        assert_eq!(bob_user.friends, friends_before);
        assert!(bob_user.incoming_requests.is_empty());
        assert!(load(&service, carol).await.friends.is_empty());
    }

    #[tokio::test]
    async fn decline_should_clear_request_of_missing_user() {
        let service = service();
        let ids = seed(&service, &["bob"]).await;
        let mut bob = load(&service, &ids[0]).await;
        bob.push_request_from("deleted-user");
        service.repo.save(&bob).await.unwrap();

        service.decline_request(&ids[0], "deleted-user").await.unwrap();
        assert!(load(&service, &ids[0]).await.incoming_requests.is_empty());
    }

    #[tokio::test]
    async fn unknown_actor_should_be_unauthorized() {
        let service = service();
        let ids = seed(&service, &["bob"]).await;
        let err = service.send_request("ghost", &ids[0]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnAuthorized);
        let err = service.list_friends("ghost").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnAuthorized);
    }
}
