use serde::{Deserialize, Serialize};

/// persisted user record with its relationship lists
#[derive(Clone, Serialize, Default, Deserialize, Debug, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    /// symmetric: if b is in a.friends then a is in b.friends
    pub friends: Vec<String>,
    /// ids of users who asked this user for friendship
    pub incoming_requests: Vec<String>,
    #[serde(skip)]
    pub version: i64,
    pub create_time: i64,
    pub update_time: i64,
}

/// the only projection of a user that leaves the server
#[derive(Clone, Serialize, Default, Deserialize, Debug, PartialEq, Eq)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
}

/// shape returned by register and login
#[derive(Clone, Serialize, Default, Deserialize, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            password: password.into(),
            create_time: now,
            update_time: now,
            ..Default::default()
        }
    }

    pub fn has_friend(&self, id: &str) -> bool {
        self.friends.iter().any(|f| f == id)
    }

    pub fn has_request_from(&self, id: &str) -> bool {
        self.incoming_requests.iter().any(|r| r == id)
    }

    /// record a pending request from `id`; false if it was already there
    pub fn push_request_from(&mut self, id: &str) -> bool {
        if id == self.id || self.has_request_from(id) {
            return false;
        }
        self.incoming_requests.push(id.to_string());
        true
    }

    /// drop the pending request from `id`; false if there was none
    pub fn remove_request_from(&mut self, id: &str) -> bool {
        let before = self.incoming_requests.len();
        self.incoming_requests.retain(|r| r != id);
        before != self.incoming_requests.len()
    }

    /// one side of a friendship. The pending request from the same user is
    /// cleared so an id never sits in both lists.
    pub fn add_friend(&mut self, id: &str) -> bool {
        self.remove_request_from(id);
        if id == self.id || self.has_friend(id) {
            return false;
        }
        self.friends.push(id.to_string());
        true
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_request_should_reject_self_and_duplicates() {
        let mut bob = User::new("bob", "bob", "b@x.com", "hash");
        assert!(!bob.push_request_from("bob"));
        assert!(bob.push_request_from("alice"));
        assert!(!bob.push_request_from("alice"));
        assert_eq!(bob.incoming_requests, vec!["alice".to_string()]);
    }

    #[test]
    fn add_friend_should_clear_pending_request() {
        let mut bob = User::new("bob", "bob", "b@x.com", "hash");
        bob.push_request_from("alice");
        assert!(bob.add_friend("alice"));
        assert!(!bob.add_friend("alice"));
        assert!(bob.has_friend("alice"));
        assert!(!bob.has_request_from("alice"));
        assert_eq!(bob.friends.len(), 1);
    }

    #[test]
    fn serialized_user_should_hide_password() {
        let user = User::new("id1", "alice", "a@x.com", "secret-hash");
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        let summary = serde_json::to_value(UserSummary::from(user)).unwrap();
        assert_eq!(summary["_id"], "id1");
        assert_eq!(summary.as_object().unwrap().len(), 3);
    }
}
