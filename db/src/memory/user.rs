use async_trait::async_trait;
use tokio::sync::RwLock;

use abi::errors::{Error, Result};
use abi::User;

use crate::user::{UserFilter, UserRepo};

/// process-local store; insertion order doubles as creation order
#[derive(Debug, Default)]
pub struct MemoryUser {
    users: RwLock<Vec<User>>,
}

impl MemoryUser {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_version(users: &[User], user: &User) -> Result<usize> {
    let index = users
        .iter()
        .position(|u| u.id == user.id)
        .ok_or_else(|| Error::not_found_with_details(format!("user {} not found", user.id)))?;
    if users[index].version != user.version {
        return Err(Error::conflict(format!(
            "user {} was modified concurrently",
            user.id
        )));
    }
    Ok(index)
}

fn bump(user: &User) -> User {
    let mut saved = user.clone();
    saved.version += 1;
    saved.update_time = chrono::Utc::now().timestamp_millis();
    saved
}

#[async_trait]
impl UserRepo for MemoryUser {
    async fn create_user(&self, user: User) -> Result<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::already_registered("User already registered."));
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(Error::already_registered("Username already taken."));
        }
        if users.iter().any(|u| u.id == user.id) {
            return Err(Error::internal_with_details(format!(
                "duplicate user id {}",
                user.id
            )));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn find_many(&self, filter: &UserFilter, limit: Option<i64>) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let limit = limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(users
            .iter()
            .filter(|u| filter.matches(u))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save(&self, user: &User) -> Result<User> {
        let mut users = self.users.write().await;
        let index = check_version(&users, user)?;
        let saved = bump(user);
        users[index] = saved.clone();
        Ok(saved)
    }

    async fn save_pair(&self, first: &User, second: &User) -> Result<(User, User)> {
        let mut users = self.users.write().await;
        // both checks happen before either write
        let first_index = check_version(&users, first)?;
        let second_index = check_version(&users, second)?;
        let (first, second) = (bump(first), bump(second));
        users[first_index] = first.clone();
        users[second_index] = second.clone();
        Ok((first, second))
    }
}
