use std::fmt::Debug;

use async_trait::async_trait;

use abi::errors::Result;
use abi::User;

/// predicates understood by every store backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Email(String),
    Username(String),
    /// case-insensitive substring of username or email
    Keyword(String),
    /// users holding a pending request from this id
    RequestedBy(String),
    IdIn(Vec<String>),
    IdNotIn(Vec<String>),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Email(email) => user.email == *email,
            UserFilter::Username(username) => user.username == *username,
            UserFilter::Keyword(keyword) => {
                let keyword = keyword.to_lowercase();
                user.username.to_lowercase().contains(&keyword)
                    || user.email.to_lowercase().contains(&keyword)
            }
            UserFilter::RequestedBy(id) => user.has_request_from(id),
            UserFilter::IdIn(ids) => ids.contains(&user.id),
            UserFilter::IdNotIn(ids) => !ids.contains(&user.id),
        }
    }
}

#[async_trait]
pub trait UserRepo: Sync + Send + Debug {
    /// insert a new user; a taken username or email is `AlreadyRegistered`
    async fn create_user(&self, user: User) -> Result<User>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>>;

    /// ordered by creation time
    async fn find_many(&self, filter: &UserFilter, limit: Option<i64>) -> Result<Vec<User>>;

    /// write back a loaded user. Fails with `Conflict` if the stored version
    /// moved since it was read; returns the record with its new version.
    async fn save(&self, user: &User) -> Result<User>;

    /// save both users or neither
    async fn save_pair(&self, first: &User, second: &User) -> Result<(User, User)>;
}
