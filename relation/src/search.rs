use abi::errors::{Error, Result};
use abi::UserSummary;
use db::UserFilter;

use crate::RelationService;

impl RelationService {
    /// case-insensitive substring match on username or email
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_query());
        }
        let users = self
            .repo
            .find_many(&UserFilter::Keyword(query.to_string()), None)
            .await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}
