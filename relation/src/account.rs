use tracing::debug;

use abi::errors::{Error, Result};
use abi::types::{Credentials, Registration, Validator};
use abi::User;
use db::UserFilter;

use crate::RelationService;

impl RelationService {
    pub async fn register(&self, registration: Registration) -> Result<User> {
        registration.validate()?;
        let Registration {
            username,
            email,
            password,
        } = registration;
        let (username, email) = (username.trim().to_string(), email.trim().to_string());

        if self
            .repo
            .find_one(&UserFilter::Email(email.clone()))
            .await?
            .is_some()
        {
            return Err(Error::already_registered("User already registered."));
        }
        if self
            .repo
            .find_one(&UserFilter::Username(username.clone()))
            .await?
            .is_some()
        {
            return Err(Error::already_registered("Username already taken."));
        }

        let hash = utils::hash_password(password.as_bytes())?;
        // a racing registration still trips the store's unique constraints
        let user = self
            .repo
            .create_user(User::new(nanoid::nanoid!(), username, email, hash))
            .await?;
        debug!("registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// check credentials; the caller issues the token
    pub async fn login(&self, credentials: Credentials) -> Result<User> {
        credentials.validate()?;
        let user = self
            .repo
            .find_one(&UserFilter::Email(credentials.email.trim().to_string()))
            .await?
            .ok_or_else(|| Error::account_or_pwd("User not registered."))?;

        if !utils::verify_password(credentials.password.as_bytes(), &user.password)? {
            return Err(Error::account_or_pwd("Incorrect password."));
        }
        debug!("user {} logged in", user.id);
        Ok(user)
    }
}
