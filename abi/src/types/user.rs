use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::errors::Error;
use crate::model::user::User;
use crate::types::Validator;

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &'_ PgRow) -> Result<Self, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            friends: row.try_get("friends")?,
            incoming_requests: row.try_get("incoming_requests")?,
            version: row.try_get("version")?,
            create_time: row.try_get("create_time")?,
            update_time: row.try_get("update_time")?,
        })
    }
}

/// register request body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Registration {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// login request body
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Validator for Registration {
    fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            return Err(Error::bad_request("All fields are required."));
        }
        Ok(())
    }
}

impl Validator for Credentials {
    fn validate(&self) -> Result<(), Error> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::bad_request("Email and password are required."));
        }
        Ok(())
    }
}
