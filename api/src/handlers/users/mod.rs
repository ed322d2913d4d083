use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use abi::errors::Error;
use abi::{UserProfile, UserSummary};

mod user_handlers;

pub use user_handlers::*;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: String, expires: i64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub,
            exp: now + expires,
            iat: now,
        }
    }
}

pub fn gen_token(app_state: &AppState, user_id: &str) -> Result<String, Error> {
    let claims = Claims::new(user_id.to_string(), app_state.token_expires);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app_state.jwt_secret.as_bytes()),
    )
    .map_err(Error::internal)?;
    Ok(token)
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct RegisterReply {
    success: bool,
    message: &'static str,
    user: UserProfile,
}

#[derive(Serialize)]
pub struct LoginReply {
    success: bool,
    message: &'static str,
    user: UserProfile,
    token: String,
}

#[derive(Serialize)]
pub struct SearchReply {
    success: bool,
    users: Vec<UserSummary>,
}
