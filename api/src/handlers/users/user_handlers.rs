use axum::extract::State;
use axum::Json;
use tracing::debug;

use abi::errors::Error;
use abi::types::{Credentials, Registration};

use crate::api_utils::custom_extract::{AuthExtractor, JsonExtractor, QueryExtractor};
use crate::AppState;

use super::{gen_token, LoginReply, RegisterReply, SearchQuery, SearchReply};

pub async fn register(
    State(app_state): State<AppState>,
    JsonExtractor(registration): JsonExtractor<Registration>,
) -> Result<Json<RegisterReply>, Error> {
    let user = app_state.relation.register(registration).await?;
    Ok(Json(RegisterReply {
        success: true,
        message: "Registration successful",
        user: user.profile(),
    }))
}

pub async fn login(
    State(app_state): State<AppState>,
    JsonExtractor(credentials): JsonExtractor<Credentials>,
) -> Result<Json<LoginReply>, Error> {
    let user = app_state.relation.login(credentials).await?;
    let token = gen_token(&app_state, &user.id)?;
    debug!("token issued for {}", user.id);
    Ok(Json(LoginReply {
        success: true,
        message: "Login successful",
        user: user.profile(),
        token,
    }))
}

pub async fn search_users(
    State(app_state): State<AppState>,
    AuthExtractor(_): AuthExtractor,
    QueryExtractor(SearchQuery { query }): QueryExtractor<SearchQuery>,
) -> Result<Json<SearchReply>, Error> {
    let users = app_state.relation.search_users(&query).await?;
    Ok(Json(SearchReply {
        success: true,
        users,
    }))
}
