use axum::extract::State;
use axum::Json;

use abi::errors::Error;
use relation::FriendList;

use crate::api_utils::custom_extract::{AuthExtractor, JsonExtractor};
use crate::AppState;

use super::{FriendRequest, MessageOnly, MessageReply, RequestsReply, SuggestionsReply};

pub async fn send_friend_request(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
    JsonExtractor(req): JsonExtractor<FriendRequest>,
) -> Result<Json<MessageReply>, Error> {
    app_state
        .relation
        .send_request(&user_id, &req.friend_id)
        .await?;
    Ok(MessageReply::ok("Friend request sent"))
}

pub async fn cancel_friend_request(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
    JsonExtractor(req): JsonExtractor<FriendRequest>,
) -> Result<Json<MessageReply>, Error> {
    app_state
        .relation
        .cancel_request(&user_id, &req.friend_id)
        .await?;
    Ok(MessageReply::ok("Friend request cancelled"))
}

pub async fn accept_friend_request(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
    JsonExtractor(req): JsonExtractor<FriendRequest>,
) -> Result<Json<MessageReply>, MessageOnly> {
    app_state
        .relation
        .accept_request(&user_id, &req.friend_id)
        .await?;
    Ok(MessageReply::ok("Friend request accepted"))
}

pub async fn decline_friend_request(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
    JsonExtractor(req): JsonExtractor<FriendRequest>,
) -> Result<Json<MessageReply>, MessageOnly> {
    app_state
        .relation
        .decline_request(&user_id, &req.friend_id)
        .await?;
    Ok(MessageReply::ok("Friend request declined"))
}

pub async fn get_all_friends(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
) -> Result<Json<FriendList>, MessageOnly> {
    let list = app_state.relation.list_friends(&user_id).await?;
    Ok(Json(list))
}

pub async fn get_friend_requests(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
) -> Result<Json<RequestsReply>, Error> {
    let requests = app_state.relation.list_incoming_requests(&user_id).await?;
    Ok(Json(RequestsReply {
        success: true,
        requests,
    }))
}

pub async fn get_suggestions(
    State(app_state): State<AppState>,
    AuthExtractor(user_id): AuthExtractor,
) -> Result<Json<SuggestionsReply>, Error> {
    let suggestions = app_state.relation.suggest(&user_id).await?;
    Ok(Json(SuggestionsReply {
        success: true,
        suggestions: suggestions.users,
    }))
}
