use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use abi::errors::Error;
use abi::UserSummary;

mod friend_handlers;

pub use friend_handlers::*;

#[derive(Debug, Deserialize, Default)]
pub struct FriendRequest {
    #[serde(rename = "friendId", default)]
    pub friend_id: String,
}

#[derive(Serialize)]
pub struct MessageReply {
    success: bool,
    message: &'static str,
}

impl MessageReply {
    fn ok(message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

#[derive(Serialize)]
pub struct RequestsReply {
    success: bool,
    requests: Vec<UserSummary>,
}

#[derive(Serialize)]
pub struct SuggestionsReply {
    success: bool,
    suggestions: Vec<UserSummary>,
}

/// failure body without the `success` flag, used by accept, decline and the friend list
#[derive(Debug)]
pub struct MessageOnly(pub Error);

impl From<Error> for MessageOnly {
    fn from(value: Error) -> Self {
        Self(value)
    }
}

impl IntoResponse for MessageOnly {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        if kind.is_internal() {
            error!("http request failed: {:?}", self.0);
        }
        let status: StatusCode = kind.status_code();
        (status, Json(json!({ "message": self.0.message() }))).into_response()
    }
}
