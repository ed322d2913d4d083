use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::friends::{
    accept_friend_request, cancel_friend_request, decline_friend_request, get_all_friends,
    get_friend_requests, get_suggestions, send_friend_request,
};
use crate::handlers::users::{login, register, search_users};
use crate::AppState;

pub(crate) fn app_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api/users", user_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/search", get(search_users))
        .route("/send-friend-request", post(send_friend_request))
        .route("/cancel-friend-request", post(cancel_friend_request))
        .route("/accept-friend-request", post(accept_friend_request))
        .route("/decline-friend-request", post(decline_friend_request))
        .route("/all-friends", get(get_all_friends))
        .route("/friend-requests", get(get_friend_requests))
        .route("/suggestions", get(get_suggestions))
        .with_state(state)
}
