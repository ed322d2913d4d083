use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::json;
use std::error::Error as StdError;
use std::fmt;
use tracing::error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// message returned to the caller whenever the failure is on our side
pub const INTERNAL_MESSAGE: &str = "Server error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    // validation family
    BadRequest,
    BodyParsing,
    InvalidQuery,

    // relationship and account state
    NotFound,
    DuplicateRequest,
    AlreadyFriends,
    AlreadyRegistered,
    AccountOrPassword,
    UnAuthorized,
    Conflict,

    // internal family
    DbError,
    InternalServer,
    IOError,
    ParseError,
    ConfigReadError,
    ConfigParseError,
}

impl ErrorKind {
    /// internal kinds never expose their details to the caller
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ErrorKind::DbError
                | ErrorKind::InternalServer
                | ErrorKind::IOError
                | ErrorKind::ParseError
                | ErrorKind::ConfigReadError
                | ErrorKind::ConfigParseError
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::BodyParsing => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidQuery => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::DuplicateRequest => StatusCode::BAD_REQUEST,
            ErrorKind::AlreadyFriends => StatusCode::BAD_REQUEST,
            ErrorKind::AlreadyRegistered => StatusCode::BAD_REQUEST,
            ErrorKind::AccountOrPassword => StatusCode::BAD_REQUEST,
            ErrorKind::UnAuthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::DbError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::IOError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ParseError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ConfigReadError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::ConfigParseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::BadRequest | ErrorKind::BodyParsing => "Invalid request",
            ErrorKind::InvalidQuery => "Query is required",
            ErrorKind::NotFound => "User not found",
            ErrorKind::DuplicateRequest => "Request already sent",
            ErrorKind::AlreadyFriends => "Already friends",
            ErrorKind::AlreadyRegistered => "User already registered.",
            ErrorKind::AccountOrPassword => "Incorrect email or password.",
            ErrorKind::UnAuthorized => "Not authorized",
            ErrorKind::Conflict => "The record was modified concurrently, please retry",
            _ => INTERNAL_MESSAGE,
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    details: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    #[inline]
    pub fn new(
        kind: ErrorKind,
        details: impl Into<String>,
        source: impl StdError + 'static + Send + Sync,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn with_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            source: None,
            details: None,
        }
    }

    #[inline]
    pub fn with_details(kind: ErrorKind, details: impl Into<String>) -> Self {
        Self {
            kind,
            source: None,
            details: Some(details.into()),
        }
    }

    #[inline]
    pub fn internal(error: impl StdError + 'static + Send + Sync) -> Self {
        Self {
            kind: ErrorKind::InternalServer,
            details: Some(error.to_string()),
            source: Some(Box::new(error)),
        }
    }

    #[inline]
    pub fn internal_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::InternalServer, details)
    }

    #[inline]
    pub fn unauthorized(
        error: impl StdError + 'static + Send + Sync,
        details: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::UnAuthorized, details, error)
    }

    #[inline]
    pub fn unauthorized_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::UnAuthorized, details)
    }

    #[inline]
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BadRequest, details)
    }

    #[inline]
    pub fn body_parsing(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::BodyParsing, details)
    }

    #[inline]
    pub fn invalid_query() -> Self {
        Self::with_kind(ErrorKind::InvalidQuery)
    }

    #[inline]
    pub fn not_found() -> Self {
        Self::with_kind(ErrorKind::NotFound)
    }

    #[inline]
    pub fn not_found_with_details(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::NotFound, details)
    }

    #[inline]
    pub fn duplicate_request() -> Self {
        Self::with_kind(ErrorKind::DuplicateRequest)
    }

    #[inline]
    pub fn already_friends() -> Self {
        Self::with_kind(ErrorKind::AlreadyFriends)
    }

    #[inline]
    pub fn already_registered(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::AlreadyRegistered, details)
    }

    #[inline]
    pub fn account_or_pwd(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::AccountOrPassword, details)
    }

    #[inline]
    pub fn conflict(details: impl Into<String>) -> Self {
        Self::with_details(ErrorKind::Conflict, details)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// the text that is safe to hand to the caller
    pub fn message(&self) -> String {
        if self.kind.is_internal() {
            return INTERNAL_MESSAGE.to_string();
        }
        self.details
            .clone()
            .unwrap_or_else(|| self.kind.default_message().to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{:?}: {}", self.kind, details),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.kind.status_code();
        if self.kind.is_internal() {
            error!("http request failed: {:?}", self);
        }
        let body = json!({ "success": false, "message": self.message() });
        (status_code, Json(body)).into_response()
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::new(ErrorKind::IOError, value.to_string(), value)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(value: serde_yaml::Error) -> Self {
        Self::new(ErrorKind::ConfigParseError, value.to_string(), value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorKind::ParseError, value.to_string(), value)
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::new(ErrorKind::DbError, value.to_string(), value)
    }
}

impl From<sqlx::migrate::MigrateError> for Error {
    fn from(value: sqlx::migrate::MigrateError) -> Self {
        Self::new(ErrorKind::DbError, value.to_string(), value)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::new(
            ErrorKind::UnAuthorized,
            "Not authorized, token failed",
            value,
        )
    }
}
