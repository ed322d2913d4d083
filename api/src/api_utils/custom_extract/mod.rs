pub mod auth;
pub mod json_extractor;
pub mod query_extractor;

pub use auth::*;
pub use json_extractor::*;
pub use query_extractor::*;
