pub mod config;
pub mod errors;
pub mod model;
pub mod types;

pub use model::user::{User, UserProfile, UserSummary};
