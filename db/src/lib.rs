pub mod memory;
pub mod postgres;
mod user;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use abi::config::{Config, StoreKind};
use abi::errors::Result;

pub use crate::user::{UserFilter, UserRepo};

/// build the user store selected by `db.kind`
pub async fn user_repo(config: &Config) -> Result<Arc<dyn UserRepo>> {
    match config.db.kind {
        StoreKind::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db.max_connections)
                .connect(&config.db.url())
                .await?;
            if config.db.migrate {
                info!("running migrations...");
                sqlx::migrate!("./migrations").run(&pool).await?;
            }
            info!(
                "connected to postgres {}:{}/{}",
                config.db.host, config.db.port, config.db.database
            );
            Ok(Arc::new(postgres::PostgresUser::new(pool)))
        }
        StoreKind::Memory => {
            info!("using in-memory user store");
            Ok(Arc::new(memory::MemoryUser::new()))
        }
    }
}
