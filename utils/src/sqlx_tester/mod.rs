use std::future::Future;
use std::{path::Path, thread};

use sqlx::PgPool;
use tokio::runtime::Runtime;

/// a throw-away database: created and migrated on `new`, dropped on `Drop`
pub struct TestDb {
    server_url: String,
    dbname: String,
}

/// tests already run inside a tokio runtime, so every blocking step gets its own thread
fn block_on_thread<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    thread::spawn(move || Runtime::new().unwrap().block_on(fut))
        .join()
        .unwrap();
}

impl TestDb {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
        migrations: impl Into<String>,
    ) -> TestDb {
        let (host, user, password) = (host.into(), user.into(), password.into());
        let server_url = if password.is_empty() {
            format!("postgres://{}@{}:{}", user, host, port)
        } else {
            format!("postgres://{}:{}@{}:{}", user, password, host, port)
        };
        Self::create(server_url, migrations.into())
    }

    fn create(server_url: String, migrations: String) -> TestDb {
        let tdb = TestDb {
            server_url,
            dbname: format!("test_{}", uuid::Uuid::new_v4()),
        };
        let server_url = tdb.server_url.clone();
        let dbname = tdb.dbname.clone();
        let url = tdb.url();
        block_on_thread(async move {
            let conn = PgPool::connect(&server_url).await.unwrap();
            sqlx::query(&format!(r#"CREATE DATABASE "{}""#, dbname))
                .execute(&conn)
                .await
                .unwrap();

            let conn = PgPool::connect(&url).await.unwrap();
            sqlx::migrate::Migrator::new(Path::new(&migrations))
                .await
                .unwrap()
                .run(&conn)
                .await
                .unwrap();
        });
        tdb
    }

    pub fn url(&self) -> String {
        format!("{}/{}", self.server_url, self.dbname)
    }

    pub async fn pool(&self) -> PgPool {
        PgPool::connect(&self.url()).await.unwrap()
    }

    pub fn dbname(&self) -> &str {
        &self.dbname
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let server_url = self.server_url.clone();
        let dbname = self.dbname.clone();
        block_on_thread(async move {
            let conn = PgPool::connect(&server_url).await.unwrap();
            // kick out pools the test left open
            let terminate = format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = '{dbname}' AND pid <> pg_backend_pid()"
            );
            sqlx::query(&terminate).execute(&conn).await.unwrap();
            sqlx::query(&format!(r#"DROP DATABASE "{dbname}""#))
                .execute(&conn)
                .await
                .unwrap();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::TestDb;

    #[tokio::test]
    #[ignore = "needs a local postgres"]
    async fn it_works() {
        let tdb = TestDb::new("localhost", 5432, "postgres", "postgres", "../db/migrations");
        assert!(tdb.dbname().starts_with("test_"));
        sqlx::query(
            "INSERT INTO users (id, username, email, password, create_time, update_time)
             VALUES ('1', 'alice', 'a@x.com', 'hash', 0, 0)",
        )
        .execute(&tdb.pool().await)
        .await
        .unwrap();
    }
}
