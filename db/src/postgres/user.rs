use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use abi::errors::{Error, Result};
use abi::User;

use crate::user::{UserFilter, UserRepo};

#[derive(Debug)]
pub struct PostgresUser {
    pool: PgPool,
}

impl PostgresUser {
    pub fn new(pool: PgPool) -> Self {
        PostgresUser { pool }
    }
}

/// `%` and `_` in user input are matched literally
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    match filter {
        UserFilter::Email(email) => {
            builder.push("email = ").push_bind(email.clone());
        }
        UserFilter::Username(username) => {
            builder.push("username = ").push_bind(username.clone());
        }
        UserFilter::Keyword(keyword) => {
            let pattern = like_pattern(keyword);
            builder
                .push("(username ILIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR email ILIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }
        UserFilter::RequestedBy(id) => {
            builder
                .push("incoming_requests @> ARRAY[")
                .push_bind(id.clone())
                .push("]::TEXT[]");
        }
        UserFilter::IdIn(ids) => {
            builder.push("id = ANY(").push_bind(ids.clone()).push(")");
        }
        UserFilter::IdNotIn(ids) => {
            builder.push("NOT (id = ANY(").push_bind(ids.clone()).push("))");
        }
    }
}

fn select(filter: &UserFilter, limit: Option<i64>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT * FROM users WHERE ");
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY create_time, id");
    if let Some(limit) = limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
    builder
}

/// conditional on the version the caller read; None when it moved
async fn update<'e, E>(executor: E, user: &User) -> Result<Option<User>>
where
    E: PgExecutor<'e>,
{
    let user = sqlx::query_as(
        "UPDATE users SET
        username = $2,
        email = $3,
        password = $4,
        friends = $5,
        incoming_requests = $6,
        version = version + 1,
        update_time = $7
        WHERE id = $1 AND version = $8
        RETURNING *",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.friends)
    .bind(&user.incoming_requests)
    .bind(chrono::Utc::now().timestamp_millis())
    .bind(user.version)
    .fetch_optional(executor)
    .await?;
    Ok(user)
}

fn stale(user: &User) -> Error {
    Error::conflict(format!("user {} was modified concurrently", user.id))
}

#[async_trait]
impl UserRepo for PostgresUser {
    async fn create_user(&self, user: User) -> Result<User> {
        let result = sqlx::query_as(
            "INSERT INTO users
            (id, username, email, password, friends, incoming_requests, version, create_time, update_time)
            VALUES
            ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.friends)
        .bind(&user.incoming_requests)
        .bind(user.version)
        .bind(user.create_time)
        .bind(user.update_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("users_username_key") => {
                        Error::already_registered("Username already taken.")
                    }
                    _ => Error::already_registered("User already registered."),
                }
            }
            _ => Error::from(err),
        })?;
        Ok(result)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>> {
        let user = select(filter, Some(1))
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, filter: &UserFilter, limit: Option<i64>) -> Result<Vec<User>> {
        let users = select(filter, limit)
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn save(&self, user: &User) -> Result<User> {
        update(&self.pool, user)
            .await?
            .ok_or_else(|| stale(user))
    }

    async fn save_pair(&self, first: &User, second: &User) -> Result<(User, User)> {
        let mut tx = self.pool.begin().await?;
        // an early return drops the transaction, which rolls it back
        let first = update(&mut *tx, first).await?.ok_or_else(|| stale(first))?;
        let second = update(&mut *tx, second)
            .await?
            .ok_or_else(|| stale(second))?;
        tx.commit().await?;
        debug!("saved pair {} / {}", first.id, second.id);
        Ok((first, second))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abi::errors::ErrorKind;
    use utils::sqlx_tester::TestDb;

    fn test_db() -> TestDb {
        TestDb::new("localhost", 5432, "postgres", "postgres", "./migrations")
    }

    #[test]
    fn like_pattern_should_escape_wildcards() {
        assert_eq!(like_pattern("a_b%c"), "%a\\_b\\%c%");
        assert_eq!(like_pattern("alice"), "%alice%");
    }

    #[tokio::test]
    #[ignore = "needs a local postgres"]
    async fn create_and_find_should_work() {
        let tdb = test_db();
        let repo = PostgresUser::new(tdb.pool().await);
        repo.create_user(User::new(nanoid::nanoid!(), "alice", "a@x.com", "hash"))
            .await
            .unwrap();
        let err = repo
            .create_user(User::new(nanoid::nanoid!(), "alice2", "a@x.com", "hash"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyRegistered);

        let found = repo
            .find_many(&UserFilter::Keyword("A@X".to_string()), None)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "alice");
    }

    #[tokio::test]
    #[ignore = "needs a local postgres"]
    async fn stale_save_pair_should_roll_back() {
        let tdb = test_db();
        let repo = PostgresUser::new(tdb.pool().await);
        let alice = repo
            .create_user(User::new("a", "alice", "a@x.com", "hash"))
            .await
            .unwrap();
        let bob = repo
            .create_user(User::new("b", "bob", "b@x.com", "hash"))
            .await
            .unwrap();
        repo.save(&bob).await.unwrap();

        let (mut alice, mut bob) = (alice, bob);
        alice.add_friend("b");
        bob.add_friend("a");
        let err = repo.save_pair(&alice, &bob).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let alice = repo.find_by_id("a").await.unwrap().unwrap();
        assert!(alice.friends.is_empty());

        let requested = repo
            .find_many(&UserFilter::RequestedBy("a".to_string()), None)
            .await
            .unwrap();
        assert!(requested.is_empty());
    }
}
