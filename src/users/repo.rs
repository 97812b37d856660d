use async_trait::async_trait;
use sqlx::{error::ErrorKind, PgPool};
use thiserror::Error;

use crate::users::{
    dto::{NewUser, User, UserUpdate},
    repo_types::{UnknownStatus, UserRow, UserStatus},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[source] sqlx::Error),
    #[error("invalid data: {0}")]
    InvalidData(#[source] sqlx::Error),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error(transparent)]
    Decode(#[from] UnknownStatus),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(
            e,
            sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
                | sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::WorkerCrashed
        ) {
            return Self::Unavailable(e);
        }

        let (constraint, bad_data) = match e.as_database_error() {
            Some(db) => (
                matches!(
                    db.kind(),
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                ),
                // SQLSTATE class 22: data exception
                db.code().is_some_and(|c| c.starts_with("22")),
            ),
            None => (false, false),
        };

        if constraint {
            Self::ConstraintViolation(e)
        } else if bad_data {
            Self::InvalidData(e)
        } else {
            Self::Query(e)
        }
    }
}

/// Access to the `use_users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a row and returns the id the store assigned.
    async fn insert(&self, user: &NewUser) -> Result<i64, StoreError>;
    async fn select_all(&self) -> Result<Vec<User>, StoreError>;
    /// Returns the affected count; 0 when no row has `id`.
    async fn update_by_id(&self, id: i64, user: &UserUpdate) -> Result<u64, StoreError>;
    /// Returns the affected count; 0 when no row has `id`.
    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError>;
    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &NewUser) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO use_users (use_name, use_email, use_birth, use_register, use_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING use_id
            "#,
        )
        .bind(&user.use_name)
        .bind(&user.use_email)
        .bind(user.use_birth)
        .bind(user.use_register)
        .bind(UserStatus::default().as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn select_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT use_id, use_name, use_email, use_birth, use_register, use_status
            FROM use_users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let users = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn update_by_id(&self, id: i64, user: &UserUpdate) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE use_users
            SET use_name = $1, use_email = $2, use_birth = $3, use_register = $4, use_status = $5
            WHERE use_id = $6
            "#,
        )
        .bind(&user.use_name)
        .bind(&user.use_email)
        .bind(user.use_birth)
        .bind(user.use_register)
        .bind(user.use_status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i64) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM use_users WHERE use_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{memory::FakeDbError, *};
    use crate::config::DatabaseConfig;

    #[test]
    fn connectivity_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn other_driver_errors_are_query_failures() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Query(_)));
        assert!(err.to_string().starts_with("query failed"));
    }

    #[test]
    fn database_errors_are_classified_by_sqlstate() {
        assert!(matches!(
            StoreError::from(FakeDbError::sqlx("23505")),
            StoreError::ConstraintViolation(_)
        ));
        assert!(matches!(
            StoreError::from(FakeDbError::sqlx("23514")),
            StoreError::ConstraintViolation(_)
        ));
        assert!(matches!(
            StoreError::from(FakeDbError::sqlx("22003")),
            StoreError::InvalidData(_)
        ));
        assert!(matches!(
            StoreError::from(FakeDbError::sqlx("42P01")),
            StoreError::Query(_)
        ));
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL pointing at a Postgres instance"]
    async fn pg_store_runs_every_statement() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let pool = crate::db::connect(&DatabaseConfig {
            url,
            max_connections: 2,
        })
        .await
        .expect("connect");
        crate::db::migrate(&pool).await;
        let store = PgUserStore::new(pool.clone());

        store.ping().await.expect("ping");

        let id = store
            .insert(&NewUser {
                use_name: "Ana".into(),
                use_email: "ana@x.com".into(),
                use_birth: date!(1990 - 01 - 01),
                use_register: date!(2024 - 01 - 01),
            })
            .await
            .expect("insert");

        let rows = store.select_all().await.expect("select");
        let row = rows.iter().find(|u| u.use_id == id).expect("inserted row");
        assert_eq!(row.use_name, "Ana");
        assert_eq!(row.use_status, UserStatus::Pending);

        let update = UserUpdate {
            use_name: "Ana Maria".into(),
            use_email: "ana@x.com".into(),
            use_birth: date!(1990 - 01 - 01),
            use_register: date!(2024 - 01 - 01),
            use_status: UserStatus::Active,
        };
        assert_eq!(store.update_by_id(id, &update).await.expect("update"), 1);
        assert_eq!(store.update_by_id(i64::MAX, &update).await.expect("update"), 0);

        let rows = store.select_all().await.expect("select");
        let row = rows.iter().find(|u| u.use_id == id).expect("updated row");
        assert_eq!(row.use_status, UserStatus::Active);
        assert_eq!(row.use_name, "Ana Maria");

        assert_eq!(store.delete_by_id(id).await.expect("delete"), 1);
        assert_eq!(store.delete_by_id(id).await.expect("delete"), 0);
        let rows = store.select_all().await.expect("select");
        assert!(rows.iter().all(|u| u.use_id != id));

        pool.close().await;
    }
}
