use async_trait::async_trait;
use sqlx::PgPool;

use super::credential::database_error;
use super::credential::row_to_user;
use crate::domain::auth::errors::RepositoryError;
use crate::domain::auth::models::RefreshToken;
use crate::domain::auth::models::TokenHash;
use crate::domain::auth::models::User;
use crate::domain::auth::ports::RefreshTokenRepository;

pub struct PostgresRefreshTokenRepository {
    pool: PgPool,
}

impl PostgresRefreshTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_error(e: sqlx::Error, token_hash: &TokenHash) -> RepositoryError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return RepositoryError::AlreadyExists(token_hash.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound(format!("owner of refresh token {}", token_hash));
        }
    }
    database_error(e)
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(token.user_id.0)
        .bind(token.token_hash.0)
        .bind(token.expires_at)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &token.token_hash))?;

        Ok(())
    }

    async fn exists_by_hash(&self, token_hash: &TokenHash) -> Result<bool, RepositoryError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE token_hash = $1)
            "#,
        )
        .bind(token_hash.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)
    }

    async fn update_by_hash(
        &self,
        token_hash: &TokenHash,
        replacement: &RefreshToken,
    ) -> Result<(), RepositoryError> {
        // Single-row conditional update: a concurrent rotation of the same hash
        // finds no row and reports NotFound.
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET token_hash = $2, expires_at = $3, created_at = $4
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash.0)
        .bind(replacement.token_hash.0)
        .bind(replacement.expires_at)
        .bind(replacement.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &replacement.token_hash))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(token_hash.to_string()));
        }

        Ok(())
    }

    async fn find_user_by_token_hash(
        &self,
        token_hash: &TokenHash,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.password_hash
            FROM refresh_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(token_hash.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}
