//! PostgreSQL storage for identities and tokens.

use async_trait::async_trait;
use service_core::error::AppError;
use service_core::resource::{Page, ResourceStore};
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::dtos::users::UserUpdateRequest;
use crate::models::{AuthToken, User, UserResponse};
use crate::utils::{hash_password, Password};

/// True when the error is a uniqueness-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Find user by ID.
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Find user by email, case-insensitively.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new user. Uniqueness violations surface as database errors;
    /// the signup handler collapses every failure to one generic response.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, first_name, last_name, is_superuser, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_superuser)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// List users, newest first.
    pub async fn list_users(&self, page: Page) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.size() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Apply a partial update and return the updated row.
    pub async fn update_user(
        &self,
        user_id: Uuid,
        patch: &UserUpdateRequest,
        password_hash: Option<String>,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                password_hash = COALESCE($4, password_hash),
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(patch.email.as_deref())
        .bind(patch.username.as_deref())
        .bind(password_hash.as_deref())
        .bind(patch.first_name.as_deref())
        .bind(patch.last_name.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::BadRequest(anyhow::anyhow!("email or username already in use"))
            } else {
                AppError::from(e)
            }
        })
    }

    /// Delete one user. Returns whether a row was removed.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected() == 1)
    }

    /// Delete a batch of users in one statement, returning the deleted count.
    pub async fn delete_users(&self, ids: &[Uuid]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    // ==================== Token Operations ====================

    /// Insert a freshly issued token. Returns the raw error so the issuer can
    /// retry on the (vanishingly unlikely) key collision.
    pub async fn insert_token(&self, token: &AuthToken) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO auth_tokens (key, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&token.key)
        .bind(token.user_id)
        .bind(token.created_at)
        .bind(token.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Look up a token by its value.
    pub async fn find_token(&self, key: &str) -> Result<Option<AuthToken>, AppError> {
        sqlx::query_as::<_, AuthToken>("SELECT * FROM auth_tokens WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}

fn parse_user_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid user id")))
}

#[async_trait]
impl ResourceStore for Database {
    type Entity = UserResponse;
    type Patch = UserUpdateRequest;

    fn resource_name(&self) -> &'static str {
        "user"
    }

    fn collection_name(&self) -> &'static str {
        "users"
    }

    async fn list(&self, page: Page) -> Result<Vec<UserResponse>, AppError> {
        let users = self.list_users(page).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<UserResponse>, AppError> {
        let user_id = parse_user_id(id)?;
        Ok(self
            .find_user_by_id(user_id)
            .await?
            .map(UserResponse::from))
    }

    async fn update(
        &self,
        id: &str,
        patch: UserUpdateRequest,
    ) -> Result<Option<UserResponse>, AppError> {
        let user_id = parse_user_id(id)?;

        let password_hash = match &patch.password {
            Some(password) => Some(
                hash_password(&Password::new(password.clone()))
                    .map_err(AppError::InternalError)?
                    .into_string(),
            ),
            None => None,
        };

        Ok(self
            .update_user(user_id, &patch, password_hash)
            .await?
            .map(UserResponse::from))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let user_id = parse_user_id(id)?;
        self.delete_user(user_id).await
    }

    async fn bulk_delete(&self, ids: &[String]) -> Result<u64, AppError> {
        // Any unparseable id fails the batch before a single row is touched.
        let ids = ids
            .iter()
            .map(|id| parse_user_id(id))
            .collect::<Result<Vec<_>, _>>()?;
        self.delete_users(&ids).await
    }
}
