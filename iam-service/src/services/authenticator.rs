use axum::http::HeaderMap;
use service_core::error::AppError;
use service_core::middleware::auth::extract_token;

use crate::models::{AuthToken, User};
use crate::services::Database;

/// Resolves a request's bearer credential to an identity.
///
/// Every check re-reads the token store; nothing is cached across requests.
/// A missing header, an unknown token and a dangling owner all produce the
/// same unauthorized response so callers cannot distinguish them.
#[derive(Clone)]
pub struct Authenticator {
    db: Database,
}

impl Authenticator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Resolve the `Authorization: Token <value>` header to a user.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<(User, AuthToken), AppError> {
        let key = extract_token(headers).ok_or_else(AppError::invalid_token)?;

        let token = self
            .db
            .find_token(key)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        let user = self
            .db
            .find_user_by_id(token.user_id)
            .await?
            .ok_or_else(AppError::invalid_token)?;

        Ok((user, token))
    }

    /// As [`authenticate`](Self::authenticate), additionally requiring the
    /// superuser flag.
    pub async fn authenticate_superuser(
        &self,
        headers: &HeaderMap,
    ) -> Result<(User, AuthToken), AppError> {
        let (user, token) = self.authenticate(headers).await?;
        if !user.is_superuser {
            return Err(AppError::superuser_required());
        }
        Ok((user, token))
    }
}
