use service_core::error::AppError;

use crate::models::{AuthToken, User};
use crate::services::database::is_unique_violation;
use crate::services::Database;

/// Issues and persists fresh authentication tokens.
///
/// Each successful login mints a new token; previously issued tokens for the
/// same identity stay valid until their rows are deleted out of band.
#[derive(Clone)]
pub struct TokenIssuer {
    db: Database,
}

impl TokenIssuer {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Mint, persist and return a new token for the given user.
    ///
    /// 256 bits of entropy make key collisions unreachable in practice; the
    /// retry loop turns the theoretical case into a fresh draw instead of a
    /// failed login.
    pub async fn issue(&self, user: &User) -> Result<AuthToken, AppError> {
        for _ in 0..3 {
            let token = AuthToken::issue(user.id);
            match self.db.insert_token(&token).await {
                Ok(()) => {
                    tracing::debug!(user_id = %user.id, "auth token issued");
                    return Ok(token);
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(user_id = %user.id, "token key collision, retrying");
                    continue;
                }
                Err(e) => return Err(AppError::from(e)),
            }
        }

        Err(AppError::InternalError(anyhow::anyhow!(
            "token key collision persisted across retries"
        )))
    }
}
