use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Opaque bearer credential persisted server-side.
///
/// The key doubles as the primary key; presence of the row is the only
/// validity criterion. No expiry is recorded.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthToken {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthToken {
    /// Mint a fresh token for a user. 32 bytes of OS entropy, hex-encoded.
    pub fn issue(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            key: Self::generate_key(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn generate_key() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_long_enough() {
        let key = AuthToken::generate_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn each_issue_mints_a_distinct_key() {
        let user_id = Uuid::new_v4();
        let a = AuthToken::issue(user_id);
        let b = AuthToken::issue(user_id);
        assert_ne!(a.key, b.key);
        assert_eq!(a.user_id, b.user_id);
    }

    #[test]
    fn serialized_token_exposes_key_and_owner() {
        let token = AuthToken::issue(Uuid::new_v4());
        let body = serde_json::to_value(&token).unwrap();
        assert_eq!(body["key"], token.key);
        assert!(body.get("user_id").is_some());
    }
}
