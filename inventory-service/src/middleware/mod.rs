mod auth;

pub use auth::{require_token, CurrentIdentity};
