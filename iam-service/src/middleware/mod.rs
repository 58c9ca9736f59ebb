mod auth;

pub use auth::{require_superuser, require_token, CurrentUser};
