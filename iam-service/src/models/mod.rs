mod auth_token;
mod user;

pub use auth_token::AuthToken;
pub use user::{User, UserResponse};
