mod authenticator;
mod database;
mod tokens;

pub use authenticator::Authenticator;
pub use database::Database;
pub use tokens::TokenIssuer;
