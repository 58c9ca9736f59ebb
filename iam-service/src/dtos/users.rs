use serde::Deserialize;
use validator::Validate;

/// Partial update accepted by the user detail PATCH endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
