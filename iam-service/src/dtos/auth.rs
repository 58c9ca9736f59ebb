use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    /// Defaults to the email when not supplied.
    pub username: Option<String>,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,

    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub email: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_rejects_mismatched_confirmation() {
        let req = SignupRequest {
            email: "a@x.com".to_string(),
            username: None,
            password: "password123".to_string(),
            confirm_password: "password124".to_string(),
            first_name: "A".to_string(),
            last_name: "X".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn signup_accepts_matching_passwords() {
        let req = SignupRequest {
            email: "a@x.com".to_string(),
            username: Some("alice".to_string()),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
            first_name: "A".to_string(),
            last_name: "X".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn login_rejects_bad_email() {
        let req = LoginRequest {
            email: "not-an-email".to_string(),
            password: "p".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
