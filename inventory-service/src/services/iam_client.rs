use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::config::IamServiceConfig;

/// Identity resolved by the IAM service. The id arrives as a string by
/// contract so this service never has to parse a storage-layer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
}

#[derive(Debug, Deserialize)]
struct AuthenticateResponse {
    user: AuthenticatedIdentity,
}

/// HTTP client for the IAM service's token-validation contract.
#[derive(Clone)]
pub struct IamClient {
    client: Client,
    base_url: String,
}

impl IamClient {
    pub fn new(settings: &IamServiceConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: settings.url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate a token by forwarding the inbound Authorization header.
    ///
    /// An unauthorized verdict from IAM maps to the same generic 401 as a
    /// locally missing token; transport failures surface as upstream errors.
    pub async fn authenticate(
        &self,
        authorization: &str,
    ) -> Result<AuthenticatedIdentity, AppError> {
        let url = format!("{}/api/v1/iam/authenticate", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send authenticate request to {}: {}", url, e);
                AppError::UpstreamError(anyhow::anyhow!("IAM request failed: {}", e))
            })?;

        let status = response.status();
        if status.is_success() {
            let body: AuthenticateResponse = response.json().await.map_err(|e| {
                tracing::error!("Malformed authenticate response from IAM: {}", e);
                AppError::UpstreamError(anyhow::anyhow!("malformed IAM response: {}", e))
            })?;
            Ok(body.user)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(AppError::invalid_token())
        } else {
            tracing::error!(status = %status, "Unexpected status from IAM authenticate");
            Err(AppError::UpstreamError(anyhow::anyhow!(
                "IAM returned {}",
                status
            )))
        }
    }
}
