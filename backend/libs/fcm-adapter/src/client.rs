use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::DEFAULT_API_BASE_URL;
use crate::errors::FCMError;
use crate::models::*;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Firebase Cloud Messaging Client
///
/// Minimal FCM HTTP v1 transport: exchanges a service account JWT for an
/// OAuth2 access token and posts to `messages:send`. No retries, no token
/// caching beyond the client's own lifetime.
pub struct FCMClient {
    pub project_id: String,
    pub credentials: Arc<ServiceAccountKey>,
    api_base_url: String,
    token_uri: String,
    encoding_key: EncodingKey,
    http_client: reqwest::Client,
}

impl FCMClient {
    /// Create new FCM client
    ///
    /// # Arguments
    /// * `project_id` - Firebase project ID
    /// * `credentials` - Service account key with OAuth2 credentials
    ///
    /// Fails if the private key is not a valid RSA PEM.
    pub fn new(project_id: String, credentials: ServiceAccountKey) -> Result<Self, FCMError> {
        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|e| FCMError::KeyParseError(e.to_string()))?;

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| FCMError::HttpClient(e.to_string()))?;

        let token_uri = credentials.token_uri.clone();

        Ok(Self {
            project_id,
            credentials: Arc::new(credentials),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_uri,
            encoding_key,
            http_client,
        })
    }

    /// Point the client at different FCM / OAuth2 endpoints
    pub fn with_endpoints(mut self, api_base_url: &str, token_uri: Option<&str>) -> Self {
        self.api_base_url = api_base_url.trim_end_matches('/').to_string();
        if let Some(uri) = token_uri {
            self.token_uri = uri.to_string();
        }
        self
    }

    pub fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base_url, self.project_id
        )
    }

    /// Deliver a message. Returns the message name assigned by FCM.
    pub async fn send(&self, content: &FcmMessageContent) -> Result<String, FCMError> {
        self.post_message(content, false).await
    }

    /// Validate a message without delivering it
    pub async fn send_dry_run(&self, content: &FcmMessageContent) -> Result<String, FCMError> {
        self.post_message(content, true).await
    }

    async fn post_message(
        &self,
        content: &FcmMessageContent,
        validate_only: bool,
    ) -> Result<String, FCMError> {
        let access_token = self.get_access_token().await?;

        let message = FcmMessage {
            message: content,
            validate_only,
        };

        debug!(
            project_id = %self.project_id,
            validate_only,
            "Posting message to FCM"
        );

        let response = self
            .http_client
            .post(self.send_url())
            .bearer_auth(&access_token)
            .json(&message)
            .send()
            .await
            .map_err(|e| FCMError::SendRequestError(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let fcm_response: FcmApiResponse = response
                    .json()
                    .await
                    .map_err(|e| FCMError::ResponseParseError(e.to_string()))?;

                fcm_response.name.ok_or_else(|| {
                    FCMError::ResponseParseError("response has no message name".to_string())
                })
            }
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());

                let detail = serde_json::from_str::<FcmErrorEnvelope>(&error_text)
                    .ok()
                    .and_then(|envelope| envelope.error.message)
                    .unwrap_or(error_text);

                error!(status = %status, "FCM API rejected message: {}", detail);
                Err(FCMError::ApiError(status.to_string(), detail))
            }
        }
    }

    /// Get an access token for the service account
    pub async fn get_access_token(&self) -> Result<String, FCMError> {
        let now = Utc::now();
        let exp = (now + Duration::hours(1)).timestamp();
        let iat = now.timestamp();

        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            exp,
            iat,
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.credentials.private_key_id.is_empty() {
            header.kid = Some(self.credentials.private_key_id.clone());
        }

        let assertion = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| FCMError::JwtEncodeError(e.to_string()))?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .http_client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| FCMError::TokenError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FCMError::TokenRequestFailed(response.status().to_string()));
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| FCMError::TokenParseError(e.to_string()))?;

        debug!(
            expires_in = token_response.expires_in,
            token_type = %token_response.token_type,
            "Obtained FCM access token"
        );

        Ok(token_response.access_token)
    }
}
