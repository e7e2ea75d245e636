use thiserror::Error;

/// FCM Client Error Types
#[derive(Error, Debug)]
pub enum FCMError {
    #[error("FCM configuration error: {0}")]
    Config(String),

    #[error("Failed to read credentials file {path}: {reason}")]
    CredentialsRead { path: String, reason: String },

    #[error("Failed to parse service account key: {0}")]
    CredentialsParse(String),

    #[error("project id is required but neither the configuration nor the credentials provide one")]
    MissingProjectId,

    #[error("Failed to parse private key: {0}")]
    KeyParseError(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to encode JWT: {0}")]
    JwtEncodeError(String),

    #[error("Failed to get access token: {0}")]
    TokenError(String),

    #[error("Token request failed with status: {0}")]
    TokenRequestFailed(String),

    #[error("Failed to parse token response: {0}")]
    TokenParseError(String),

    #[error("FCM send request failed: {0}")]
    SendRequestError(String),

    #[error("Failed to parse FCM response: {0}")]
    ResponseParseError(String),

    #[error("FCM API error: {0} - {1}")]
    ApiError(String, String),
}

/// Errors surfaced by the `send_message_one` / `validate_token` entry points.
///
/// Every variant ends the call; nothing is retried.
#[derive(Error, Debug)]
pub enum PushError {
    #[error("token cannot be empty")]
    EmptyToken,

    #[error("error initializing new app: {0}")]
    AppInit(#[source] FCMError),

    #[error("error initializing messaging: {0}")]
    MessagingInit(#[source] FCMError),

    #[error("error sending messaging: {0}")]
    Send(#[source] FCMError),
}
