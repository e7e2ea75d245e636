use dotenv::dotenv;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::errors::FCMError;
use crate::models::ServiceAccountKey;

pub const DEFAULT_API_BASE_URL: &str = "https://fcm.googleapis.com";

/// Where the service account key comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    /// Path to the JSON key downloaded from the Firebase console
    File(PathBuf),
    /// The JSON key itself, e.g. injected from a secret store
    Json(String),
}

impl CredentialsSource {
    /// Read and parse the service account key
    pub fn load(&self) -> Result<ServiceAccountKey, FCMError> {
        let raw = match self {
            CredentialsSource::File(path) => {
                fs::read_to_string(path).map_err(|e| FCMError::CredentialsRead {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            CredentialsSource::Json(json) => json.clone(),
        };

        serde_json::from_str(&raw).map_err(|e| FCMError::CredentialsParse(e.to_string()))
    }
}

/// FCM Configuration
#[derive(Debug, Clone)]
pub struct FcmConfig {
    pub credentials: CredentialsSource,
    /// Overrides the `project_id` of the service account key
    pub project_id: Option<String>,
    pub api_base_url: String,
    /// Overrides the `token_uri` of the service account key
    pub token_uri: Option<String>,
}

impl FcmConfig {
    /// Create new FCM configuration
    pub fn new(credentials: CredentialsSource) -> Self {
        Self {
            credentials,
            project_id: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_uri: None,
        }
    }

    /// Configuration for a key file on disk
    pub fn from_credentials_file(path: impl Into<PathBuf>) -> Self {
        Self::new(CredentialsSource::File(path.into()))
    }

    /// Loads FCM config from environment variables
    ///
    /// `GOOGLE_APPLICATION_CREDENTIALS` is required; `FCM_PROJECT_ID`,
    /// `FCM_API_BASE_URL` and `FCM_TOKEN_URI` are optional overrides.
    pub fn from_env() -> Result<Self, FCMError> {
        dotenv().ok();

        let path = env::var("GOOGLE_APPLICATION_CREDENTIALS")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| FCMError::Config("GOOGLE_APPLICATION_CREDENTIALS not set".to_string()))?;

        let mut config = Self::from_credentials_file(path);

        if let Some(project_id) = non_empty_var("FCM_PROJECT_ID") {
            config = config.with_project_id(project_id);
        }
        if let Some(base_url) = non_empty_var("FCM_API_BASE_URL") {
            config = config.with_api_base_url(base_url);
        }
        if let Some(token_uri) = non_empty_var("FCM_TOKEN_URI") {
            config = config.with_token_uri(token_uri);
        }

        Ok(config)
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = Some(token_uri.into());
        self
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for name in [
            "GOOGLE_APPLICATION_CREDENTIALS",
            "FCM_PROJECT_ID",
            "FCM_API_BASE_URL",
            "FCM_TOKEN_URI",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_requires_credentials() {
        clear_env();
        let err = FcmConfig::from_env().unwrap_err();
        assert!(matches!(err, FCMError::Config(_)));
        assert!(err.to_string().contains("GOOGLE_APPLICATION_CREDENTIALS"));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_overrides() {
        clear_env();
        env::set_var("GOOGLE_APPLICATION_CREDENTIALS", "/app/generated-private-key.json");
        env::set_var("FCM_PROJECT_ID", "override-project");
        env::set_var("FCM_API_BASE_URL", "http://localhost:9099/");

        let config = FcmConfig::from_env().unwrap();
        assert_eq!(
            config.credentials,
            CredentialsSource::File(PathBuf::from("/app/generated-private-key.json"))
        );
        assert_eq!(config.project_id.as_deref(), Some("override-project"));
        assert_eq!(config.api_base_url, "http://localhost:9099");
        assert!(config.token_uri.is_none());

        clear_env();
    }

    #[test]
    fn test_defaults() {
        let config = FcmConfig::from_credentials_file("/tmp/key.json");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.project_id.is_none());
    }

    #[test]
    fn test_load_credentials_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"service_account","project_id":"demo","private_key":"pem","client_email":"svc@demo.iam.gserviceaccount.com"}}"#
        )
        .unwrap();

        let key = CredentialsSource::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(key.project_id, "demo");
        assert_eq!(key.client_email, "svc@demo.iam.gserviceaccount.com");
    }

    #[test]
    fn test_load_credentials_errors() {
        let missing = CredentialsSource::File(PathBuf::from("/nonexistent/key.json")).load();
        assert!(matches!(missing, Err(FCMError::CredentialsRead { .. })));

        let malformed = CredentialsSource::Json("{not json".to_string()).load();
        assert!(matches!(malformed, Err(FCMError::CredentialsParse(_))));
    }
}
