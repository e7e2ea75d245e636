use async_trait::async_trait;
use tracing::debug;

use crate::client::FCMClient;
use crate::config::FcmConfig;
use crate::errors::FCMError;
use crate::models::{FcmMessageContent, ServiceAccountKey};

#[cfg(test)]
use mockall::automock;

/// Produces an app session from credentials
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AppInitializer: Send + Sync {
    async fn init_app(&self) -> Result<Box<dyn FirebaseApp>, FCMError>;
}

/// An initialized app, able to hand out a messaging client
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FirebaseApp: Send + Sync {
    async fn messaging(&self) -> Result<Box<dyn MessagingClient>, FCMError>;
}

/// The two FCM operations the adapter consumes
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Deliver the message; returns the FCM message name
    async fn send(&self, content: &FcmMessageContent) -> Result<String, FCMError>;

    /// Validate the message without delivering it
    async fn send_dry_run(&self, content: &FcmMessageContent) -> Result<String, FCMError>;
}

/// Initializer backed by a service account key
#[derive(Debug, Clone)]
pub struct ServiceAccountInitializer {
    config: FcmConfig,
}

impl ServiceAccountInitializer {
    pub fn new(config: FcmConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FcmConfig {
        &self.config
    }
}

#[async_trait]
impl AppInitializer for ServiceAccountInitializer {
    async fn init_app(&self) -> Result<Box<dyn FirebaseApp>, FCMError> {
        let app = ServiceAccountApp::from_config(&self.config)?;
        Ok(Box::new(app))
    }
}

/// App session: parsed credentials plus resolved endpoints
#[derive(Debug, Clone)]
pub struct ServiceAccountApp {
    project_id: String,
    credentials: ServiceAccountKey,
    api_base_url: String,
    token_uri: Option<String>,
}

impl ServiceAccountApp {
    /// Load the key and resolve the project id (config override first)
    pub fn from_config(config: &FcmConfig) -> Result<Self, FCMError> {
        let credentials = config.credentials.load()?;

        let project_id = config
            .project_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| Some(credentials.project_id.clone()).filter(|id| !id.is_empty()))
            .ok_or(FCMError::MissingProjectId)?;

        debug!(
            project_id = %project_id,
            client_email = %credentials.client_email,
            "Initialized FCM app"
        );

        Ok(Self {
            project_id,
            credentials,
            api_base_url: config.api_base_url.clone(),
            token_uri: config.token_uri.clone(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl FirebaseApp for ServiceAccountApp {
    async fn messaging(&self) -> Result<Box<dyn MessagingClient>, FCMError> {
        let client = FCMClient::new(self.project_id.clone(), self.credentials.clone())?
            .with_endpoints(&self.api_base_url, self.token_uri.as_deref());
        Ok(Box::new(client))
    }
}

#[async_trait]
impl MessagingClient for FCMClient {
    async fn send(&self, content: &FcmMessageContent) -> Result<String, FCMError> {
        FCMClient::send(self, content).await
    }

    async fn send_dry_run(&self, content: &FcmMessageContent) -> Result<String, FCMError> {
        FCMClient::send_dry_run(self, content).await
    }
}
