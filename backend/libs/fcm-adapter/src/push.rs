use tracing::{debug, error, info, warn};

use crate::config::FcmConfig;
use crate::errors::{FCMError, PushError};
use crate::message::Message;
use crate::session::{AppInitializer, ServiceAccountInitializer};
use crate::translate::to_fcm_message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Send,
    DryRun,
}

/// Send `msg` to its device token. Returns the FCM message name.
pub async fn send_message_one<I>(initializer: &I, msg: &Message) -> Result<String, PushError>
where
    I: AppInitializer + ?Sized,
{
    deliver(initializer, msg, Delivery::Send).await
}

/// Dry-run `msg` to check the token and payload without delivering anything.
pub async fn validate_token<I>(initializer: &I, msg: &Message) -> Result<String, PushError>
where
    I: AppInitializer + ?Sized,
{
    deliver(initializer, msg, Delivery::DryRun).await
}

async fn deliver<I>(initializer: &I, msg: &Message, delivery: Delivery) -> Result<String, PushError>
where
    I: AppInitializer + ?Sized,
{
    if msg.token.is_empty() {
        warn!(?delivery, "Rejected push message without a device token");
        return Err(PushError::EmptyToken);
    }

    let token_prefix = msg.token_prefix();

    let app = initializer.init_app().await.map_err(PushError::AppInit)?;
    let client = app.messaging().await.map_err(PushError::MessagingInit)?;

    let content = to_fcm_message(msg);
    debug!(token = %token_prefix, ?delivery, "Translated push message");

    let result = match delivery {
        Delivery::Send => client.send(&content).await,
        Delivery::DryRun => client.send_dry_run(&content).await,
    };

    match result {
        Ok(name) => {
            info!(
                "FCM {:?} succeeded for token {} (message: {})",
                delivery, token_prefix, name
            );
            Ok(name)
        }
        Err(e) => {
            error!("FCM {:?} failed for token {}: {}", delivery, token_prefix, e);
            Err(PushError::Send(e))
        }
    }
}

/// FCM push provider holding the session initializer
///
/// A new app and messaging client are created on every call.
#[derive(Debug, Clone)]
pub struct FcmPush<I = ServiceAccountInitializer> {
    initializer: I,
}

impl FcmPush<ServiceAccountInitializer> {
    pub fn from_config(config: FcmConfig) -> Self {
        Self::new(ServiceAccountInitializer::new(config))
    }

    /// Uses `GOOGLE_APPLICATION_CREDENTIALS` and the `FCM_*` overrides
    pub fn from_env() -> Result<Self, FCMError> {
        Ok(Self::from_config(FcmConfig::from_env()?))
    }
}

impl<I: AppInitializer> FcmPush<I> {
    pub fn new(initializer: I) -> Self {
        Self { initializer }
    }

    pub async fn send_message_one(&self, msg: &Message) -> Result<String, PushError> {
        send_message_one(&self.initializer, msg).await
    }

    pub async fn validate_token(&self, msg: &Message) -> Result<String, PushError> {
        validate_token(&self.initializer, msg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MockAppInitializer, MockFirebaseApp, MockMessagingClient};
    use std::sync::Arc;

    fn message() -> Message {
        Message::to_token("fcm-device-token-0001")
            .with_title("Hi")
            .with_body("B")
    }

    fn app_with_client(client: MockMessagingClient) -> MockFirebaseApp {
        let client = Arc::new(std::sync::Mutex::new(Some(client)));
        let mut app = MockFirebaseApp::new();
        app.expect_messaging().times(1).returning(move || {
            let client = client
                .lock()
                .unwrap()
                .take()
                .expect("messaging client requested twice");
            Ok(Box::new(client))
        });
        app
    }

    fn initializer_with_app(app: MockFirebaseApp) -> MockAppInitializer {
        let app = Arc::new(std::sync::Mutex::new(Some(app)));
        let mut init = MockAppInitializer::new();
        init.expect_init_app().times(1).returning(move || {
            let app = app.lock().unwrap().take().expect("app initialized twice");
            Ok(Box::new(app))
        });
        init
    }

    #[tokio::test]
    async fn test_empty_token_skips_initializer() {
        let mut init = MockAppInitializer::new();
        init.expect_init_app().times(0);

        let msg = Message::to_topic("news").with_title("Hi");

        let err = send_message_one(&init, &msg).await.unwrap_err();
        assert!(matches!(err, PushError::EmptyToken));
        assert_eq!(err.to_string(), "token cannot be empty");

        let err = validate_token(&init, &msg).await.unwrap_err();
        assert!(matches!(err, PushError::EmptyToken));
    }

    #[tokio::test]
    async fn test_init_failure_stops_before_messaging() {
        for dry_run in [false, true] {
            let mut init = MockAppInitializer::new();
            init.expect_init_app()
                .times(1)
                .returning(|| Err(FCMError::MissingProjectId));

            let result = if dry_run {
                validate_token(&init, &message()).await
            } else {
                send_message_one(&init, &message()).await
            };

            let err = result.unwrap_err();
            assert!(matches!(err, PushError::AppInit(_)));
            assert!(err.to_string().contains("error initializing new app"));
        }
    }

    #[tokio::test]
    async fn test_messaging_failure_stops_before_send() {
        for dry_run in [false, true] {
            let mut app = MockFirebaseApp::new();
            app.expect_messaging()
                .times(1)
                .returning(|| Err(FCMError::KeyParseError("bad pem".to_string())));
            let init = initializer_with_app(app);

            let result = if dry_run {
                validate_token(&init, &message()).await
            } else {
                send_message_one(&init, &message()).await
            };

            let err = result.unwrap_err();
            assert!(matches!(err, PushError::MessagingInit(_)));
            assert!(err.to_string().contains("error initializing messaging"));
        }
    }

    #[tokio::test]
    async fn test_send_returns_message_name() {
        let mut client = MockMessagingClient::new();
        client
            .expect_send()
            .withf(|content| {
                content.token == "fcm-device-token-0001" && content.notification.title == "Hi"
            })
            .times(1)
            .returning(|_| Ok("projects/demo/messages/0:1500415314455276".to_string()));
        client.expect_send_dry_run().times(0);

        let push = FcmPush::new(initializer_with_app(app_with_client(client)));
        let name = push.send_message_one(&message()).await.unwrap();
        assert_eq!(name, "projects/demo/messages/0:1500415314455276");
    }

    #[tokio::test]
    async fn test_validate_uses_dry_run() {
        let mut client = MockMessagingClient::new();
        client.expect_send().times(0);
        client
            .expect_send_dry_run()
            .times(1)
            .returning(|_| Ok("projects/demo/messages/fake_message_id".to_string()));

        let push = FcmPush::new(initializer_with_app(app_with_client(client)));
        let name = push.validate_token(&message()).await.unwrap();
        assert_eq!(name, "projects/demo/messages/fake_message_id");
    }

    #[tokio::test]
    async fn test_send_failure_is_wrapped() {
        let mut client = MockMessagingClient::new();
        client.expect_send().times(1).returning(|_| {
            Err(FCMError::ApiError(
                "404 Not Found".to_string(),
                "Requested entity was not found.".to_string(),
            ))
        });

        let init = initializer_with_app(app_with_client(client));
        let result = send_message_one(&init, &message()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, PushError::Send(_)));
        assert!(err.to_string().contains("error sending messaging"));
        assert!(err.to_string().contains("Requested entity was not found."));
    }

    #[tokio::test]
    async fn test_message_is_not_mutated() {
        let mut client = MockMessagingClient::new();
        client
            .expect_send()
            .returning(|_| Ok("projects/demo/messages/1".to_string()));

        let msg = message().with_custom_data("k", "v");
        let before = msg.clone();

        let init = initializer_with_app(app_with_client(client));
        send_message_one(&init, &msg).await.unwrap();
        assert_eq!(msg, before);
    }
}
