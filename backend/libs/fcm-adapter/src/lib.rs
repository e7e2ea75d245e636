//! FCM Adapter
//!
//! Maps the flat push [`Message`] record onto Firebase Cloud Messaging (FCM)
//! HTTP v1 payloads and delivers it to a single device.
//!
//! It handles:
//! - Service account credential loading from an explicit configuration
//! - OAuth2 token generation for each call
//! - Translation into the per-platform Android / APNs / Webpush blocks
//! - Single message send and dry-run validation
//!
//! A fresh app session is created on every call and dropped afterwards.

pub mod client;
pub mod config;
pub mod errors;
pub mod message;
pub mod models;
pub mod push;
pub mod session;
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::FCMClient;
pub use config::{CredentialsSource, FcmConfig};
pub use errors::{FCMError, PushError};
pub use message::{CustomData, CustomValue, Message};
pub use models::{FcmMessageContent, ServiceAccountKey};
pub use push::{send_message_one, validate_token, FcmPush};
pub use session::{
    AppInitializer, FirebaseApp, MessagingClient, ServiceAccountApp, ServiceAccountInitializer,
};
pub use translate::to_fcm_message;
