use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::message::CustomData;

fn is_false(value: &bool) -> bool {
    !*value
}

fn to_json<T: Serialize, E: serde::ser::Error>(value: &T) -> Result<Value, E> {
    serde_json::to_value(value).map_err(E::custom)
}

fn put_str(object: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        object.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// Writes `object` with the custom keys merged in. A custom key replaces a
/// standard field of the same name, so every key appears once.
fn serialize_merged<S: Serializer>(
    mut object: Map<String, Value>,
    custom_data: &CustomData,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    for (key, value) in custom_data {
        object.insert(key.clone(), to_json::<_, S::Error>(value)?);
    }
    object.serialize(serializer)
}

/// Firebase Service Account Key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// JWT Claims for Google OAuth2
#[derive(Debug, Serialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Google OAuth2 Token Response
#[derive(Debug, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

/// FCM Message Request
#[derive(Debug, Serialize)]
pub struct FcmMessage<'a> {
    pub message: &'a FcmMessageContent,
    #[serde(skip_serializing_if = "is_false")]
    pub validate_only: bool,
}

/// FCM Message Content
///
/// Empty strings and maps are left out of the JSON body, the same way the
/// Firebase Admin SDKs encode messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FcmMessageContent {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub topic: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    pub notification: FcmNotification,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
    pub webpush: WebpushConfig,
}

/// FCM Notification Payload
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FcmNotification {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AndroidMessagePriority {
    #[default]
    Normal,
    High,
}

/// Android specific options
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AndroidConfig {
    pub priority: AndroidMessagePriority,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AndroidNotification {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub click_action: String,
}

/// Apple Push Notification Service specific options
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

/// APNs payload: the `aps` dictionary plus custom keys at the top level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApnsPayload {
    pub aps: Aps,
    pub custom_data: CustomData,
}

impl Serialize for ApnsPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object = Map::new();
        object.insert("aps".to_string(), to_json::<_, S::Error>(&self.aps)?);
        serialize_merged(object, &self.custom_data, serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aps {
    pub alert: ApsAlert,
    pub category: String,
    pub custom_data: CustomData,
}

impl Serialize for Aps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object = Map::new();
        object.insert("alert".to_string(), to_json::<_, S::Error>(&self.alert)?);
        put_str(&mut object, "category", &self.category);
        serialize_merged(object, &self.custom_data, serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApsAlert {
    #[serde(rename = "action-loc-key", skip_serializing_if = "String::is_empty")]
    pub action_loc_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subtitle: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

/// Webpush protocol options
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebpushConfig {
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    pub notification: WebpushNotification,
    pub fcm_options: WebpushFcmOptions,
}

/// Web Notification options, extended with custom keys at the top level
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebpushNotification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub image: String,
    pub vibrate: Vec<u32>,
    pub tag: String,
    pub data: CustomData,
    pub custom_data: CustomData,
}

impl Serialize for WebpushNotification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut object = Map::new();
        put_str(&mut object, "title", &self.title);
        put_str(&mut object, "body", &self.body);
        put_str(&mut object, "icon", &self.icon);
        put_str(&mut object, "badge", &self.badge);
        put_str(&mut object, "image", &self.image);
        if !self.vibrate.is_empty() {
            object.insert("vibrate".to_string(), to_json::<_, S::Error>(&self.vibrate)?);
        }
        put_str(&mut object, "tag", &self.tag);
        if !self.data.is_empty() {
            object.insert("data".to_string(), to_json::<_, S::Error>(&self.data)?);
        }
        serialize_merged(object, &self.custom_data, serializer)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WebpushFcmOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
}

/// FCM API Response
#[derive(Debug, Deserialize)]
pub struct FcmApiResponse {
    pub name: Option<String>,
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
pub struct FcmErrorEnvelope {
    pub error: FcmErrorResponse,
}

#[derive(Debug, Deserialize)]
pub struct FcmErrorResponse {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}
