use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Vendor-specific extension payload.
pub type CustomData = BTreeMap<String, CustomValue>;

/// A custom data value. Arrays and null have no place in the APNs / Webpush
/// extension dictionaries, so they are not representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Map(BTreeMap<String, CustomValue>),
}

impl From<&str> for CustomValue {
    fn from(value: &str) -> Self {
        CustomValue::String(value.to_string())
    }
}

impl From<String> for CustomValue {
    fn from(value: String) -> Self {
        CustomValue::String(value)
    }
}

impl From<bool> for CustomValue {
    fn from(value: bool) -> Self {
        CustomValue::Bool(value)
    }
}

impl From<i64> for CustomValue {
    fn from(value: i64) -> Self {
        CustomValue::Number(value.into())
    }
}

impl From<u64> for CustomValue {
    fn from(value: u64) -> Self {
        CustomValue::Number(value.into())
    }
}

impl From<i32> for CustomValue {
    fn from(value: i32) -> Self {
        CustomValue::Number(value.into())
    }
}

impl From<f64> for CustomValue {
    /// Non-finite floats have no JSON form and become `0`.
    fn from(value: f64) -> Self {
        CustomValue::Number(serde_json::Number::from_f64(value).unwrap_or_else(|| 0u64.into()))
    }
}

impl From<BTreeMap<String, CustomValue>> for CustomValue {
    fn from(value: BTreeMap<String, CustomValue>) -> Self {
        CustomValue::Map(value)
    }
}

/// Push message as handed in by callers.
///
/// Built right before a call and dropped after it; the adapter only borrows it.
/// `token` and `topic` are not checked for mutual exclusivity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub token: String,
    pub topic: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,

    // Apple / iOS
    pub subtitle: String,
    pub action_ios: String,

    // Android
    /// Not forwarded: Android reuses `action_ios` as its click action.
    pub action_android: String,

    // Webpush
    pub action_web_push: String,
    pub custom_data: CustomData,
    pub badge_icon_image: String,
    /// Not forwarded: browsers ignore notification sounds.
    pub sound_web_push: String,
    pub tags_category: String,
}

impl Message {
    /// Message addressed to a single device token
    pub fn to_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Default::default()
        }
    }

    /// Message addressed to a topic
    pub fn to_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Add one entry to the string data payload
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Add one entry to the custom data payload
    pub fn with_custom_data(mut self, key: impl Into<String>, value: impl Into<CustomValue>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }

    pub fn with_actions(
        mut self,
        ios: impl Into<String>,
        android: impl Into<String>,
        web_push: impl Into<String>,
    ) -> Self {
        self.action_ios = ios.into();
        self.action_android = android.into();
        self.action_web_push = web_push.into();
        self
    }

    pub fn with_badge_icon_image(mut self, image: impl Into<String>) -> Self {
        self.badge_icon_image = image.into();
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound_web_push = sound.into();
        self
    }

    pub fn with_tags_category(mut self, category: impl Into<String>) -> Self {
        self.tags_category = category.into();
        self
    }

    /// First 8 characters of the token, safe to log
    pub(crate) fn token_prefix(&self) -> String {
        self.token.chars().take(8).collect()
    }
}
