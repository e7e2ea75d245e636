use crate::message::Message;
use crate::models::*;

/// Vibration pattern for web notifications, in milliseconds
pub const WEBPUSH_VIBRATE_PATTERN: [u32; 5] = [500, 500, 200, 200, 200];

/// Translate a [`Message`] into the FCM v1 message body.
///
/// Straight field copy: nothing is validated, computed or dropped, and empty
/// source fields stay empty.
pub fn to_fcm_message(msg: &Message) -> FcmMessageContent {
    FcmMessageContent {
        token: msg.token.clone(),
        topic: msg.topic.clone(),
        data: msg.data.clone(),
        apns: ApnsConfig {
            payload: ApnsPayload {
                aps: Aps {
                    category: msg.tags_category.clone(),
                    custom_data: msg.custom_data.clone(),
                    alert: ApsAlert {
                        action_loc_key: msg.action_ios.clone(),
                        title: msg.title.clone(),
                        subtitle: msg.subtitle.clone(),
                        body: msg.body.clone(),
                    },
                },
                custom_data: msg.custom_data.clone(),
            },
        },
        android: AndroidConfig {
            data: msg.data.clone(),
            notification: AndroidNotification {
                title: msg.title.clone(),
                icon: msg.badge_icon_image.clone(),
                tag: msg.tags_category.clone(),
                body: msg.body.clone(),
                click_action: msg.action_ios.clone(),
            },
            priority: AndroidMessagePriority::High,
        },
        webpush: WebpushConfig {
            data: msg.data.clone(),
            notification: WebpushNotification {
                title: msg.title.clone(),
                body: msg.body.clone(),
                data: msg.custom_data.clone(),
                custom_data: msg.custom_data.clone(),
                icon: msg.badge_icon_image.clone(),
                badge: msg.badge_icon_image.clone(),
                image: msg.badge_icon_image.clone(),
                vibrate: WEBPUSH_VIBRATE_PATTERN.to_vec(),
                tag: msg.tags_category.clone(),
            },
            fcm_options: WebpushFcmOptions {
                link: msg.action_web_push.clone(),
            },
        },
        notification: FcmNotification {
            title: msg.title.clone(),
            body: msg.body.clone(),
        },
    }
}
