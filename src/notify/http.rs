//! Real push/chat delivery.
//!
//! Chat delivery targets the Telegram Bot API (`sendMessage`); push
//! delivery posts to FCM's HTTP v1 endpoint. Both are fire-and-forget as
//! far as the pipeline is concerned — see [`super::notify`].

use async_trait::async_trait;

use super::error::NotifyError;
use super::Notifier;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

pub struct HttpNotifier {
    http: reqwest::Client,
    chat_bot_token: Option<String>,
    push_server_key: Option<String>,
}

impl HttpNotifier {
    pub fn new(chat_bot_token: Option<String>, push_server_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            chat_bot_token,
            push_server_key,
        }
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_push(&self, token: &str, message: &str) -> Result<(), NotifyError> {
        let server_key = self
            .push_server_key
            .as_deref()
            .ok_or_else(|| NotifyError::PushFailed {
                message: "no push server key configured".to_string(),
            })?;

        let response = self
            .http
            .post(FCM_SEND_URL)
            .header("Authorization", format!("key={server_key}"))
            .json(&serde_json::json!({
                "to": token,
                "notification": { "body": message },
            }))
            .send()
            .await
            .map_err(|e| NotifyError::PushFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NotifyError::PushFailed {
                message: format!("fcm returned {}", response.status()),
            });
        }
        Ok(())
    }

    async fn send_chat(&self, chat_id: &str, message: &str) -> Result<(), NotifyError> {
        let token = self
            .chat_bot_token
            .as_deref()
            .ok_or_else(|| NotifyError::ChatFailed {
                message: "no chat bot token configured".to_string(),
            })?;

        let url = format!("{TELEGRAM_API_BASE}/bot{token}/sendMessage");
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "chat_id": chat_id, "text": message }))
            .send()
            .await
            .map_err(|e| NotifyError::ChatFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NotifyError::ChatFailed {
                message: format!("telegram returned {}", response.status()),
            });
        }
        Ok(())
    }
}
