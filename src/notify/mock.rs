//! In-memory notifier for tests and the integration harness.

use async_trait::async_trait;
use std::sync::Mutex;

use super::error::NotifyError;
use super::Notifier;

#[derive(Default)]
pub struct MockNotifier {
    push: Mutex<Vec<(String, String)>>,
    chat: Mutex<Vec<(String, String)>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_messages(&self) -> Vec<(String, String)> {
        self.push.lock().expect("lock poisoned").clone()
    }

    pub fn chat_messages(&self) -> Vec<(String, String)> {
        self.chat.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_push(&self, token: &str, message: &str) -> Result<(), NotifyError> {
        self.push
            .lock()
            .expect("lock poisoned")
            .push((token.to_string(), message.to_string()));
        Ok(())
    }

    async fn send_chat(&self, chat_id: &str, message: &str) -> Result<(), NotifyError> {
        self.chat
            .lock()
            .expect("lock poisoned")
            .push((chat_id.to_string(), message.to_string()));
        Ok(())
    }
}
