use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("push notification failed: {message}")]
    PushFailed { message: String },

    #[error("chat notification failed: {message}")]
    ChatFailed { message: String },
}
