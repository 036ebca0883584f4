//! Notifier trait for delivering alarm text to a chat

use async_trait::async_trait;

/// Capability to deliver one message to one chat address
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send `text` to the chat identified by `chat_id`
    async fn send(&self, chat_id: &str, text: &str) -> crate::Result<()>;
}
