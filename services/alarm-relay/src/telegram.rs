//! Telegram Bot API notification client

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::TelegramConfig;
use crate::io::HttpClient;
use crate::notifier::Notifier;

/// Sends direct messages through `sendMessage`
pub struct TelegramNotifier {
    send_message_url: String,
    parse_mode: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("parse_mode", &self.parse_mode)
            .finish()
    }
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, http: Arc<dyn HttpClient>) -> Self {
        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            config.api_base.trim_end_matches('/'),
            config.bot_token
        );

        tracing::debug!(
            "Created TelegramNotifier at {} with parse mode '{}'",
            config.api_base,
            config.parse_mode
        );

        Self {
            send_message_url,
            parse_mode: config.parse_mode.clone(),
            http,
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn type_name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, text: &str) -> crate::Result<()> {
        let params = [
            ("chat_id", chat_id),
            ("text", text),
            ("parse_mode", self.parse_mode.as_str()),
        ];

        tracing::debug!("Sending Telegram message to chat {}", chat_id);

        let response = self.http.post_form(&self.send_message_url, &params).await?;

        if !response.is_success() {
            return Err(crate::RelayError::Notifier(format!(
                "Telegram API returned status {}: {}",
                response.status, response.body
            )));
        }

        tracing::info!("Notification sent to chat ID {}", chat_id);
        Ok(())
    }
}
