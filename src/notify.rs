use crate::error::{Result, ScannerError};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// Outbound "send text to a chat" capability.
///
/// The scanner only depends on this trait, so tests can swap in a recording
/// or failing implementation.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram bot API implementation.
pub struct TelegramNotifier {
    client: Client,
    token: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            token: token.into(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);

        debug!("sending {} chars to chat {}", text.len(), chat_id);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScannerError::Notify(format!("HTTP {}: {}", status, body)));
        }

        Ok(())
    }
}
