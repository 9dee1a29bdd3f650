//! WhatsApp Business Cloud API client.
//!
//! Sends outbound text messages through the Graph API
//! (`/{phone_number_id}/messages`). Inbound traffic arrives via webhook
//! and is handled by the server, not here.

pub mod models;

use models::{SendMessageRequest, SendMessageResponse, TextBody};
use thiserror::Error;

const GRAPH_BASE: &str = "https://graph.facebook.com/v18.0";

/// Result type for WhatsApp client operations.
pub type Result<T> = std::result::Result<T, WhatsAppError>;

/// WhatsApp client errors.
#[derive(Debug, Error)]
pub enum WhatsAppError {
    /// Client created without credentials
    #[error("WhatsApp is not configured")]
    NotConfigured,

    /// Recipient number cannot be normalized to the wire format
    #[error("invalid recipient phone: {0}")]
    InvalidRecipient(String),

    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Graph API rejected the request
    #[error("WhatsApp API error ({status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone)]
pub struct WhatsAppOptions {
    pub api_key: String,
    pub phone_number_id: String,
}

#[derive(Debug, Clone)]
pub struct WhatsAppService {
    options: Option<WhatsAppOptions>,
    client: reqwest::Client,
    base_url: String,
}

impl WhatsAppService {
    pub fn new(options: WhatsAppOptions) -> Self {
        Self {
            options: Some(options),
            client: reqwest::Client::new(),
            base_url: GRAPH_BASE.to_string(),
        }
    }

    /// A service with no credentials. Every send fails with
    /// [`WhatsAppError::NotConfigured`]; callers treat that as a
    /// non-fatal, logged outcome.
    pub fn unconfigured() -> Self {
        Self {
            options: None,
            client: reqwest::Client::new(),
            base_url: GRAPH_BASE.to_string(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.options.is_some()
    }

    /// Override the base URL (for test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send a plain text message. `to_phone` may be a national 11-digit
    /// Egyptian number or already carry the country code.
    pub async fn send_text(&self, to_phone: &str, body: &str) -> Result<SendMessageResponse> {
        let options = self.options.as_ref().ok_or(WhatsAppError::NotConfigured)?;
        let to = wire_phone(to_phone)?;

        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to,
            message_type: "text",
            text: TextBody {
                body: body.to_string(),
            },
        };

        let url = format!("{}/{}/messages", self.base_url, options.phone_number_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&options.api_key)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "WhatsApp send failed");
            return Err(WhatsAppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendMessageResponse = resp.json().await?;
        tracing::debug!(to = %request.to, "WhatsApp message accepted");
        Ok(parsed)
    }
}

/// Normalize a recipient to the Graph API wire format: digits only,
/// Egyptian country code prefixed. "01012345678" becomes "201012345678".
pub fn wire_phone(raw: &str) -> Result<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let normalized = if digits.len() == 11 && digits.starts_with('0') {
        format!("20{}", &digits[1..])
    } else if digits.len() == 12 && digits.starts_with("20") {
        digits
    } else {
        return Err(WhatsAppError::InvalidRecipient(raw.to_string()));
    };
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_phone_prefixes_national_numbers() {
        assert_eq!(wire_phone("01012345678").unwrap(), "201012345678");
    }

    #[test]
    fn wire_phone_keeps_international_numbers() {
        assert_eq!(wire_phone("201012345678").unwrap(), "201012345678");
    }

    #[test]
    fn wire_phone_strips_formatting() {
        assert_eq!(wire_phone("010 1234-5678").unwrap(), "201012345678");
    }

    #[test]
    fn wire_phone_rejects_short_numbers() {
        assert!(matches!(
            wire_phone("0101234567"),
            Err(WhatsAppError::InvalidRecipient(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_service_fails_cleanly() {
        let service = WhatsAppService::unconfigured();
        let result = service.send_text("01012345678", "مرحبا").await;
        assert!(matches!(result, Err(WhatsAppError::NotConfigured)));
    }
}
