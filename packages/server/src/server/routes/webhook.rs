//! WhatsApp webhook pair: the GET verification handshake and the POST
//! inbound message receiver.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domains::interactions::InteractionKind;
use crate::server::app::AppState;

/// Verification handshake: echo the challenge when the verify token
/// matches, 403 otherwise.
pub async fn webhook_verify(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    if mode == Some("subscribe") && token == Some(state.config.whatsapp_webhook_token.as_str()) {
        (StatusCode::OK, challenge)
    } else {
        warn!("Webhook verification failed");
        (StatusCode::FORBIDDEN, "verification failed".to_string())
    }
}

// Minimal slice of the Graph webhook payload; everything else is
// ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct Change {
    #[serde(default)]
    value: Option<ChangeValue>,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<InboundMessage>,
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[derive(Debug, Deserialize)]
struct InboundMessage {
    from: String,
    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Debug, Deserialize)]
struct TextContent {
    body: String,
}

#[derive(Debug, Deserialize)]
struct Contact {
    #[serde(default)]
    profile: Option<Profile>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    name: Option<String>,
}

/// Inbound messages: resolve each sender to a lead (auto-creating
/// unknown numbers as whatsapp-source leads) and run the agent
/// pipeline. Always answers 200 so the provider does not retry
/// endlessly on our internal failures.
pub async fn webhook_receive(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Json<serde_json::Value> {
    for entry in payload.entry {
        for change in entry.changes {
            let Some(value) = change.value else { continue };
            let sender_name = value
                .contacts
                .first()
                .and_then(|c| c.profile.as_ref())
                .and_then(|p| p.name.clone());

            for message in value.messages {
                let Some(text) = &message.text else {
                    continue; // non-text messages are out of scope
                };
                let phone = national_phone(&message.from);

                let lead = match state
                    .crm
                    .resolve_inbound_lead(&phone, sender_name.as_deref())
                    .await
                {
                    Ok(lead) => lead,
                    Err(e) => {
                        warn!(from = %message.from, error = %e, "Could not resolve inbound sender");
                        continue;
                    }
                };

                match state
                    .crm
                    .handle_incoming_message(lead.id, &text.body, InteractionKind::Whatsapp)
                    .await
                {
                    Ok(outcome) => info!(
                        lead_id = %lead.id,
                        intent = %outcome.intent,
                        readiness = %outcome.readiness,
                        "Inbound WhatsApp message handled"
                    ),
                    Err(e) => {
                        warn!(lead_id = %lead.id, error = %e, "Inbound message pipeline failed")
                    }
                }
            }
        }
    }

    Json(serde_json::json!({ "status": "ok" }))
}

/// Graph sends `20XXXXXXXXXX`; the store keys on the national
/// `0XXXXXXXXXX` form.
fn national_phone(wa_phone: &str) -> String {
    let digits: String = wa_phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("20") {
        format!("0{}", &digits[2..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_phone_strips_country_code() {
        assert_eq!(national_phone("201012345678"), "01012345678");
        assert_eq!(national_phone("01012345678"), "01012345678");
    }

    #[test]
    fn payload_parses_a_real_shape() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "entry": [{
                    "changes": [{
                        "value": {
                            "contacts": [{"profile": {"name": "Ahmed"}}],
                            "messages": [{"from": "201012345678", "text": {"body": "عايز اعرف السعر"}}]
                        }
                    }]
                }]
            }"#,
        )
        .unwrap();
        let msg = &payload.entry[0].changes[0].value.as_ref().unwrap().messages[0];
        assert_eq!(msg.from, "201012345678");
        assert_eq!(msg.text.as_ref().unwrap().body, "عايز اعرف السعر");
    }

    #[test]
    fn payload_tolerates_status_only_events() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"entry": [{"changes": [{"value": {}}]}]}"#).unwrap();
        assert!(payload.entry[0].changes[0].value.as_ref().unwrap().messages.is_empty());
    }
}
