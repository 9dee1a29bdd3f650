use serde::{Deserialize, Serialize};

/// Outbound text message payload for `/{phone_number_id}/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub messaging_product: &'static str,
    pub to: String,
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBody {
    pub body: String,
}

/// Graph API acknowledgement for an accepted message.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default)]
    pub messages: Vec<MessageId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageId {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_matches_the_graph_wire_shape() {
        let request = SendMessageRequest {
            messaging_product: "whatsapp",
            to: "201012345678".to_string(),
            message_type: "text",
            text: TextBody {
                body: "أهلاً".to_string(),
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messaging_product"], "whatsapp");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"]["body"], "أهلاً");
    }

    #[test]
    fn response_parses_message_ids() {
        let response: SendMessageResponse =
            serde_json::from_str(r#"{"messages": [{"id": "wamid.abc"}]}"#).unwrap();
        assert_eq!(response.messages[0].id, "wamid.abc");
    }
}
