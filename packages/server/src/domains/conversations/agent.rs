//! The conversational sales agent.
//!
//! Builds a bounded context from the lead and recent turns, asks the
//! model for a JSON reply, and parses it against a strict schema. When
//! the provider is unreachable or the output does not parse, the lead
//! gets a fixed templated reply and the conversation is flagged for
//! manual review; the request itself never fails.

use openai_client::{ChatRequest, Message, OpenAIClient};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domains::leads::models::Lead;

/// What the customer is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Inquiry,
    Pricing,
    PurchaseIntent,
    Negotiation,
    Complaint,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Inquiry => "inquiry",
            Intent::Pricing => "pricing",
            Intent::PurchaseIntent => "purchase_intent",
            Intent::Negotiation => "negotiation",
            Intent::Complaint => "complaint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Hesitant,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Hesitant => "hesitant",
        }
    }
}

/// Buying urgency estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Hot,
    Warm,
    Cold,
}

impl Readiness {
    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Hot => "hot",
            Readiness::Warm => "warm",
            Readiness::Cold => "cold",
        }
    }
}

/// The agent's structured reply. Parsed strictly; anything that fails
/// to parse routes through the fallback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentReply {
    /// Text sent back to the customer.
    pub response: String,
    pub intent: Intent,
    pub sentiment: Sentiment,
    pub readiness: Readiness,
    /// 0-100 estimate of a sales opportunity.
    pub opportunity_score: u8,
    #[serde(default)]
    pub recommended_action: Option<String>,
    #[serde(default)]
    pub should_alert_team: bool,
}

impl AgentReply {
    /// Score shift this exchange earns the lead, combining intent,
    /// readiness and sentiment. Rounded to one decimal.
    pub fn score_delta(&self) -> f64 {
        let intent = match self.intent {
            Intent::PurchaseIntent => 2.0,
            Intent::Pricing => 1.5,
            Intent::Negotiation => 1.0,
            Intent::Inquiry => 0.5,
            Intent::Complaint => -1.0,
        };
        let readiness = match self.readiness {
            Readiness::Hot => 1.5,
            Readiness::Warm => 0.5,
            Readiness::Cold => 0.0,
        };
        let sentiment = match self.sentiment {
            Sentiment::Positive => 0.5,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
            Sentiment::Hesitant => -0.3,
        };
        let delta: f64 = intent + readiness + sentiment;
        (delta * 10.0).round() / 10.0
    }

    /// Whether the team should be pulled in right now.
    pub fn alert(&self) -> bool {
        self.should_alert_team
            || self.readiness == Readiness::Hot
            || self.opportunity_score >= 80
            || self.sentiment == Sentiment::Negative
    }

    /// Opportunity score clamped to the declared 0-100 band.
    pub fn opportunity(&self) -> u8 {
        self.opportunity_score.min(100)
    }
}

const SYSTEM_PROMPT: &str = "You are a professional CRM sales agent for a \
digital marketing agency in Egypt. Reply in the customer's language \
(usually Egyptian Arabic). Understand what the customer wants, read the \
mood, and spot buying signals. Personalize the reply; never answer with a \
generic template. Respond with a single JSON object matching this schema:";

/// LLM-backed sales agent with a built-in fallback.
pub struct SalesAgent {
    client: Option<OpenAIClient>,
    model: String,
}

impl SalesAgent {
    pub fn new(client: Option<OpenAIClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Agent with no provider; every reply is the fallback template.
    pub fn offline() -> Self {
        Self {
            client: None,
            model: String::new(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a reply for an inbound message. Infallible: provider or
    /// parse trouble produces the fallback reply instead of an error.
    pub async fn reply(&self, lead: &Lead, history: &[Message], inbound: &str) -> AgentReply {
        let Some(client) = &self.client else {
            return fallback_reply(lead);
        };

        let schema = schemars::schema_for!(AgentReply);
        let system = format!(
            "{}\n{}",
            SYSTEM_PROMPT,
            serde_json::to_string(&schema).unwrap_or_default()
        );

        let mut request = ChatRequest::new(&self.model)
            .message(Message::system(system))
            .message(Message::system(lead_context(lead)))
            .temperature(0.7)
            .max_tokens(1000)
            .json_mode();
        request = request.messages(history.iter().cloned());
        request = request.message(Message::user(inbound));

        match client.chat_completion(request).await {
            Ok(response) => match parse_reply(&response.content) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(lead_id = %lead.id, error = %e, "Agent reply did not parse, using fallback");
                    fallback_reply(lead)
                }
            },
            Err(e) => {
                warn!(lead_id = %lead.id, error = %e, "Agent provider unreachable, using fallback");
                fallback_reply(lead)
            }
        }
    }
}

/// Bounded lead context for the model.
fn lead_context(lead: &Lead) -> String {
    let mut parts = vec![format!(
        "Customer: {}",
        lead.name.as_deref().unwrap_or("unknown")
    )];
    parts.push(format!("Source: {}", lead.source));
    if let Some(company) = &lead.company {
        parts.push(format!("Company: {company}"));
    }
    parts.push(format!("Lead score: {:.1}/5 ({})", lead.score, lead.quality));
    parts.join("\n")
}

/// Strict parse, tolerating a fenced code block around the JSON.
fn parse_reply(content: &str) -> Result<AgentReply, serde_json::Error> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    serde_json::from_str(body.trim())
}

/// Fixed reply used when the provider is down or unparsable. Flags the
/// conversation for manual review.
pub fn fallback_reply(lead: &Lead) -> AgentReply {
    let name = lead.name.as_deref().unwrap_or("عميلنا العزيز");
    AgentReply {
        response: format!("أهلاً {name}! شكراً لرسالتك. سيتواصل معك أحد ممثلينا في أقرب وقت."),
        intent: Intent::Inquiry,
        sentiment: Sentiment::Neutral,
        readiness: Readiness::Warm,
        opportunity_score: 50,
        recommended_action: Some("manual_review".to_string()),
        should_alert_team: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_lead() -> Lead {
        Lead {
            id: Uuid::now_v7(),
            phone: "01012345678".into(),
            name: Some("أحمد".into()),
            email: None,
            company: None,
            status: "new".into(),
            source: "whatsapp".into(),
            quality: "warm".into(),
            score: 2.5,
            notes: None,
            tags: vec![],
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_contact_at: None,
        }
    }

    #[test]
    fn parses_a_full_reply() {
        let reply = parse_reply(
            r#"{
                "response": "تمام، هبعتلك التفاصيل",
                "intent": "pricing",
                "sentiment": "positive",
                "readiness": "hot",
                "opportunity_score": 85,
                "recommended_action": "call_now",
                "should_alert_team": true
            }"#,
        )
        .unwrap();
        assert_eq!(reply.intent, Intent::Pricing);
        assert_eq!(reply.readiness, Readiness::Hot);
        assert!(reply.alert());
    }

    #[test]
    fn parses_a_fenced_reply() {
        let reply = parse_reply(
            "```json\n{\"response\":\"ok\",\"intent\":\"inquiry\",\"sentiment\":\"neutral\",\"readiness\":\"cold\",\"opportunity_score\":10}\n```",
        )
        .unwrap();
        assert_eq!(reply.intent, Intent::Inquiry);
        assert!(!reply.should_alert_team);
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let result = parse_reply(
            r#"{"response":"x","intent":"spam","sentiment":"neutral","readiness":"cold","opportunity_score":1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn score_delta_tables() {
        let reply = AgentReply {
            response: String::new(),
            intent: Intent::PurchaseIntent,
            sentiment: Sentiment::Positive,
            readiness: Readiness::Hot,
            opportunity_score: 90,
            recommended_action: None,
            should_alert_team: false,
        };
        assert_eq!(reply.score_delta(), 4.0);

        let complaint = AgentReply {
            intent: Intent::Complaint,
            sentiment: Sentiment::Negative,
            readiness: Readiness::Cold,
            ..reply
        };
        assert_eq!(complaint.score_delta(), -2.0);
    }

    #[test]
    fn alert_triggers_on_negative_sentiment() {
        let reply = AgentReply {
            response: String::new(),
            intent: Intent::Inquiry,
            sentiment: Sentiment::Negative,
            readiness: Readiness::Cold,
            opportunity_score: 10,
            recommended_action: None,
            should_alert_team: false,
        };
        assert!(reply.alert());
    }

    #[tokio::test]
    async fn offline_agent_falls_back_and_flags_review() {
        let agent = SalesAgent::offline();
        let lead = test_lead();
        let reply = agent.reply(&lead, &[], "عايز اشتري شقة").await;

        assert!(reply.response.contains("أحمد"));
        assert_eq!(reply.recommended_action.as_deref(), Some("manual_review"));
        assert!(reply.should_alert_team);
        assert_eq!(reply.score_delta(), 1.0);
    }
}
