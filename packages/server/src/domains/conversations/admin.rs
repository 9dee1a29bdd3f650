//! Admin command interpretation.
//!
//! Maps free-text admin chat into a fixed action vocabulary and returns
//! the descriptor. Execution stays with the caller; this adapter never
//! touches the store. Without a provider (or on unparsable output) a
//! keyword matcher stands in, so the admin chat keeps working offline.

use openai_client::{ChatRequest, Message, OpenAIClient};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The fixed admin action vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminActionKind {
    ShowStats,
    AddUser,
    CreateCampaign,
    AnalyzeHunts,
    Unknown,
}

/// An interpreted admin command.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AdminAction {
    pub kind: AdminActionKind,
    /// Free-form argument extracted from the command (a username, a
    /// campaign name, ...).
    #[serde(default)]
    pub argument: Option<String>,
    /// Short human-readable restatement of what was understood.
    pub summary: String,
}

const SYSTEM_PROMPT: &str = "You map admin commands for a CRM (Arabic or \
English) onto a fixed action vocabulary. Respond with a single JSON object \
matching this schema:";

/// LLM-backed admin command interpreter with a keyword fallback.
pub struct AdminAgent {
    client: Option<OpenAIClient>,
    model: String,
}

impl AdminAgent {
    pub fn new(client: Option<OpenAIClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn offline() -> Self {
        Self {
            client: None,
            model: String::new(),
        }
    }

    /// Interpret a free-text command into an action descriptor.
    pub async fn interpret(&self, command: &str) -> AdminAction {
        let Some(client) = &self.client else {
            return keyword_action(command);
        };

        let schema = schemars::schema_for!(AdminAction);
        let system = format!(
            "{}\n{}",
            SYSTEM_PROMPT,
            serde_json::to_string(&schema).unwrap_or_default()
        );

        let request = ChatRequest::new(&self.model)
            .message(Message::system(system))
            .message(Message::user(command))
            .temperature(0.0)
            .max_tokens(300)
            .json_mode();

        match client.chat_completion(request).await {
            Ok(response) => match serde_json::from_str::<AdminAction>(response.content.trim()) {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, "Admin action did not parse, using keyword matcher");
                    keyword_action(command)
                }
            },
            Err(e) => {
                warn!(error = %e, "Admin provider unreachable, using keyword matcher");
                keyword_action(command)
            }
        }
    }
}

/// Keyword-rule interpretation, Arabic and English.
fn keyword_action(command: &str) -> AdminAction {
    let lowered = command.to_lowercase();

    let kind = if contains_any(&lowered, &["إحصائيات", "احصائيات", "stats", "dashboard"]) {
        AdminActionKind::ShowStats
    } else if contains_any(&lowered, &["مستخدم", "add user", "new user"]) {
        AdminActionKind::AddUser
    } else if contains_any(&lowered, &["حملة", "campaign"]) {
        AdminActionKind::CreateCampaign
    } else if contains_any(&lowered, &["بحث", "أداء", "hunt", "search performance"]) {
        AdminActionKind::AnalyzeHunts
    } else {
        AdminActionKind::Unknown
    };

    AdminAction {
        kind,
        argument: None,
        summary: command.trim().to_string(),
    }
}

fn contains_any(lowered: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| lowered.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_agent_matches_arabic_stats_command() {
        let agent = AdminAgent::offline();
        let action = agent.interpret("اعرض إحصائيات العملاء الجدد اليوم").await;
        assert_eq!(action.kind, AdminActionKind::ShowStats);
    }

    #[tokio::test]
    async fn offline_agent_matches_campaign_and_hunt_commands() {
        let agent = AdminAgent::offline();
        assert_eq!(
            agent.interpret("أنشئ حملة واتساب للعملاء الممتازين").await.kind,
            AdminActionKind::CreateCampaign
        );
        assert_eq!(
            agent.interpret("analyze hunt results for last week").await.kind,
            AdminActionKind::AnalyzeHunts
        );
    }

    #[tokio::test]
    async fn unmatched_commands_are_unknown() {
        let agent = AdminAgent::offline();
        let action = agent.interpret("صباح الخير").await;
        assert_eq!(action.kind, AdminActionKind::Unknown);
        assert_eq!(action.summary, "صباح الخير");
    }

    #[test]
    fn action_deserializes_from_model_output() {
        let action: AdminAction = serde_json::from_str(
            r#"{"kind": "add_user", "argument": "ahmed", "summary": "add user ahmed"}"#,
        )
        .unwrap();
        assert_eq!(action.kind, AdminActionKind::AddUser);
        assert_eq!(action.argument.as_deref(), Some("ahmed"));
    }
}
