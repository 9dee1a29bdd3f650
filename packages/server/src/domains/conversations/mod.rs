pub mod admin;
pub mod agent;
pub mod memory;
pub mod models;

pub use admin::{AdminAction, AdminActionKind, AdminAgent};
pub use agent::{AgentReply, Intent, Readiness, SalesAgent, Sentiment};
pub use memory::{ConversationMemory, TrendReport, TurnNote};
pub use models::ConversationTurn;
