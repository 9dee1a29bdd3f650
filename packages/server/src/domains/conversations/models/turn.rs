use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// One agent exchange with a lead: the inbound message, the generated
/// reply, and the derived tags. Append-only audit trail; the recent
/// turns also feed the next model call as context.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationTurn {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub inbound: String,
    pub reply: String,
    pub intent: Option<String>,
    pub sentiment: Option<String>,
    pub readiness: Option<String>,
    pub opportunity_score: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        lead_id: Uuid,
        inbound: &str,
        reply: &str,
        intent: &str,
        sentiment: &str,
        readiness: &str,
        opportunity_score: i32,
        pool: &PgPool,
    ) -> Result<Self> {
        let turn = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO conversation_turns (
                id, lead_id, inbound, reply, intent, sentiment, readiness, opportunity_score
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(lead_id)
        .bind(inbound)
        .bind(reply)
        .bind(intent)
        .bind(sentiment)
        .bind(readiness)
        .bind(opportunity_score)
        .fetch_one(pool)
        .await?;
        Ok(turn)
    }

    /// Most recent turns for a lead, newest first.
    pub async fn recent(lead_id: Uuid, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let turns = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM conversation_turns
            WHERE lead_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(lead_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(turns)
    }
}
