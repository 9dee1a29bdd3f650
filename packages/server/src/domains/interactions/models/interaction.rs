use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Interaction channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Call,
    Email,
    Whatsapp,
    Meeting,
    Note,
    Sms,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Call => write!(f, "call"),
            InteractionKind::Email => write!(f, "email"),
            InteractionKind::Whatsapp => write!(f, "whatsapp"),
            InteractionKind::Meeting => write!(f, "meeting"),
            InteractionKind::Note => write!(f, "note"),
            InteractionKind::Sms => write!(f, "sms"),
        }
    }
}

impl std::str::FromStr for InteractionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "call" => Ok(InteractionKind::Call),
            "email" => Ok(InteractionKind::Email),
            "whatsapp" => Ok(InteractionKind::Whatsapp),
            "meeting" => Ok(InteractionKind::Meeting),
            "note" => Ok(InteractionKind::Note),
            "sms" => Ok(InteractionKind::Sms),
            _ => Err(anyhow::anyhow!("invalid interaction kind: {}", s)),
        }
    }
}

/// Message direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
        }
    }
}

/// One touch point with a lead. Append-only; rows are never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Interaction {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub kind: String,
    pub direction: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    /// Append an interaction and stamp the lead's last contact in the
    /// same transaction.
    pub async fn create(
        lead_id: Uuid,
        kind: InteractionKind,
        direction: Direction,
        description: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        let mut tx = pool.begin().await?;

        let interaction = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO interactions (id, lead_id, kind, direction, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(lead_id)
        .bind(kind.to_string())
        .bind(direction.to_string())
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE leads SET last_contact_at = NOW() WHERE id = $1")
            .bind(lead_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(interaction)
    }

    /// Most recent interactions for a lead, newest first.
    pub async fn recent(lead_id: Uuid, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let interactions = sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM interactions
            WHERE lead_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(lead_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in [
            InteractionKind::Call,
            InteractionKind::Email,
            InteractionKind::Whatsapp,
            InteractionKind::Meeting,
            InteractionKind::Note,
            InteractionKind::Sms,
        ] {
            assert_eq!(kind.to_string().parse::<InteractionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn direction_strings() {
        assert_eq!(Direction::Inbound.to_string(), "inbound");
        assert_eq!(Direction::Outbound.to_string(), "outbound");
    }
}
