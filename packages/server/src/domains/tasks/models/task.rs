use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
            TaskPriority::Urgent => write!(f, "urgent"),
        }
    }
}

/// A follow-up item, optionally linked to a lead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub lead_id: Option<Uuid>,
    pub title: String,
    pub kind: String,
    pub description: Option<String>,
    pub priority: String,
    pub status: String,
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for task creation.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub lead_id: Option<Uuid>,
    pub title: String,
    pub kind: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_at: Option<DateTime<Utc>>,
}

impl Task {
    pub async fn create(input: CreateTask, pool: &PgPool) -> Result<Self> {
        let task = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tasks (id, lead_id, title, kind, description, priority, due_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(input.lead_id)
        .bind(&input.title)
        .bind(&input.kind)
        .bind(&input.description)
        .bind(input.priority.to_string())
        .bind(input.due_at)
        .fetch_one(pool)
        .await?;
        Ok(task)
    }

    /// The 24-hour follow-up scheduled for every new lead.
    pub async fn follow_up_for(lead_id: Uuid, lead_label: &str, pool: &PgPool) -> Result<Self> {
        Self::create(
            CreateTask {
                lead_id: Some(lead_id),
                title: format!("Follow up with {lead_label}"),
                kind: "follow_up".to_string(),
                description: Some("Initial follow-up after lead creation".to_string()),
                priority: TaskPriority::High,
                due_at: Some(Utc::now() + Duration::hours(24)),
            },
            pool,
        )
        .await
    }

    /// The 15-minute task raised when the agent flags a hot opportunity
    /// or negative sentiment.
    pub async fn urgent_for(
        lead_id: Uuid,
        lead_label: &str,
        reason: &str,
        priority: TaskPriority,
        pool: &PgPool,
    ) -> Result<Self> {
        Self::create(
            CreateTask {
                lead_id: Some(lead_id),
                title: format!("Urgent: {lead_label}"),
                kind: "urgent_follow_up".to_string(),
                description: Some(reason.to_string()),
                priority,
                due_at: Some(Utc::now() + Duration::minutes(15)),
            },
            pool,
        )
        .await
    }

    /// Pending tasks ordered by due time.
    pub async fn pending(pool: &PgPool) -> Result<Vec<Self>> {
        let tasks = sqlx::query_as::<_, Self>(
            "SELECT * FROM tasks WHERE status = 'pending' ORDER BY due_at ASC NULLS LAST",
        )
        .fetch_all(pool)
        .await?;
        Ok(tasks)
    }

    pub async fn count_pending(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE status = 'pending'")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Mark a task done. Returns `None` when the task is unknown.
    pub async fn complete(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let task = sqlx::query_as::<_, Self>(
            "UPDATE tasks SET status = 'done' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_strings() {
        assert_eq!(TaskPriority::Urgent.to_string(), "urgent");
        assert_eq!(TaskPriority::Medium.to_string(), "medium");
    }
}
