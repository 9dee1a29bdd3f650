use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

/// Staff role, ordered from most to least privileged.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Agent,
    Viewer,
}

impl Role {
    /// Viewer accounts are read-only; everyone else can create leads,
    /// start hunts, and send messages.
    pub fn can_create(self) -> bool {
        !matches!(self, Role::Viewer)
    }

    /// Admin surfaces (admin chat, user listing).
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Agent => write!(f, "agent"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "agent" => Ok(Role::Agent),
            "viewer" => Ok(Role::Viewer),
            _ => Err(anyhow::anyhow!("invalid role: {}", s)),
        }
    }
}

/// A staff account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Viewer)
    }

    /// Constant-shape sha256 digest compare.
    pub fn verify_password(&self, password: &str) -> bool {
        password_digest(password) == self.password_digest
    }

    pub async fn find_by_username(username: &str, pool: &PgPool) -> Result<Option<Self>> {
        let user = sqlx::query_as::<_, Self>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        let users = sqlx::query_as::<_, Self>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    pub async fn create(
        username: &str,
        email: Option<String>,
        password: &str,
        role: Role,
        pool: &PgPool,
    ) -> Result<Self> {
        let user = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO users (username, email, password_digest, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_digest(password))
        .bind(role.to_string())
        .fetch_one(pool)
        .await?;
        Ok(user)
    }
}

/// Hex sha256 of the password.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex_sha256() {
        assert_eq!(
            password_digest("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }

    #[test]
    fn role_permissions() {
        assert!(Role::Agent.can_create());
        assert!(!Role::Viewer.can_create());
        assert!(Role::Owner.is_admin());
        assert!(!Role::Manager.is_admin());
    }

    #[test]
    fn role_round_trips() {
        for role in [Role::Owner, Role::Admin, Role::Manager, Role::Agent, Role::Viewer] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("root".parse::<Role>().is_err());
    }
}
