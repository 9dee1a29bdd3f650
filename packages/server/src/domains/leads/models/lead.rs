use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Lead lifecycle status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Negotiating,
    Won,
    Lost,
    Nurturing,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::New => write!(f, "new"),
            LeadStatus::Contacted => write!(f, "contacted"),
            LeadStatus::Qualified => write!(f, "qualified"),
            LeadStatus::Negotiating => write!(f, "negotiating"),
            LeadStatus::Won => write!(f, "won"),
            LeadStatus::Lost => write!(f, "lost"),
            LeadStatus::Nurturing => write!(f, "nurturing"),
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "negotiating" => Ok(LeadStatus::Negotiating),
            "won" => Ok(LeadStatus::Won),
            "lost" => Ok(LeadStatus::Lost),
            "nurturing" => Ok(LeadStatus::Nurturing),
            _ => Err(anyhow::anyhow!("invalid lead status: {}", s)),
        }
    }
}

/// Acquisition channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    FacebookAd,
    InstagramAd,
    GoogleAd,
    TiktokAd,
    LinkedinAd,
    OrganicSearch,
    SocialMedia,
    Referral,
    Website,
    Whatsapp,
    Hunt,
    Manual,
    Other,
}

impl LeadSource {
    /// Channels that historically convert well; they seed a higher
    /// initial score.
    pub fn is_high_quality(self) -> bool {
        matches!(
            self,
            LeadSource::FacebookAd
                | LeadSource::GoogleAd
                | LeadSource::LinkedinAd
                | LeadSource::Referral
        )
    }
}

impl std::fmt::Display for LeadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadSource::FacebookAd => write!(f, "facebook_ad"),
            LeadSource::InstagramAd => write!(f, "instagram_ad"),
            LeadSource::GoogleAd => write!(f, "google_ad"),
            LeadSource::TiktokAd => write!(f, "tiktok_ad"),
            LeadSource::LinkedinAd => write!(f, "linkedin_ad"),
            LeadSource::OrganicSearch => write!(f, "organic_search"),
            LeadSource::SocialMedia => write!(f, "social_media"),
            LeadSource::Referral => write!(f, "referral"),
            LeadSource::Website => write!(f, "website"),
            LeadSource::Whatsapp => write!(f, "whatsapp"),
            LeadSource::Hunt => write!(f, "hunt"),
            LeadSource::Manual => write!(f, "manual"),
            LeadSource::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for LeadSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "facebook_ad" => Ok(LeadSource::FacebookAd),
            "instagram_ad" => Ok(LeadSource::InstagramAd),
            "google_ad" => Ok(LeadSource::GoogleAd),
            "tiktok_ad" => Ok(LeadSource::TiktokAd),
            "linkedin_ad" => Ok(LeadSource::LinkedinAd),
            "organic_search" => Ok(LeadSource::OrganicSearch),
            "social_media" => Ok(LeadSource::SocialMedia),
            "referral" => Ok(LeadSource::Referral),
            "website" => Ok(LeadSource::Website),
            "whatsapp" => Ok(LeadSource::Whatsapp),
            "hunt" => Ok(LeadSource::Hunt),
            "manual" => Ok(LeadSource::Manual),
            "other" => Ok(LeadSource::Other),
            _ => Err(anyhow::anyhow!("invalid lead source: {}", s)),
        }
    }
}

/// Score-derived temperature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadQuality {
    Hot,
    Warm,
    Cold,
}

impl LeadQuality {
    /// Derive the quality band from a score in [0, 5].
    pub fn for_score(score: f64) -> Self {
        if score >= 4.0 {
            LeadQuality::Hot
        } else if score >= 2.5 {
            LeadQuality::Warm
        } else {
            LeadQuality::Cold
        }
    }
}

impl std::fmt::Display for LeadQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadQuality::Hot => write!(f, "hot"),
            LeadQuality::Warm => write!(f, "warm"),
            LeadQuality::Cold => write!(f, "cold"),
        }
    }
}

/// Clamp a score into the valid [0, 5] band, rounded to one decimal.
pub fn clamp_score(score: f64) -> f64 {
    (score.clamp(0.0, 5.0) * 10.0).round() / 10.0
}

/// A prospective customer, keyed by normalized phone number.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lead {
    pub id: Uuid,
    /// Normalized 11-digit number; the natural de-duplication key.
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub source: String,
    pub quality: String,
    pub score: f64,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_contact_at: Option<DateTime<Utc>>,
}

/// Input for the phone-keyed upsert.
#[derive(Debug, Clone)]
pub struct UpsertLead {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub source: LeadSource,
    pub score: f64,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_by: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
    pub score: Option<f64>,
}

/// Search filters for `Lead::search`.
#[derive(Debug, Clone, Default)]
pub struct LeadFilters {
    pub status: Option<Vec<String>>,
    pub source: Option<Vec<String>>,
    /// Substring over name, email and phone.
    pub search: Option<String>,
}

impl Lead {
    pub async fn find_by_id(id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, Self>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(lead)
    }

    pub async fn find_by_phone(phone: &str, pool: &PgPool) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, Self>("SELECT * FROM leads WHERE phone = $1")
            .bind(phone)
            .fetch_optional(pool)
            .await?;
        Ok(lead)
    }

    /// Insert or refresh by phone. Re-discovery of a known number
    /// updates the record in place; optional fields only overwrite when
    /// the new value is present, tags merge, and the pipeline status is
    /// left alone.
    pub async fn upsert(input: UpsertLead, pool: &PgPool) -> Result<Self> {
        let quality = LeadQuality::for_score(input.score);
        let lead = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO leads (
                id, phone, name, email, company, source, quality, score,
                notes, tags, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (phone) DO UPDATE SET
                name = COALESCE(EXCLUDED.name, leads.name),
                email = COALESCE(EXCLUDED.email, leads.email),
                company = COALESCE(EXCLUDED.company, leads.company),
                source = EXCLUDED.source,
                quality = EXCLUDED.quality,
                score = EXCLUDED.score,
                notes = COALESCE(EXCLUDED.notes, leads.notes),
                tags = ARRAY(SELECT DISTINCT t FROM unnest(leads.tags || EXCLUDED.tags) AS t),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.phone)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.company)
        .bind(input.source.to_string())
        .bind(quality.to_string())
        .bind(clamp_score(input.score))
        .bind(&input.notes)
        .bind(&input.tags)
        .bind(input.created_by)
        .fetch_one(pool)
        .await?;
        Ok(lead)
    }

    /// Apply a partial update. Returns `None` when the lead is unknown.
    pub async fn update(id: Uuid, updates: UpdateLead, pool: &PgPool) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, Self>(
            r#"
            UPDATE leads SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                company = COALESCE($4, company),
                status = COALESCE($5, status),
                notes = COALESCE($6, notes),
                score = COALESCE($7, score),
                quality = CASE
                    WHEN COALESCE($7, score) >= 4.0 THEN 'hot'
                    WHEN COALESCE($7, score) >= 2.5 THEN 'warm'
                    ELSE 'cold'
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(updates.name)
        .bind(updates.email)
        .bind(updates.company)
        .bind(updates.status.map(|s| s.to_string()))
        .bind(updates.notes)
        .bind(updates.score.map(clamp_score))
        .fetch_optional(pool)
        .await?;
        Ok(lead)
    }

    /// Shift the score by `delta`, clamped to [0, 5], refreshing the
    /// quality band and the last-contact stamp in the same statement.
    pub async fn adjust_score(id: Uuid, delta: f64, pool: &PgPool) -> Result<Option<Self>> {
        let lead = sqlx::query_as::<_, Self>(
            r#"
            UPDATE leads SET
                score = ROUND(LEAST(5.0, GREATEST(0.0, (score + $2)::numeric)), 1)::float8,
                quality = CASE
                    WHEN score + $2 >= 4.0 THEN 'hot'
                    WHEN score + $2 >= 2.5 THEN 'warm'
                    ELSE 'cold'
                END,
                last_contact_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(pool)
        .await?;
        Ok(lead)
    }

    /// Filtered, paginated search ordered by newest first.
    pub async fn search(
        filters: &LeadFilters,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM leads WHERE 1=1");

        if let Some(statuses) = &filters.status {
            qb.push(" AND status = ANY(");
            qb.push_bind(statuses.clone());
            qb.push(")");
        }
        if let Some(sources) = &filters.source {
            qb.push(" AND source = ANY(");
            qb.push_bind(sources.clone());
            qb.push(")");
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", search);
            qb.push(" AND (name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR email ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR phone LIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let leads = qb.build_query_as::<Self>().fetch_all(pool).await?;
        Ok(leads)
    }

    pub async fn count_total(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_new_today(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM leads WHERE created_at::date = CURRENT_DATE")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    pub async fn count_by_quality(quality: LeadQuality, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads WHERE quality = $1")
            .bind(quality.to_string())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(status: LeadStatus, pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leads WHERE status = $1")
            .bind(status.to_string())
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Per-status lead counts for the dashboard.
    pub async fn status_distribution(pool: &PgPool) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM leads GROUP BY status")
                .fetch_all(pool)
                .await?;
        Ok(rows)
    }

    /// Per-source lead counts for the dashboard.
    pub async fn source_distribution(pool: &PgPool) -> Result<Vec<(String, i64)>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT source, COUNT(*) FROM leads GROUP BY source")
                .fetch_all(pool)
                .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_bands_follow_thresholds() {
        assert_eq!(LeadQuality::for_score(4.0), LeadQuality::Hot);
        assert_eq!(LeadQuality::for_score(3.9), LeadQuality::Warm);
        assert_eq!(LeadQuality::for_score(2.5), LeadQuality::Warm);
        assert_eq!(LeadQuality::for_score(2.4), LeadQuality::Cold);
        assert_eq!(LeadQuality::for_score(0.0), LeadQuality::Cold);
    }

    #[test]
    fn clamp_score_bounds_and_rounds() {
        assert_eq!(clamp_score(7.3), 5.0);
        assert_eq!(clamp_score(-1.0), 0.0);
        assert_eq!(clamp_score(3.14), 3.1);
        assert_eq!(clamp_score(3.06), 3.1);
    }

    #[test]
    fn status_round_trips() {
        for status in [
            LeadStatus::New,
            LeadStatus::Contacted,
            LeadStatus::Qualified,
            LeadStatus::Negotiating,
            LeadStatus::Won,
            LeadStatus::Lost,
            LeadStatus::Nurturing,
        ] {
            assert_eq!(status.to_string().parse::<LeadStatus>().unwrap(), status);
        }
        assert!("archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn source_round_trips_and_ranks() {
        assert_eq!("hunt".parse::<LeadSource>().unwrap(), LeadSource::Hunt);
        assert!(LeadSource::Referral.is_high_quality());
        assert!(!LeadSource::Whatsapp.is_high_quality());
    }
}
