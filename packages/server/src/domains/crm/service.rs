//! The CRM service: lead lifecycle, the incoming-message pipeline, and
//! dashboard aggregation. Every operation returns a structured result;
//! downstream provider failures are caught here and either worked
//! around or surfaced with a reason.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use openai_client::Message;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use whatsapp_client::WhatsAppService;

use super::scoring::{initial_score, ScoreInputs};
use crate::common::{ApiError, ApiResult};
use crate::domains::conversations::{
    ConversationMemory, ConversationTurn, SalesAgent, TrendReport, TurnNote,
};
use crate::domains::interactions::{Direction, Interaction, InteractionKind};
use crate::domains::leads::models::{
    Lead, LeadFilters, LeadQuality, LeadSource, LeadStatus, UpdateLead, UpsertLead,
};
use crate::domains::tasks::{Task, TaskPriority};

/// Request body for lead creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLeadInput {
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub source: Option<LeadSource>,
    pub notes: Option<String>,
}

/// A lead with its recent history and conversation trajectory.
#[derive(Debug, Serialize)]
pub struct LeadDetails {
    pub lead: Lead,
    pub interactions: Vec<Interaction>,
    pub conversation_trend: TrendReport,
}

/// Outcome of the incoming-message pipeline.
#[derive(Debug, Serialize)]
pub struct MessageOutcome {
    pub response: String,
    pub intent: String,
    pub sentiment: String,
    pub readiness: String,
    pub opportunity_score: u8,
    pub lead_score: f64,
    pub lead_quality: String,
    pub should_alert_team: bool,
}

/// Dashboard aggregates.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_leads: i64,
    pub new_leads_today: i64,
    pub hot_leads: i64,
    pub total_conversions: i64,
    pub avg_conversion_rate: f64,
    pub pending_tasks: i64,
    pub total_hunts: i64,
    pub leads_by_status: BTreeMap<String, i64>,
    pub leads_by_source: BTreeMap<String, i64>,
}

pub struct CrmService {
    pool: PgPool,
    whatsapp: WhatsAppService,
    agent: Arc<SalesAgent>,
    memory: Arc<ConversationMemory>,
    /// Auto-reply to inbound WhatsApp messages with the agent's answer.
    auto_respond: bool,
}

impl CrmService {
    pub fn new(
        pool: PgPool,
        whatsapp: WhatsAppService,
        agent: Arc<SalesAgent>,
        memory: Arc<ConversationMemory>,
    ) -> Self {
        Self {
            pool,
            whatsapp,
            agent,
            memory,
            auto_respond: true,
        }
    }

    pub fn without_auto_respond(mut self) -> Self {
        self.auto_respond = false;
        self
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Create (or refresh) a lead: validate the phone, compute the
    /// initial score, persist, schedule the 24h follow-up, and send a
    /// welcome message. A failed welcome send is logged, never fatal.
    pub async fn create_lead(&self, input: CreateLeadInput, user_id: Uuid) -> ApiResult<Lead> {
        let phone = leadscan::normalize_phone(&input.phone).ok_or_else(|| {
            ApiError::Validation("phone must be a valid 11-digit Egyptian mobile number".into())
        })?;
        if let Some(email) = &input.email {
            if !email.contains('@') || !email.contains('.') {
                return Err(ApiError::Validation("email is not valid".into()));
            }
        }

        let source = input.source.unwrap_or(LeadSource::Manual);
        let score = initial_score(ScoreInputs {
            name: input.name.as_deref(),
            email: input.email.as_deref(),
            company: input.company.as_deref(),
            source,
        });

        let lead = Lead::upsert(
            UpsertLead {
                phone,
                name: input.name.clone(),
                email: input.email,
                company: input.company,
                source,
                score,
                notes: input.notes,
                tags: Vec::new(),
                created_by: Some(user_id),
            },
            &self.pool,
        )
        .await
        .map_err(ApiError::Internal)?;

        let label = lead.name.clone().unwrap_or_else(|| lead.phone.clone());
        Task::follow_up_for(lead.id, &label, &self.pool)
            .await
            .map_err(ApiError::Internal)?;

        if let Err(e) = self
            .whatsapp
            .send_text(
                &lead.phone,
                &format!("أهلاً {label}! شكراً لتواصلك معنا، فريقنا هيرجع لك في أقرب وقت."),
            )
            .await
        {
            warn!(lead_id = %lead.id, error = %e, "Welcome message not sent");
        }

        info!(lead_id = %lead.id, score = lead.score, quality = %lead.quality, "Lead created");
        Ok(lead)
    }

    pub async fn get_lead(&self, id: Uuid) -> ApiResult<LeadDetails> {
        let lead = Lead::find_by_id(id, &self.pool)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound("lead"))?;
        let interactions = Interaction::recent(id, 50, &self.pool)
            .await
            .map_err(ApiError::Internal)?;
        let conversation_trend = self.memory.trend(id, 7);
        Ok(LeadDetails {
            lead,
            interactions,
            conversation_trend,
        })
    }

    pub async fn update_lead(&self, id: Uuid, updates: UpdateLead) -> ApiResult<Lead> {
        Lead::update(id, updates, &self.pool)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound("lead"))
    }

    pub async fn search_leads(
        &self,
        filters: LeadFilters,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Vec<Lead>> {
        let limit = limit.clamp(1, 100);
        let offset = offset.max(0);
        Lead::search(&filters, limit, offset, &self.pool)
            .await
            .map_err(ApiError::Internal)
    }

    /// The incoming-message pipeline: agent reply, both interactions
    /// persisted, score delta applied (clamped), optional WhatsApp
    /// auto-reply, urgent task on alert, and the turn appended to the
    /// audit trail and the memory cache.
    pub async fn handle_incoming_message(
        &self,
        lead_id: Uuid,
        message: &str,
        channel: InteractionKind,
    ) -> ApiResult<MessageOutcome> {
        if message.trim().is_empty() {
            return Err(ApiError::Validation("message must not be empty".into()));
        }

        let lead = Lead::find_by_id(lead_id, &self.pool)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound("lead"))?;

        // Last 10 interactions, oldest first, as chat history.
        let mut history_rows = Interaction::recent(lead_id, 10, &self.pool)
            .await
            .map_err(ApiError::Internal)?;
        history_rows.reverse();
        let history: Vec<Message> = history_rows
            .iter()
            .map(|i| {
                if i.direction == Direction::Inbound.to_string() {
                    Message::user(i.description.clone())
                } else {
                    Message::assistant(i.description.clone())
                }
            })
            .collect();

        let reply = self.agent.reply(&lead, &history, message).await;

        Interaction::create(lead_id, channel, Direction::Inbound, message, &self.pool)
            .await
            .map_err(ApiError::Internal)?;
        Interaction::create(
            lead_id,
            channel,
            Direction::Outbound,
            &reply.response,
            &self.pool,
        )
        .await
        .map_err(ApiError::Internal)?;

        let updated = Lead::adjust_score(lead_id, reply.score_delta(), &self.pool)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound("lead"))?;

        if channel == InteractionKind::Whatsapp && self.auto_respond {
            if let Err(e) = self.whatsapp.send_text(&updated.phone, &reply.response).await {
                warn!(lead_id = %lead_id, error = %e, "Auto-reply not sent");
            }
        }

        if reply.alert() {
            let label = updated.name.clone().unwrap_or_else(|| updated.phone.clone());
            let reason = reply
                .recommended_action
                .clone()
                .unwrap_or_else(|| "hot opportunity detected".to_string());
            let priority = if reply.readiness == crate::domains::conversations::Readiness::Hot {
                TaskPriority::Urgent
            } else {
                TaskPriority::High
            };
            Task::urgent_for(lead_id, &label, &reason, priority, &self.pool)
                .await
                .map_err(ApiError::Internal)?;
        }

        ConversationTurn::create(
            lead_id,
            message,
            &reply.response,
            reply.intent.as_str(),
            reply.sentiment.as_str(),
            reply.readiness.as_str(),
            reply.opportunity() as i32,
            &self.pool,
        )
        .await
        .map_err(ApiError::Internal)?;

        self.memory.push(
            lead_id,
            TurnNote {
                at: Utc::now(),
                sentiment: reply.sentiment,
                opportunity_score: reply.opportunity(),
            },
        );

        Ok(MessageOutcome {
            response: reply.response.clone(),
            intent: reply.intent.as_str().to_string(),
            sentiment: reply.sentiment.as_str().to_string(),
            readiness: reply.readiness.as_str().to_string(),
            opportunity_score: reply.opportunity(),
            lead_score: updated.score,
            lead_quality: updated.quality.clone(),
            should_alert_team: reply.alert(),
        })
    }

    /// Outbound message to a lead, recorded as an interaction. Fails
    /// with a provider error when WhatsApp rejects the send.
    pub async fn send_message(&self, lead_id: Uuid, message: &str) -> ApiResult<()> {
        if message.trim().is_empty() {
            return Err(ApiError::Validation("message must not be empty".into()));
        }
        let lead = Lead::find_by_id(lead_id, &self.pool)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::NotFound("lead"))?;

        self.whatsapp
            .send_text(&lead.phone, message)
            .await
            .map_err(|e| ApiError::Provider(e.to_string()))?;

        Interaction::create(
            lead_id,
            InteractionKind::Whatsapp,
            Direction::Outbound,
            message,
            &self.pool,
        )
        .await
        .map_err(ApiError::Internal)?;
        Ok(())
    }

    /// Resolve an inbound WhatsApp sender to a lead, creating a
    /// whatsapp-source lead for unknown numbers.
    pub async fn resolve_inbound_lead(&self, phone: &str, name: Option<&str>) -> ApiResult<Lead> {
        let normalized = leadscan::normalize_phone(phone)
            .ok_or_else(|| ApiError::Validation("unrecognized sender phone".into()))?;

        if let Some(lead) = Lead::find_by_phone(&normalized, &self.pool)
            .await
            .map_err(ApiError::Internal)?
        {
            return Ok(lead);
        }

        let score = initial_score(ScoreInputs {
            name,
            email: None,
            company: None,
            source: LeadSource::Whatsapp,
        });
        Lead::upsert(
            UpsertLead {
                phone: normalized,
                name: name.map(|n| n.to_string()),
                email: None,
                company: None,
                source: LeadSource::Whatsapp,
                score,
                notes: None,
                tags: Vec::new(),
                created_by: None,
            },
            &self.pool,
        )
        .await
        .map_err(ApiError::Internal)
    }

    pub async fn dashboard(&self) -> ApiResult<DashboardStats> {
        use crate::domains::hunts::Hunt;

        let total_leads = Lead::count_total(&self.pool).await.map_err(ApiError::Internal)?;
        let new_leads_today = Lead::count_new_today(&self.pool)
            .await
            .map_err(ApiError::Internal)?;
        let hot_leads = Lead::count_by_quality(LeadQuality::Hot, &self.pool)
            .await
            .map_err(ApiError::Internal)?;
        let total_conversions = Lead::count_by_status(LeadStatus::Won, &self.pool)
            .await
            .map_err(ApiError::Internal)?;
        let pending_tasks = Task::count_pending(&self.pool)
            .await
            .map_err(ApiError::Internal)?;
        let total_hunts = Hunt::count_total(&self.pool).await.map_err(ApiError::Internal)?;

        let leads_by_status = Lead::status_distribution(&self.pool)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .collect();
        let leads_by_source = Lead::source_distribution(&self.pool)
            .await
            .map_err(ApiError::Internal)?
            .into_iter()
            .collect();

        let avg_conversion_rate = if total_leads > 0 {
            let rate = total_conversions as f64 / total_leads as f64 * 100.0;
            (rate * 100.0).round() / 100.0
        } else {
            0.0
        };

        Ok(DashboardStats {
            total_leads,
            new_leads_today,
            hot_leads,
            total_conversions,
            avg_conversion_rate,
            pending_tasks,
            total_hunts,
            leads_by_status,
            leads_by_source,
        })
    }

    pub async fn pending_tasks(&self) -> ApiResult<Vec<Task>> {
        Task::pending(&self.pool).await.map_err(ApiError::Internal)
    }
}
