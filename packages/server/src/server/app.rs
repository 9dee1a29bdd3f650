//! Application setup and router construction.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use openai_client::OpenAIClient;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use whatsapp_client::{WhatsAppOptions, WhatsAppService};

use crate::config::Config;
use crate::domains::auth::JwtService;
use crate::domains::conversations::{AdminAgent, ConversationMemory, SalesAgent};
use crate::domains::crm::CrmService;
use crate::domains::hunts::HuntService;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub jwt_service: Arc<JwtService>,
    pub crm: Arc<CrmService>,
    pub hunts: Arc<HuntService>,
    pub admin_agent: Arc<AdminAgent>,
}

/// Build the Axum application router and its shared state.
pub fn build_app(pool: PgPool, config: Config) -> Router {
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let whatsapp = match (&config.whatsapp_api_key, &config.whatsapp_phone_number_id) {
        (Some(api_key), Some(phone_number_id)) => WhatsAppService::new(WhatsAppOptions {
            api_key: api_key.clone(),
            phone_number_id: phone_number_id.clone(),
        }),
        _ => {
            tracing::warn!("WhatsApp credentials missing; outbound messages disabled");
            WhatsAppService::unconfigured()
        }
    };

    let openai = config
        .openai_api_key
        .as_ref()
        .map(|key| OpenAIClient::new(key.clone()));
    if openai.is_none() {
        tracing::warn!("OPENAI_API_KEY missing; agent replies fall back to templates");
    }

    let sales_agent = Arc::new(SalesAgent::new(openai.clone(), config.openai_model.clone()));
    let admin_agent = Arc::new(AdminAgent::new(openai, config.openai_model.clone()));
    let memory = Arc::new(ConversationMemory::new());

    let crm = Arc::new(CrmService::new(
        pool.clone(),
        whatsapp,
        sales_agent,
        memory,
    ));
    let hunts = Arc::new(HuntService::new(
        pool.clone(),
        config.serper_api_keys.clone(),
    ));

    let state = AppState {
        db_pool: pool,
        config: Arc::new(config),
        jwt_service,
        crm,
        hunts,
        admin_agent,
    };

    let cors = build_cors_layer(&state.config.allowed_origins);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/auth/login", post(routes::login))
        .route("/api/leads", post(routes::create_lead).get(routes::search_leads))
        .route("/api/leads/:id", get(routes::get_lead).put(routes::update_lead))
        .route("/api/leads/:id/message", post(routes::handle_lead_message))
        .route("/api/leads/:id/send", post(routes::send_lead_message))
        .route("/api/hunts", post(routes::start_hunt).get(routes::list_hunts))
        .route("/api/hunts/:id", get(routes::get_hunt))
        .route("/api/tasks", get(routes::list_tasks))
        .route("/api/tasks/:id/complete", put(routes::complete_task))
        .route("/api/dashboard", get(routes::dashboard))
        .route("/api/admin/chat", post(routes::admin_chat))
        .route("/api/admin/users", get(routes::list_users))
        .route("/api/tools/extract", post(routes::extract_from_text))
        .route(
            "/api/whatsapp/webhook",
            get(routes::webhook_verify).post(routes::webhook_receive),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origins; falls back to permissive when no
/// origin parses (development).
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if parsed.is_empty() {
        tracing::warn!("No valid CORS origins configured; allowing all origins");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}
