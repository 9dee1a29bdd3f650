pub mod scoring;
pub mod service;

pub use scoring::{initial_score, ScoreInputs};
pub use service::{
    CreateLeadInput, CrmService, DashboardStats, LeadDetails, MessageOutcome,
};
