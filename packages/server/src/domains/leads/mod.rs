pub mod models;

pub use models::{Lead, LeadFilters, LeadQuality, LeadSource, LeadStatus, UpdateLead, UpsertLead};
