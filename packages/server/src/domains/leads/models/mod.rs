pub mod lead;

pub use lead::{
    clamp_score, Lead, LeadFilters, LeadQuality, LeadSource, LeadStatus, UpdateLead, UpsertLead,
};
