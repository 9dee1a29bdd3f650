//! Buyer-intent lead scanning library.
//!
//! Everything between "a staff member typed an intent and a city" and
//! "qualified phone numbers landed in the store" lives here: phone
//! extraction, snippet classification, outbound pacing with key
//! rotation, city expansion, query generation, and the sequential hunt
//! loop. The library stays mechanical; which search provider to call
//! and where leads persist are the app's decisions, injected through
//! the [`LeadSearcher`] and [`LeadSink`] traits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use leadscan::{run_hunt, HuntMode, HuntPlan, Pacer, PacerConfig};
//!
//! let pacer = Arc::new(Pacer::new(PacerConfig::default(), api_keys));
//! let plan = HuntPlan {
//!     intent: "شقة في التجمع".into(),
//!     city: "القاهرة".into(),
//!     user_id,
//!     mode: HuntMode::Standard,
//! };
//!
//! let summary = run_hunt(hunt_id, &plan, &searcher, &sink, &pacer).await?;
//! println!("{} leads from {} results", summary.leads_found, summary.results_scanned);
//! ```

pub mod classify;
pub mod error;
pub mod geo;
pub mod hunt;
pub mod pacing;
pub mod phones;
pub mod queries;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use classify::{classify, Tier};
pub use error::{Result, ScanError, SearchError, SinkError};
pub use geo::expand_city;
pub use hunt::run_hunt;
pub use pacing::{Pacer, PacerConfig, Permit};
pub use phones::{extract_phones, is_valid_phone, normalize_phone};
pub use queries::build_queries;
pub use traits::{LeadSearcher, LeadSink};
pub use types::{HuntMode, HuntPlan, HuntSummary, LeadCandidate, SearchHit};
