pub mod models;
pub mod service;

pub use models::{Hunt, HuntStatus};
pub use service::{HuntService, PgLeadSink, SerperSearcher};
