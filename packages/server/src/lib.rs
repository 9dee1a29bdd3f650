//! Lead Hunter CRM backend.
//!
//! Scans search results for buyer-intent phone numbers, stores them as
//! leads, scores and classifies them, messages them over WhatsApp, and
//! layers an LLM agent on top for customer conversation and admin
//! commands.
//!
//! - [`domains`] - models and services per business area
//! - [`server`] - axum router, middleware, and route handlers
//! - [`common`] - shared error type and helpers
//! - [`config`] - environment configuration

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::Config;
pub use server::{build_app, AppState};
