//! Domain modules: models and services per business area.

pub mod auth;
pub mod conversations;
pub mod crm;
pub mod hunts;
pub mod interactions;
pub mod leads;
pub mod tasks;
