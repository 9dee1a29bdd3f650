pub mod user;

pub use user::{password_digest, Role, User};
