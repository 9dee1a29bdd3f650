pub mod jwt;
pub mod models;

pub use jwt::{Claims, JwtService};
pub use models::{password_digest, Role, User};
