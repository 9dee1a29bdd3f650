pub mod models;

pub use models::{Direction, Interaction, InteractionKind};
