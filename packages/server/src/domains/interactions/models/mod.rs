pub mod interaction;

pub use interaction::{Direction, Interaction, InteractionKind};
