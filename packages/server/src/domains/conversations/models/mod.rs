pub mod turn;

pub use turn::ConversationTurn;
