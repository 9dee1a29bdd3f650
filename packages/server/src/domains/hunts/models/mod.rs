pub mod hunt;

pub use hunt::{Hunt, HuntStatus};
