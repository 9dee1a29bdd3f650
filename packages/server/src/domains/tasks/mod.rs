pub mod models;

pub use models::{CreateTask, Task, TaskPriority};
