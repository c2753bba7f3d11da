pub mod project;
pub mod task;

pub use project::{GanttFrame, Project};
pub use task::{Task, TaskId, TaskKind};
