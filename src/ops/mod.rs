pub mod task_ops;
pub mod query;
pub mod drag;
