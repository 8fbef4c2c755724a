// Infrastructure module - Core background services and utilities
pub mod heartbeat;
pub mod task_manager;

pub use heartbeat::{HealthChecker, Probe};
pub use task_manager::TaskManager;
