//! Application layer for TaskFlow.
//!
//! In-memory stores, the task service façade, analytics and server
//! configuration shared by the HTTP binary.

pub mod analytics;
pub mod clock;
pub mod comment_store;
pub mod config;
pub mod filter;
pub mod service;
pub mod task_store;

pub use analytics::{DashboardSummary, PerformanceSummary, TaskBreakdown};
pub use clock::{Clock, system_clock};
pub use comment_store::{CommentError, CommentPage, CommentStore, NewComment};
pub use config::{Environment, ServerConfig};
pub use filter::{Page, TaskFilter};
pub use service::{CreateTask, TaskPatch, TaskService, TaskServiceError};
pub use task_store::{MemoryTaskStore, TaskStore};
