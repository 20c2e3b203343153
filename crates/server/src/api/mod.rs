//! HTTP API surface.
//!
//! Each submodule owns one resource family and exposes a router
//! constructor; `main` merges them over the shared [`AppState`].

pub mod assessments;
pub mod attempts;
pub mod error;
pub mod lessons;
pub mod performance_tasks;
pub mod state;
pub mod student;

pub use assessments::create_assessments_router;
pub use attempts::create_attempts_router;
pub use error::ApiError;
pub use lessons::create_lessons_router;
pub use performance_tasks::create_performance_tasks_router;
pub use state::AppState;
pub use student::create_student_router;
