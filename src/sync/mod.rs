//! Synchronization flow components.
//!
//! ## Components
//!
//! - **CourseEnroller**: idempotent enrollment of a single course
//! - **CourseSynchronizer**: enrollment and progress sync for a course set
//! - **LessonSyncOrchestrator**: per-topic refresh coordination

pub mod enroller;
pub mod orchestrator;
pub mod synchronizer;

pub use enroller::CourseEnroller;
pub use orchestrator::LessonSyncOrchestrator;
pub use synchronizer::CourseSynchronizer;
