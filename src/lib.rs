//! Lyceum Sync - Lesson & Enrollment Synchronization Core
//!
//! Client-side core for a learning app: given a topic in a knowledge graph,
//! keeps its lesson list and the user's course enrollments synchronized
//! against remote services, and prepares lesson content for display.
//!
//! - Trait-based service seams (lessons, courses, enrollment, steps)
//! - Cache-then-network lesson refresh with generation-gated publishing
//! - All-settle concurrent enrollment fan-out
//! - Content assembly (step kinds, passed flags, shareable links)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        LessonSyncOrchestrator           │
//! │      (one per topic; refresh())         │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌──────────────────┐
//! │ LessonCache │       │CourseSynchronizer│
//! │ LessonFetch │       │  CourseEnroller  │
//! └──────┬──────┘       └────────┬─────────┘
//!        ▼                       ▼
//! ┌─────────────┐       ┌──────────────────┐
//! │ LessonStore │       │  CourseService   │
//! │LessonsService│      │EnrollmentService │
//! └─────────────┘       └──────────────────┘
//! ```
//!
//! Results flow out through two narrow boundaries: [`view::LessonsView`]
//! for publishing and alerts, [`view::LessonsRouter`] for navigation.

pub mod cache;
pub mod content;
pub mod error;
pub mod graph;
pub mod model;
pub mod quiz;
pub mod services;
pub mod sync;
pub mod view;

// Re-export main types for convenience
pub use cache::{InMemoryLessonStore, LessonCache, LessonFetcher, LessonStore};
pub use content::{LessonContentLoader, LessonContentViewData, StepContentConfig, StepKind};
pub use error::{Result, SyncError};
pub use graph::{KnowledgeGraph, LessonRef, Topic};
pub use model::{Course, CourseId, Lesson, LessonId, Progress, Step, StepId, TopicId};
pub use sync::{CourseEnroller, CourseSynchronizer, LessonSyncOrchestrator};
pub use view::{LessonViewData, LessonsRouter, LessonsView};
