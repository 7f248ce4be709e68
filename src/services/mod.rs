//! Service seams for the synchronization core.
//!
//! This module defines the traits the components call across the network
//! boundary, plus mock implementations for tests.
//!
//! ## Services
//!
//! - **LessonsService**: authoritative lesson retrieval
//! - **CourseService**: course records (local and remote) and progresses
//! - **EnrollmentService**: course enrollment
//! - **StepService**: step retrieval for lesson content

pub mod mock;
pub mod traits;

pub use mock::{MockCourseService, MockEnrollmentService, MockLessonsService, MockStepService};
pub use traits::{CourseService, EnrollmentService, LessonsService, StepService};
