//! Service seams for the synchronization flow.
//!
//! These traits abstract the remote learning platform. Transport, retries,
//! and authentication live behind them; the components in this crate only
//! see records and errors.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Course, CourseId, Lesson, LessonId, Progress, Step, StepId};

/// Remote lesson retrieval.
#[async_trait]
pub trait LessonsService: Send + Sync {
    /// Fetch authoritative lesson records for the given ids.
    ///
    /// The result order is the service's own; ids the service does not
    /// recognize are simply missing from the result.
    async fn fetch_lessons(&self, ids: &[LessonId]) -> Result<Vec<Lesson>>;
}

/// Course record and progress retrieval.
#[async_trait]
pub trait CourseService: Send + Sync {
    /// Currently known course records for the given ids.
    ///
    /// Enrollment flags may be stale and unrecognized ids are missing from
    /// the result; the synchronizer treats both as "not yet enrolled".
    async fn obtain_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>>;

    /// Fetch full authoritative course records.
    async fn fetch_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>>;

    /// Fetch progress records for the given courses.
    async fn fetch_progresses(&self, ids: &[CourseId]) -> Result<Vec<Progress>>;
}

/// Course enrollment.
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Enroll the current user in the course, returning the updated record.
    async fn join_course(&self, course: &Course) -> Result<Course>;
}

/// Step retrieval for lesson content.
#[async_trait]
pub trait StepService: Send + Sync {
    /// Fetch the steps of a lesson.
    async fn fetch_steps(&self, lesson_id: LessonId) -> Result<Vec<Step>>;

    /// Fetch progress records for the given steps, parallel to the id list.
    async fn fetch_step_progresses(&self, ids: &[StepId]) -> Result<Vec<Progress>>;
}
