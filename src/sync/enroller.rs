//! Idempotent course enrollment.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::model::Course;
use crate::services::EnrollmentService;

/// Enrolls the user in a course unless the record already says enrolled.
///
/// Already-enrolled records pass through untouched without a service call,
/// so retrying a partially-failed fan-out never double-enrolls.
#[derive(Clone)]
pub struct CourseEnroller {
    service: Arc<dyn EnrollmentService>,
}

impl CourseEnroller {
    pub fn new(service: Arc<dyn EnrollmentService>) -> Self {
        Self { service }
    }

    /// Enroll in the course, returning the updated record.
    pub async fn enroll(&self, course: Course) -> Result<Course> {
        if course.enrolled {
            debug!(course_id = course.id, "Already enrolled, skipping join");
            return Ok(course);
        }

        let joined = self.service.join_course(&course).await?;
        debug!(course_id = joined.id, "Joined course");
        Ok(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::services::MockEnrollmentService;

    #[tokio::test]
    async fn test_enrolled_course_passes_through_without_service_call() {
        let service = Arc::new(MockEnrollmentService::new());
        let enroller = CourseEnroller::new(service.clone());

        let course = Course::new(10, "Rust").with_enrolled(true);
        let result = enroller.enroll(course).await.unwrap();
        let result = enroller.enroll(result).await.unwrap();

        assert!(result.enrolled);
        assert_eq!(service.join_count(), 0);
    }

    #[tokio::test]
    async fn test_unenrolled_course_joins() {
        let service = Arc::new(MockEnrollmentService::new());
        let enroller = CourseEnroller::new(service.clone());

        let result = enroller.enroll(Course::new(11, "Go")).await.unwrap();

        assert!(result.enrolled);
        assert_eq!(service.attempted(), vec![11]);
    }

    #[tokio::test]
    async fn test_join_failure_propagates() {
        let service = Arc::new(MockEnrollmentService::new().with_rejected_course(11));
        let enroller = CourseEnroller::new(service);

        let result = enroller.enroll(Course::new(11, "Go")).await;
        assert!(matches!(result, Err(SyncError::Network(_))));
    }
}
