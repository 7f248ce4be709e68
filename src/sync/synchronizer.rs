//! Course enrollment synchronization.
//!
//! Brings the user's enrollment state in line with the set of courses a
//! topic references, then refreshes their progress records.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::{Course, CourseId};
use crate::services::CourseService;

use super::enroller::CourseEnroller;

/// Ids of records flagged enrolled.
fn enrolled_ids(courses: &[Course]) -> BTreeSet<CourseId> {
    courses
        .iter()
        .filter(|c| c.enrolled)
        .map(|c| c.id)
        .collect()
}

/// Requested ids not yet enrolled. Pure; no shared state is read or written
/// between the suspension points around it.
fn pending_ids(
    requested: &BTreeSet<CourseId>,
    enrolled: &BTreeSet<CourseId>,
) -> BTreeSet<CourseId> {
    requested.difference(enrolled).copied().collect()
}

/// Enrollment synchronizer for one set of courses.
#[derive(Clone)]
pub struct CourseSynchronizer {
    courses: Arc<dyn CourseService>,
    enroller: CourseEnroller,
}

impl CourseSynchronizer {
    pub fn new(courses: Arc<dyn CourseService>, enroller: CourseEnroller) -> Self {
        Self { courses, enroller }
    }

    /// Synchronize enrollment for the requested course ids.
    ///
    /// Obtains current records, enrolls whatever is still pending, then
    /// fetches progress records for the whole confirmed set. Returns the
    /// ids now confirmed enrolled: those already enrolled plus those newly
    /// joined. An empty request returns an empty set without any service
    /// calls.
    pub async fn synchronize(&self, course_ids: &BTreeSet<CourseId>) -> Result<BTreeSet<CourseId>> {
        if course_ids.is_empty() {
            debug!("No courses referenced, skipping enrollment sync");
            return Ok(BTreeSet::new());
        }

        let requested: Vec<CourseId> = course_ids.iter().copied().collect();
        let known = self.courses.obtain_courses(&requested).await?;

        let enrolled = enrolled_ids(&known);
        let pending = pending_ids(course_ids, &enrolled);
        debug!(
            requested = course_ids.len(),
            enrolled = enrolled.len(),
            pending = pending.len(),
            "Computed enrollment state"
        );

        let newly_joined = if pending.is_empty() {
            BTreeSet::new()
        } else {
            self.enroll_pending(&pending).await?
        };

        let confirmed: BTreeSet<CourseId> = enrolled.union(&newly_joined).copied().collect();

        let confirmed_list: Vec<CourseId> = confirmed.iter().copied().collect();
        let progresses = self.courses.fetch_progresses(&confirmed_list).await?;

        info!(
            confirmed = confirmed.len(),
            newly_joined = newly_joined.len(),
            progresses = progresses.len(),
            "Course synchronization complete"
        );
        Ok(confirmed)
    }

    /// Fetch full records for the pending ids and enroll them concurrently.
    ///
    /// Every enrollment request runs to completion before the first failure
    /// (in request order) is propagated, so one rejection cannot cancel the
    /// others. Ids the service does not recognize are skipped.
    async fn enroll_pending(&self, pending: &BTreeSet<CourseId>) -> Result<BTreeSet<CourseId>> {
        let ids: Vec<CourseId> = pending.iter().copied().collect();
        let to_enroll = self.courses.fetch_courses(&ids).await?;

        if to_enroll.len() < ids.len() {
            debug!(
                requested = ids.len(),
                found = to_enroll.len(),
                "Some pending courses are unknown to the service"
            );
        }

        let results = join_all(
            to_enroll
                .into_iter()
                .map(|course| self.enroller.enroll(course)),
        )
        .await;

        let mut joined = BTreeSet::new();
        let mut first_failure = None;
        for result in results {
            match result {
                Ok(course) => {
                    joined.insert(course.id);
                }
                Err(err) => {
                    warn!(error = %err, "Enrollment failed");
                    if first_failure.is_none() {
                        first_failure = Some(err);
                    }
                }
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(joined),
        }
    }
}
