//! Mock service implementations for testing.
//!
//! Configurable records, injectable failures, and call counters for every
//! seam. These are also handy as stand-ins while wiring a new frontend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, SyncError};
use crate::model::{Course, CourseId, Lesson, LessonId, Progress, Step, StepId};

use super::traits::{CourseService, EnrollmentService, LessonsService, StepService};

// ===== Lessons =====

/// Mock lessons service with configurable records.
pub struct MockLessonsService {
    lessons: Vec<Lesson>,
    failure: Option<String>,
    fetch_count: AtomicU32,
    requests: Mutex<Vec<Vec<LessonId>>>,
}

impl MockLessonsService {
    pub fn new() -> Self {
        Self {
            lessons: Vec::new(),
            failure: None,
            fetch_count: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Set the records the service knows about.
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// Make every fetch fail with a network error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Number of fetch calls made.
    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// The id lists requested so far, in call order.
    pub fn requests(&self) -> Vec<Vec<LessonId>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for MockLessonsService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LessonsService for MockLessonsService {
    async fn fetch_lessons(&self, ids: &[LessonId]) -> Result<Vec<Lesson>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(ids.to_vec());
        }

        if let Some(message) = &self.failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self
            .lessons
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect())
    }
}

// ===== Courses =====

/// Mock course service with separate locally-known and remote record sets.
pub struct MockCourseService {
    known: Vec<Course>,
    remote: Vec<Course>,
    progresses: Vec<Progress>,
    obtain_failure: Option<String>,
    fetch_failure: Option<String>,
    progress_failure: Option<String>,
    obtain_count: AtomicU32,
    fetch_count: AtomicU32,
    progress_count: AtomicU32,
    fetch_requests: Mutex<Vec<Vec<CourseId>>>,
    progress_requests: Mutex<Vec<Vec<CourseId>>>,
}

impl MockCourseService {
    pub fn new() -> Self {
        Self {
            known: Vec::new(),
            remote: Vec::new(),
            progresses: Vec::new(),
            obtain_failure: None,
            fetch_failure: None,
            progress_failure: None,
            obtain_count: AtomicU32::new(0),
            fetch_count: AtomicU32::new(0),
            progress_count: AtomicU32::new(0),
            fetch_requests: Mutex::new(Vec::new()),
            progress_requests: Mutex::new(Vec::new()),
        }
    }

    /// Records returned by `obtain_courses` (the locally-known side).
    pub fn with_known_courses(mut self, courses: Vec<Course>) -> Self {
        self.known = courses;
        self
    }

    /// Records returned by `fetch_courses` (the remote side).
    pub fn with_remote_courses(mut self, courses: Vec<Course>) -> Self {
        self.remote = courses;
        self
    }

    /// Records returned by `fetch_progresses`.
    pub fn with_progresses(mut self, progresses: Vec<Progress>) -> Self {
        self.progresses = progresses;
        self
    }

    pub fn with_obtain_failure(mut self, message: impl Into<String>) -> Self {
        self.obtain_failure = Some(message.into());
        self
    }

    pub fn with_fetch_failure(mut self, message: impl Into<String>) -> Self {
        self.fetch_failure = Some(message.into());
        self
    }

    pub fn with_progress_failure(mut self, message: impl Into<String>) -> Self {
        self.progress_failure = Some(message.into());
        self
    }

    pub fn obtain_count(&self) -> u32 {
        self.obtain_count.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn progress_count(&self) -> u32 {
        self.progress_count.load(Ordering::SeqCst)
    }

    /// Id lists passed to `fetch_courses`, in call order.
    pub fn fetch_requests(&self) -> Vec<Vec<CourseId>> {
        self.fetch_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Id lists passed to `fetch_progresses`, in call order.
    pub fn progress_requests(&self) -> Vec<Vec<CourseId>> {
        self.progress_requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl Default for MockCourseService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseService for MockCourseService {
    async fn obtain_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>> {
        self.obtain_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.obtain_failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self
            .known
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn fetch_courses(&self, ids: &[CourseId]) -> Result<Vec<Course>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.fetch_requests.lock() {
            requests.push(ids.to_vec());
        }

        if let Some(message) = &self.fetch_failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self
            .remote
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn fetch_progresses(&self, ids: &[CourseId]) -> Result<Vec<Progress>> {
        self.progress_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.progress_requests.lock() {
            requests.push(ids.to_vec());
        }

        if let Some(message) = &self.progress_failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self.progresses.clone())
    }
}

// ===== Enrollment =====

/// Mock enrollment service that records join attempts.
pub struct MockEnrollmentService {
    rejected: HashSet<CourseId>,
    join_count: AtomicU32,
    attempted: Mutex<Vec<CourseId>>,
}

impl MockEnrollmentService {
    pub fn new() -> Self {
        Self {
            rejected: HashSet::new(),
            join_count: AtomicU32::new(0),
            attempted: Mutex::new(Vec::new()),
        }
    }

    /// Make joining the given course fail with a network error.
    pub fn with_rejected_course(mut self, id: CourseId) -> Self {
        self.rejected.insert(id);
        self
    }

    /// Number of join calls made.
    pub fn join_count(&self) -> u32 {
        self.join_count.load(Ordering::SeqCst)
    }

    /// Course ids join was attempted for, in call order.
    pub fn attempted(&self) -> Vec<CourseId> {
        self.attempted.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl Default for MockEnrollmentService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnrollmentService for MockEnrollmentService {
    async fn join_course(&self, course: &Course) -> Result<Course> {
        self.join_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut attempted) = self.attempted.lock() {
            attempted.push(course.id);
        }

        if self.rejected.contains(&course.id) {
            return Err(SyncError::Network(format!(
                "Enrollment rejected for course {}",
                course.id
            )));
        }

        let mut joined = course.clone();
        joined.enrolled = true;
        Ok(joined)
    }
}

// ===== Steps =====

/// Mock step service with configurable steps and their progresses.
pub struct MockStepService {
    steps: Vec<Step>,
    progresses: Vec<Progress>,
    failure: Option<String>,
    steps_count: AtomicU32,
    progress_count: AtomicU32,
}

impl MockStepService {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            progresses: Vec::new(),
            failure: None,
            steps_count: AtomicU32::new(0),
            progress_count: AtomicU32::new(0),
        }
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Progress records returned in step order.
    pub fn with_progresses(mut self, progresses: Vec<Progress>) -> Self {
        self.progresses = progresses;
        self
    }

    /// Make every call fail with a network error.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn steps_count(&self) -> u32 {
        self.steps_count.load(Ordering::SeqCst)
    }

    pub fn progress_count(&self) -> u32 {
        self.progress_count.load(Ordering::SeqCst)
    }
}

impl Default for MockStepService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StepService for MockStepService {
    async fn fetch_steps(&self, lesson_id: LessonId) -> Result<Vec<Step>> {
        self.steps_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self
            .steps
            .iter()
            .filter(|s| s.lesson_id == lesson_id)
            .cloned()
            .collect())
    }

    async fn fetch_step_progresses(&self, _ids: &[StepId]) -> Result<Vec<Progress>> {
        self.progress_count.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.failure {
            return Err(SyncError::Network(message.clone()));
        }

        Ok(self.progresses.clone())
    }
}
