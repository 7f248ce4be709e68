//! Topic refresh orchestration.
//!
//! One orchestrator per topic. A refresh fans out into two independent
//! background sequences:
//!
//! ```text
//!                refresh()
//!                    │ bump generation, spawn
//!        ┌───────────┴────────────┐
//!        ▼                        ▼
//!  Lesson sequence          Enrollment sequence
//!  cache lookup             derive course ids (pure)
//!  publish (immediate)      synchronize enrollments
//!  remote fetch             └─ errors → display_error
//!  publish (overwrite)
//!  └─ errors → display_error
//! ```
//!
//! Publishes are generation-gated: when a newer refresh has started, an
//! older sequence's results are discarded instead of interleaving, so the
//! view always converges on the newest refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::{LessonCache, LessonFetcher};
use crate::error::{Result, SyncError};
use crate::graph::{KnowledgeGraph, Topic};
use crate::model::{Lesson, LessonId};
use crate::view::{LessonViewData, LessonsRouter, LessonsView};

use super::synchronizer::CourseSynchronizer;

/// Alert title for every error surfaced through the view.
const ERROR_ALERT_TITLE: &str = "Error";

/// Coordinates lesson and enrollment synchronization for one topic.
pub struct LessonSyncOrchestrator {
    topic: Topic,
    cache: LessonCache,
    fetcher: LessonFetcher,
    synchronizer: CourseSynchronizer,
    view: Arc<dyn LessonsView>,
    router: Arc<dyn LessonsRouter>,
    /// Most recently published lesson set.
    lessons: Arc<tokio::sync::RwLock<Vec<Lesson>>>,
    /// Current refresh generation.
    generation: Arc<AtomicU64>,
}

impl LessonSyncOrchestrator {
    /// Create an orchestrator for the given topic.
    ///
    /// The topic is resolved against the graph here, once; an unknown id is
    /// a configuration error rather than a later panic.
    pub fn new(
        graph: &KnowledgeGraph,
        topic_id: &str,
        cache: LessonCache,
        fetcher: LessonFetcher,
        synchronizer: CourseSynchronizer,
        view: Arc<dyn LessonsView>,
        router: Arc<dyn LessonsRouter>,
    ) -> Result<Self> {
        let topic = graph
            .topic(topic_id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownTopic(topic_id.to_string()))?;

        info!(
            topic = %topic.id,
            lessons = topic.lessons.len(),
            "Lesson sync orchestrator created"
        );

        Ok(Self {
            topic,
            cache,
            fetcher,
            synchronizer,
            view,
            router,
            lessons: Arc::new(tokio::sync::RwLock::new(Vec::new())),
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    /// The topic this orchestrator serves.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// View data for the most recently published lesson set.
    pub async fn current_lessons(&self) -> Vec<LessonViewData> {
        let lessons = self.lessons.read().await;
        lessons.iter().map(LessonViewData::from).collect()
    }

    /// Trigger a refresh. The caller is never blocked: the lesson and
    /// enrollment sequences run as independent background tasks.
    pub fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(topic = %self.topic.id, generation, "Refresh triggered");

        let pass = RefreshPass {
            topic: self.topic.clone(),
            cache: self.cache.clone(),
            fetcher: self.fetcher.clone(),
            synchronizer: self.synchronizer.clone(),
            view: Arc::clone(&self.view),
            lessons: Arc::clone(&self.lessons),
            current_generation: Arc::clone(&self.generation),
            generation,
        };

        let lesson_pass = pass.clone();
        tokio::spawn(async move { lesson_pass.run_lessons().await });
        tokio::spawn(async move { pass.run_enrollment().await });
    }

    /// Open the steps of a lesson from the most recently published set.
    ///
    /// A stale id (no longer in the current set) is a silent no-op: the
    /// list the selection came from has already been replaced.
    pub async fn select_lesson(&self, id: LessonId) {
        let lessons = self.lessons.read().await;
        match lessons.iter().find(|l| l.id == id) {
            Some(lesson) => {
                debug!(lesson_id = id, "Opening lesson steps");
                self.router.show_steps_for_lesson(lesson);
            }
            None => {
                debug!(lesson_id = id, "Selected lesson no longer present, ignoring");
            }
        }
    }
}

/// Handle for one refresh generation's background work.
#[derive(Clone)]
struct RefreshPass {
    topic: Topic,
    cache: LessonCache,
    fetcher: LessonFetcher,
    synchronizer: CourseSynchronizer,
    view: Arc<dyn LessonsView>,
    lessons: Arc<tokio::sync::RwLock<Vec<Lesson>>>,
    current_generation: Arc<AtomicU64>,
    generation: u64,
}

impl RefreshPass {
    /// Lesson sequence: cache first, published immediately, then the remote
    /// fetch overwrites. Strictly ordered within this pass.
    async fn run_lessons(&self) {
        let ids = self.topic.lesson_ids();

        let cached = self.cache.lookup(&ids);
        self.publish(cached).await;

        match self.fetcher.fetch(&ids).await {
            Ok(fresh) => self.publish(fresh).await,
            Err(err) => self.report(err),
        }
    }

    /// Enrollment sequence: derive the topic's course ids and synchronize.
    async fn run_enrollment(&self) {
        let course_ids = self.topic.course_ids();

        match self.synchronizer.synchronize(&course_ids).await {
            Ok(confirmed) => {
                if !confirmed.is_empty() {
                    info!(
                        topic = %self.topic.id,
                        courses = confirmed.len(),
                        "Enrollment synchronized"
                    );
                }
            }
            Err(err) => self.report(err),
        }
    }

    /// Publish a lesson set unless a newer refresh has superseded this one.
    ///
    /// The retained set and the view update happen under the same lock, so
    /// view calls land in the same order as state changes.
    async fn publish(&self, lessons: Vec<Lesson>) {
        let mut current = self.lessons.write().await;
        if self.current_generation.load(Ordering::SeqCst) != self.generation {
            debug!(
                generation = self.generation,
                "Discarding publish from superseded refresh"
            );
            return;
        }

        let view_data: Vec<LessonViewData> = lessons.iter().map(LessonViewData::from).collect();
        debug!(
            generation = self.generation,
            lessons = view_data.len(),
            "Publishing lesson set"
        );
        *current = lessons;
        self.view.set_lessons(view_data);
    }

    /// Error boundary: log, then surface user-facing errors as an alert.
    fn report(&self, err: SyncError) {
        error!(topic = %self.topic.id, error = %err, "Refresh sequence failed");
        if err.is_user_facing() {
            self.view.display_error(ERROR_ALERT_TITLE, &err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::cache::{InMemoryLessonStore, LessonStore};
    use crate::graph::LessonRef;
    use crate::services::{
        LessonsService, MockCourseService, MockEnrollmentService, MockLessonsService,
    };
    use crate::sync::CourseEnroller;

    #[derive(Default)]
    struct RecordingView {
        published: Mutex<Vec<Vec<LessonViewData>>>,
        errors: Mutex<Vec<(String, String)>>,
    }

    impl RecordingView {
        fn published(&self) -> Vec<Vec<LessonViewData>> {
            self.published.lock().unwrap().clone()
        }

        fn errors(&self) -> Vec<(String, String)> {
            self.errors.lock().unwrap().clone()
        }
    }

    impl LessonsView for RecordingView {
        fn set_lessons(&self, lessons: Vec<LessonViewData>) {
            self.published.lock().unwrap().push(lessons);
        }

        fn display_error(&self, title: &str, message: &str) {
            self.errors
                .lock()
                .unwrap()
                .push((title.to_string(), message.to_string()));
        }
    }

    #[derive(Default)]
    struct RecordingRouter {
        shown: Mutex<Vec<LessonId>>,
    }

    impl RecordingRouter {
        fn shown(&self) -> Vec<LessonId> {
            self.shown.lock().unwrap().clone()
        }
    }

    impl LessonsRouter for RecordingRouter {
        fn show_steps_for_lesson(&self, lesson: &Lesson) {
            self.shown.lock().unwrap().push(lesson.id);
        }
    }

    /// Store whose every operation fails.
    struct FailingStore;

    impl LessonStore for FailingStore {
        fn lookup(&self, _ids: &[LessonId]) -> Result<Vec<Lesson>> {
            Err(SyncError::Store("disk unavailable".to_string()))
        }

        fn replace(&self, _lessons: &[Lesson]) -> Result<()> {
            Err(SyncError::Store("disk unavailable".to_string()))
        }
    }

    /// Lessons service that answers queued responses, each after its delay.
    struct SequencedLessonsService {
        responses: Mutex<VecDeque<(Duration, Vec<Lesson>)>>,
    }

    impl SequencedLessonsService {
        fn new(responses: Vec<(Duration, Vec<Lesson>)>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl LessonsService for SequencedLessonsService {
        async fn fetch_lessons(&self, _ids: &[LessonId]) -> Result<Vec<Lesson>> {
            let (delay, lessons) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected fetch");
            tokio::time::sleep(delay).await;
            Ok(lessons)
        }
    }

    struct Harness {
        orchestrator: LessonSyncOrchestrator,
        view: Arc<RecordingView>,
        router: Arc<RecordingRouter>,
    }

    fn harness(
        topic: Topic,
        store: Arc<dyn LessonStore>,
        lessons_service: Arc<dyn LessonsService>,
        courses: Arc<MockCourseService>,
        enrollment: Arc<MockEnrollmentService>,
    ) -> Harness {
        let mut graph = KnowledgeGraph::new();
        let topic_id = topic.id.clone();
        graph.insert_topic(topic);

        let view = Arc::new(RecordingView::default());
        let router = Arc::new(RecordingRouter::default());

        let orchestrator = LessonSyncOrchestrator::new(
            &graph,
            &topic_id,
            LessonCache::new(store.clone()),
            LessonFetcher::new(lessons_service, store),
            CourseSynchronizer::new(courses, CourseEnroller::new(enrollment)),
            view.clone(),
            router.clone(),
        )
        .unwrap();

        Harness {
            orchestrator,
            view,
            router,
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..100 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 1s");
    }

    #[tokio::test]
    async fn test_unknown_topic_is_a_constructor_error() {
        let graph = KnowledgeGraph::new();
        let store = Arc::new(InMemoryLessonStore::new());

        let result = LessonSyncOrchestrator::new(
            &graph,
            "missing",
            LessonCache::new(store.clone()),
            LessonFetcher::new(Arc::new(MockLessonsService::new()), store),
            CourseSynchronizer::new(
                Arc::new(MockCourseService::new()),
                CourseEnroller::new(Arc::new(MockEnrollmentService::new())),
            ),
            Arc::new(RecordingView::default()),
            Arc::new(RecordingRouter::default()),
        );

        assert!(matches!(result, Err(SyncError::UnknownTopic(_))));
    }

    #[tokio::test]
    async fn test_refresh_publishes_cached_then_fetched() {
        let topic = Topic::new(
            "algebra",
            "Algebra",
            vec![LessonRef::standalone(1), LessonRef::standalone(2)],
        );
        let store = Arc::new(InMemoryLessonStore::with_lessons(vec![Lesson::new(
            1,
            "Sets (cached)",
        )]));
        let service = Arc::new(MockLessonsService::new().with_lessons(vec![
            Lesson::new(1, "Sets"),
            Lesson::new(2, "Functions"),
        ]));

        let h = harness(
            topic,
            store,
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2).await;

        let published = h.view.published();
        assert_eq!(published[0].len(), 1);
        assert_eq!(published[0][0].title, "Sets (cached)");
        assert_eq!(published[1].len(), 2);
        assert!(h.view.errors().is_empty());

        let current = h.orchestrator.current_lessons().await;
        assert_eq!(current.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_cache_still_publishes_before_fetch() {
        let topic = Topic::new("algebra", "Algebra", vec![LessonRef::standalone(1)]);
        let service =
            Arc::new(MockLessonsService::new().with_lessons(vec![Lesson::new(1, "Sets")]));

        let h = harness(
            topic,
            Arc::new(InMemoryLessonStore::new()),
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2).await;

        let published = h.view.published();
        assert!(published[0].is_empty());
        assert_eq!(published[1].len(), 1);
    }

    #[tokio::test]
    async fn test_topic_without_lessons_publishes_empty_without_network() {
        let topic = Topic::new("empty", "Empty", vec![]);
        let service = Arc::new(MockLessonsService::new());

        let h = harness(
            topic,
            Arc::new(InMemoryLessonStore::new()),
            service.clone(),
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2).await;

        assert!(h.view.published().iter().all(|p| p.is_empty()));
        assert_eq!(service.fetch_count(), 0);
        assert!(h.view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty_without_alert() {
        let topic = Topic::new("algebra", "Algebra", vec![LessonRef::standalone(1)]);
        let service =
            Arc::new(MockLessonsService::new().with_lessons(vec![Lesson::new(1, "Sets")]));

        let h = harness(
            topic,
            Arc::new(FailingStore),
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2).await;

        // The failed lookup publishes an empty list, the fetch overwrites
        // it, and no alert reaches the user at any point.
        assert!(h.view.published()[0].is_empty());
        assert_eq!(h.view.published()[1].len(), 1);
        assert!(h.view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_cached_list_and_reports() {
        let topic = Topic::new("algebra", "Algebra", vec![LessonRef::standalone(1)]);
        let store = Arc::new(InMemoryLessonStore::with_lessons(vec![Lesson::new(
            1, "Sets",
        )]));
        let service = Arc::new(MockLessonsService::new().with_failure("gateway timeout"));

        let h = harness(
            topic,
            store,
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| !h.view.errors().is_empty()).await;

        let published = h.view.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].len(), 1);

        let errors = h.view.errors();
        assert_eq!(errors[0].0, "Error");
        assert!(errors[0].1.contains("gateway timeout"));

        // The cached list stays current after the failed fetch.
        assert_eq!(h.orchestrator.current_lessons().await.len(), 1);
    }

    #[tokio::test]
    async fn test_enrollment_failure_reports_without_blocking_lessons() {
        let topic = Topic::new(
            "algebra",
            "Algebra",
            vec![LessonRef::with_course(1, "10")],
        );
        let service =
            Arc::new(MockLessonsService::new().with_lessons(vec![Lesson::new(1, "Sets")]));
        let courses = Arc::new(MockCourseService::new().with_obtain_failure("course service down"));

        let h = harness(
            topic,
            Arc::new(InMemoryLessonStore::new()),
            service,
            courses,
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2 && !h.view.errors().is_empty()).await;

        assert_eq!(h.view.published()[1].len(), 1);
        assert!(h.view.errors()[0].1.contains("course service down"));
    }

    #[tokio::test]
    async fn test_select_lesson_routes_current_and_ignores_stale() {
        let topic = Topic::new("algebra", "Algebra", vec![LessonRef::standalone(1)]);
        let service =
            Arc::new(MockLessonsService::new().with_lessons(vec![Lesson::new(1, "Sets")]));

        let h = harness(
            topic,
            Arc::new(InMemoryLessonStore::new()),
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        wait_until(|| h.view.published().len() == 2).await;

        h.orchestrator.select_lesson(1).await;
        h.orchestrator.select_lesson(999).await;

        assert_eq!(h.router.shown(), vec![1]);
        assert!(h.view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_superseded_refresh_cannot_overwrite_newer_one() {
        let topic = Topic::new("algebra", "Algebra", vec![LessonRef::standalone(1)]);
        // First refresh answers slowly with the old title, second quickly
        // with the new one.
        let service = Arc::new(SequencedLessonsService::new(vec![
            (
                Duration::from_millis(200),
                vec![Lesson::new(1, "Stale title")],
            ),
            (
                Duration::from_millis(10),
                vec![Lesson::new(1, "Fresh title")],
            ),
        ]));

        let h = harness(
            topic,
            Arc::new(InMemoryLessonStore::new()),
            service,
            Arc::new(MockCourseService::new()),
            Arc::new(MockEnrollmentService::new()),
        );

        h.orchestrator.refresh();
        h.orchestrator.refresh();

        // Give the slow first fetch time to complete and be discarded.
        tokio::time::sleep(Duration::from_millis(400)).await;

        let current = h.orchestrator.current_lessons().await;
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].title, "Fresh title");

        // The stale fetch result never reached the view.
        for publish in h.view.published() {
            assert!(publish.iter().all(|l| l.title != "Stale title"));
        }
    }
}
