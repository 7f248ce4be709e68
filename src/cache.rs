//! Lesson cache: local store seam, in-memory store, and the two lookup
//! components of the refresh flow.
//!
//! - [`LessonStore`] is the persistence boundary. Lookup is synchronous;
//!   whatever backs it must answer from local data.
//! - [`LessonCache`] wraps a store and never fails its caller: a store error
//!   degrades to an empty result so the remote fetch can still run.
//! - [`LessonFetcher`] pulls authoritative records over the network and
//!   writes them back through the store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Lesson, LessonId};
use crate::services::LessonsService;

// ============================================================================
// Store seam
// ============================================================================

/// Local lesson storage boundary.
///
/// Implementations answer from local data only; both operations are
/// synchronous. Errors are legitimate (a disk-backed store can fail) but
/// callers in this crate absorb them.
pub trait LessonStore: Send + Sync {
    /// Best-effort lookup. The result is unordered with respect to the
    /// input and may be any subset of it.
    fn lookup(&self, ids: &[LessonId]) -> Result<Vec<Lesson>>;

    /// Upsert authoritative records.
    fn replace(&self, lessons: &[Lesson]) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Store statistics.
#[derive(Debug, Clone, Default)]
pub struct LessonStoreStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl LessonStoreStats {
    /// Calculate hit rate as percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Thread-safe in-memory lesson store. O(1) per id.
#[derive(Default)]
pub struct InMemoryLessonStore {
    lessons: DashMap<LessonId, Lesson>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InMemoryLessonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store.
    pub fn with_lessons(lessons: Vec<Lesson>) -> Self {
        let store = Self::new();
        for lesson in lessons {
            store.lessons.insert(lesson.id, lesson);
        }
        store
    }

    pub fn stats(&self) -> LessonStoreStats {
        LessonStoreStats {
            entries: self.lessons.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl LessonStore for InMemoryLessonStore {
    fn lookup(&self, ids: &[LessonId]) -> Result<Vec<Lesson>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            match self.lessons.get(id) {
                Some(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    found.push(entry.value().clone());
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        Ok(found)
    }

    fn replace(&self, lessons: &[Lesson]) -> Result<()> {
        for lesson in lessons {
            self.lessons.insert(lesson.id, lesson.clone());
        }
        Ok(())
    }
}

// ============================================================================
// Cache component
// ============================================================================

/// Best-effort cache lookup over a [`LessonStore`].
///
/// Never fails the caller: a store error is logged and absorbed to an empty
/// result. Nothing is reported to the presentation boundary from here.
#[derive(Clone)]
pub struct LessonCache {
    store: Arc<dyn LessonStore>,
}

impl LessonCache {
    pub fn new(store: Arc<dyn LessonStore>) -> Self {
        Self { store }
    }

    /// Look up whatever the store has for the given ids.
    pub fn lookup(&self, ids: &[LessonId]) -> Vec<Lesson> {
        match self.store.lookup(ids) {
            Ok(lessons) => {
                debug!(requested = ids.len(), found = lessons.len(), "Lesson cache lookup");
                lessons
            }
            Err(err) => {
                warn!(error = %err, "Lesson store lookup failed, returning empty set");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// Fetcher component
// ============================================================================

/// Remote lesson fetch with cache write-back.
#[derive(Clone)]
pub struct LessonFetcher {
    service: Arc<dyn LessonsService>,
    store: Arc<dyn LessonStore>,
}

impl LessonFetcher {
    pub fn new(service: Arc<dyn LessonsService>, store: Arc<dyn LessonStore>) -> Self {
        Self { service, store }
    }

    /// Fetch authoritative records for the given ids.
    ///
    /// An empty id list short-circuits without touching the network. On
    /// success the records replace the store's copies; a write-back failure
    /// is absorbed since the fetched data is already in hand.
    pub async fn fetch(&self, ids: &[LessonId]) -> Result<Vec<Lesson>> {
        if ids.is_empty() {
            debug!("No lesson ids to fetch, skipping remote call");
            return Ok(Vec::new());
        }

        let lessons = self.service.fetch_lessons(ids).await?;
        debug!(requested = ids.len(), fetched = lessons.len(), "Fetched lessons");

        if let Err(err) = self.store.replace(&lessons) {
            warn!(error = %err, "Lesson store write-back failed");
        }

        Ok(lessons)
    }
}
