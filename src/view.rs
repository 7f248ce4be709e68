//! Presentation and routing boundaries.
//!
//! The synchronization core never touches UI types. It publishes lesson
//! summaries through [`LessonsView`] and hands full records to
//! [`LessonsRouter`] on navigation; what happens on the other side of these
//! traits is the embedding application's business.

use serde::{Deserialize, Serialize};

use crate::model::{Lesson, LessonId};

/// The shape the presentation layer receives for lesson lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonViewData {
    pub id: LessonId,
    pub title: String,
}

impl From<&Lesson> for LessonViewData {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
        }
    }
}

/// Presentation boundary for the lesson list.
///
/// `set_lessons` is called more than once per refresh: the cached list
/// arrives first and the fetched list replaces it. Each call carries the
/// complete list, not a delta.
///
/// `set_lessons` is invoked while the orchestrator holds its state lock.
/// Implementations must return promptly and must not call back into the
/// orchestrator.
pub trait LessonsView: Send + Sync {
    /// Replace the displayed lesson list.
    fn set_lessons(&self, lessons: Vec<LessonViewData>);

    /// Surface an error alert.
    fn display_error(&self, title: &str, message: &str);
}

/// Routing boundary out of the lesson list.
pub trait LessonsRouter: Send + Sync {
    /// Navigate to the steps of the selected lesson.
    fn show_steps_for_lesson(&self, lesson: &Lesson);
}
