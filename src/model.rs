//! Plain data model shared across the synchronization core.
//!
//! These are transport-shaped records: what the services return and what the
//! components pass around. Identity lives in the integer ids; everything else
//! is display or bookkeeping data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lesson identifier as issued by the lessons service.
pub type LessonId = i64;

/// Course identifier as issued by the course service.
pub type CourseId = i64;

/// Step identifier as issued by the step service.
pub type StepId = i64;

/// Topic identifier within the knowledge graph.
pub type TopicId = String;

/// A single lesson record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Estimated completion time in seconds, when the service provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_complete: Option<f64>,
    /// Ordered step ids making up the lesson body.
    #[serde(default)]
    pub steps: Vec<StepId>,
}

impl Lesson {
    /// Create a lesson with the fields identity and display need.
    pub fn new(id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            slug: String::new(),
            time_to_complete: None,
            steps: Vec::new(),
        }
    }

    /// Set the ordered step ids.
    pub fn with_steps(mut self, steps: Vec<StepId>) -> Self {
        self.steps = steps;
        self
    }
}

/// A course record with its enrollment flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    /// Whether the current user is enrolled. Locally-obtained records may
    /// carry a stale value; the synchronizer treats absence as not enrolled.
    #[serde(default)]
    pub enrolled: bool,
    /// Progress record reference, present once the user has activity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<String>,
}

impl Course {
    /// Create a course record, not enrolled.
    pub fn new(id: CourseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            enrolled: false,
            progress: None,
        }
    }

    /// Set the enrollment flag.
    pub fn with_enrolled(mut self, enrolled: bool) -> Self {
        self.enrolled = enrolled;
        self
    }
}

/// A progress record for a course or an individual step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    #[serde(default)]
    pub is_passed: bool,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub cost: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
}

impl Progress {
    /// Create a progress record with the given passed state.
    pub fn new(id: impl Into<String>, is_passed: bool) -> Self {
        Self {
            id: id.into(),
            is_passed,
            score: 0.0,
            cost: 0,
            last_viewed: None,
        }
    }

    /// Set the score and cost.
    pub fn with_score(mut self, score: f64, cost: u32) -> Self {
        self.score = score;
        self.cost = cost;
        self
    }
}

/// A single step within a lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: StepId,
    pub lesson_id: LessonId,
    /// 1-based position within the lesson.
    pub position: u32,
    /// Content block type name (e.g. "video", "text", "code", "choice").
    pub block_name: String,
}

impl Step {
    pub fn new(
        id: StepId,
        lesson_id: LessonId,
        position: u32,
        block_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            lesson_id,
            position,
            block_name: block_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_enrollment_defaults_to_absent() {
        let course: Course = serde_json::from_str(r#"{"id": 10, "title": "Calculus"}"#).unwrap();

        assert_eq!(course.id, 10);
        assert!(!course.enrolled);
        assert!(course.progress.is_none());
    }

    #[test]
    fn test_lesson_wire_names_are_camel_case() {
        let lesson: Lesson = serde_json::from_str(
            r#"{"id": 1, "title": "Sets", "timeToComplete": 300.0, "steps": [51, 52]}"#,
        )
        .unwrap();

        assert_eq!(lesson.slug, "");
        assert_eq!(lesson.time_to_complete, Some(300.0));
        assert_eq!(lesson.steps, vec![51, 52]);

        let json = serde_json::to_string(&lesson).unwrap();
        assert!(json.contains("\"timeToComplete\""));
    }
}
