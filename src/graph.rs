//! Knowledge graph: topics and the lesson references they carry.
//!
//! The graph is read-only input to the synchronization flow. Topics hold
//! ordered lesson references; course ids are derived from those references
//! on demand and never stored.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{CourseId, LessonId, TopicId};

/// A lesson reference as authored in a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRef {
    pub lesson_id: LessonId,
    /// Raw course identifier. May be absent or non-numeric; such entries
    /// do not participate in course derivation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl LessonRef {
    /// Reference with an associated course.
    pub fn with_course(lesson_id: LessonId, course_id: impl Into<String>) -> Self {
        Self {
            lesson_id,
            course_id: Some(course_id.into()),
        }
    }

    /// Reference without a course association.
    pub fn standalone(lesson_id: LessonId) -> Self {
        Self {
            lesson_id,
            course_id: None,
        }
    }
}

/// A topic vertex: a heading plus its ordered lesson references.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonRef>,
}

impl Topic {
    pub fn new(id: impl Into<TopicId>, title: impl Into<String>, lessons: Vec<LessonRef>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            lessons,
        }
    }

    /// Lesson ids in authored order.
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        self.lessons.iter().map(|l| l.lesson_id).collect()
    }

    /// Distinct course ids referenced by this topic's lessons.
    ///
    /// Only identifiers that parse to a positive integer participate;
    /// absent and malformed values are dropped without failing.
    pub fn course_ids(&self) -> BTreeSet<CourseId> {
        self.lessons
            .iter()
            .filter_map(|l| l.course_id.as_deref())
            .filter_map(parse_course_id)
            .collect()
    }
}

fn parse_course_id(raw: &str) -> Option<CourseId> {
    raw.parse::<CourseId>().ok().filter(|id| *id > 0)
}

/// Registry of topics keyed by topic id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    topics: HashMap<TopicId, Topic>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a topic.
    pub fn insert_topic(&mut self, topic: Topic) {
        self.topics.insert(topic.id.clone(), topic);
    }

    /// Look up a topic by id.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.topics.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_ids_skips_absent_and_malformed() {
        let topic = Topic::new(
            "algebra",
            "Algebra",
            vec![
                LessonRef::with_course(1, "10"),
                LessonRef::with_course(2, "11"),
                LessonRef::standalone(3),
                LessonRef::with_course(4, "abc"),
                LessonRef::with_course(5, "0"),
                LessonRef::with_course(6, "-7"),
            ],
        );

        let ids = topic.course_ids();
        assert_eq!(ids, BTreeSet::from([10, 11]));
    }

    #[test]
    fn test_course_ids_dedupes() {
        let topic = Topic::new(
            "geometry",
            "Geometry",
            vec![
                LessonRef::with_course(1, "42"),
                LessonRef::with_course(2, "42"),
                LessonRef::with_course(3, "42"),
            ],
        );

        assert_eq!(topic.course_ids(), BTreeSet::from([42]));
    }

    #[test]
    fn test_lesson_ids_preserve_authored_order() {
        let topic = Topic::new(
            "history",
            "History",
            vec![
                LessonRef::standalone(30),
                LessonRef::standalone(10),
                LessonRef::standalone(20),
            ],
        );

        assert_eq!(topic.lesson_ids(), vec![30, 10, 20]);
    }

    #[test]
    fn test_empty_topic_has_no_courses() {
        let topic = Topic::new("empty", "Empty", vec![]);
        assert!(topic.lesson_ids().is_empty());
        assert!(topic.course_ids().is_empty());
    }

    #[test]
    fn test_graph_lookup() {
        let mut graph = KnowledgeGraph::new();
        assert!(graph.is_empty());

        graph.insert_topic(Topic::new("algebra", "Algebra", vec![]));
        assert_eq!(graph.len(), 1);
        assert!(graph.contains("algebra"));
        assert!(graph.topic("algebra").is_some());
        assert!(graph.topic("missing").is_none());
    }
}
