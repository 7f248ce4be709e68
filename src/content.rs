//! Lesson content assembly.
//!
//! Turns a lesson's steps and their progress records into a displayable
//! content view model: step kinds for icons, passed flags, shareable links,
//! and the step the user should land on.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::model::{Lesson, LessonId, Progress, Step, StepId};
use crate::services::StepService;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for content assembly.
#[derive(Debug, Clone)]
pub struct StepContentConfig {
    /// Base URL for shareable step links.
    pub link_base_url: String,
}

impl Default for StepContentConfig {
    fn default() -> Self {
        Self {
            link_base_url: "https://lyceum.app".to_string(),
        }
    }
}

impl StepContentConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LESSON_LINK_BASE_URL") {
            if !val.is_empty() {
                config.link_base_url = val;
            }
        }

        config
    }

    /// Shareable link for a step at the given 1-based position.
    pub fn step_link(&self, lesson_id: LessonId, position: u32) -> String {
        format!("{}/lesson/{}/step/{}", self.link_base_url, lesson_id, position)
    }
}

// ============================================================================
// View model
// ============================================================================

/// Step kind, derived from the content block name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Video,
    Text,
    Code,
    Quiz,
}

impl StepKind {
    /// Classify a content block name. Anything unrecognized is a quiz:
    /// the platform grows new exercise blocks faster than clients ship.
    pub fn from_block_name(name: &str) -> Self {
        match name {
            "video" => Self::Video,
            "text" => Self::Text,
            "code" | "dataset" | "admin" | "sql" => Self::Code,
            _ => Self::Quiz,
        }
    }
}

/// One step as the content screen displays it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepViewData {
    pub id: StepId,
    pub kind: StepKind,
    pub is_passed: bool,
    /// Shareable link to this step.
    pub link: String,
}

/// The assembled content of one lesson.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContentViewData {
    pub lesson_id: LessonId,
    pub lesson_title: String,
    pub steps: Vec<StepViewData>,
    /// Index into `steps` the user should land on.
    pub start_step_index: usize,
}

/// Flip a step to passed after it was completed elsewhere.
///
/// Returns whether the step was present.
pub fn mark_step_passed(content: &mut LessonContentViewData, step_id: StepId) -> bool {
    match content.steps.iter_mut().find(|s| s.id == step_id) {
        Some(step) => {
            step.is_passed = true;
            true
        }
        None => false,
    }
}

/// Assemble the content view model from steps in display order and their
/// parallel progress records.
///
/// A missing progress record means not passed. The start index is the first
/// step not yet passed, or the first step when everything is done.
fn assemble(
    lesson: &Lesson,
    steps: &[Step],
    progresses: &[Progress],
    config: &StepContentConfig,
) -> LessonContentViewData {
    let step_views: Vec<StepViewData> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| StepViewData {
            id: step.id,
            kind: StepKind::from_block_name(&step.block_name),
            is_passed: progresses.get(index).map(|p| p.is_passed).unwrap_or(false),
            link: config.step_link(lesson.id, step.position),
        })
        .collect();

    let start_step_index = step_views
        .iter()
        .position(|s| !s.is_passed)
        .unwrap_or(0);

    LessonContentViewData {
        lesson_id: lesson.id,
        lesson_title: lesson.title.clone(),
        steps: step_views,
        start_step_index,
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Fetches a lesson's steps and progresses and assembles the view model.
#[derive(Clone)]
pub struct LessonContentLoader {
    steps: Arc<dyn StepService>,
    config: StepContentConfig,
}

impl LessonContentLoader {
    pub fn new(steps: Arc<dyn StepService>, config: StepContentConfig) -> Self {
        Self { steps, config }
    }

    /// Load the displayable content of a lesson.
    ///
    /// Steps are ordered by position before their progresses are fetched,
    /// so the progress list is parallel to the displayed order. A lesson
    /// without steps skips the progress call.
    pub async fn load(&self, lesson: &Lesson) -> Result<LessonContentViewData> {
        let mut steps = self.steps.fetch_steps(lesson.id).await?;
        steps.sort_by_key(|s| s.position);

        let progresses = if steps.is_empty() {
            Vec::new()
        } else {
            let ids: Vec<StepId> = steps.iter().map(|s| s.id).collect();
            self.steps.fetch_step_progresses(&ids).await?
        };

        debug!(
            lesson_id = lesson.id,
            steps = steps.len(),
            progresses = progresses.len(),
            "Assembled lesson content"
        );

        Ok(assemble(lesson, &steps, &progresses, &self.config))
    }
}
