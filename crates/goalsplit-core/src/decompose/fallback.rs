//! Deterministic, network-free decomposition.

use async_trait::async_trait;

use goalsplit_db::models::GenerationSource;

use super::backend::GenerationBackend;
use super::types::{BackendError, GenerationResult};

/// Strip surrounding whitespace and one trailing period.
pub fn trim_goal(goal: &str) -> &str {
    let trimmed = goal.trim();
    trimmed.strip_suffix('.').unwrap_or(trimmed)
}

/// Build the fixed five-step plan for a goal.
///
/// Complexity is `floor(chars / 10)` of the trimmed goal, clamped to 1..=10.
pub fn fallback_result(goal: &str) -> GenerationResult {
    let goal = trim_goal(goal);
    let steps = [
        format!("Define the core value proposition and target users for '{goal}'."),
        format!("Validate demand: run quick customer interviews and gather feedback for '{goal}'."),
        format!("Create a 1-page plan and minimum viable version for '{goal}'."),
        "Build and launch a first experiment or landing page to collect interest.".to_string(),
        "Iterate based on feedback and set measurable milestones for the next 30 days."
            .to_string(),
    ];
    let length = i64::try_from(goal.chars().count()).unwrap_or(i64::MAX);
    GenerationResult::new(steps, length / 10)
}

/// Backend that always answers with [`fallback_result`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackBackend;

#[async_trait]
impl GenerationBackend for FallbackBackend {
    fn name(&self) -> &str {
        "fallback"
    }

    fn source(&self) -> GenerationSource {
        GenerationSource::Fallback
    }

    async fn generate(&self, goal: &str) -> Result<GenerationResult, BackendError> {
        Ok(fallback_result(goal))
    }
}
