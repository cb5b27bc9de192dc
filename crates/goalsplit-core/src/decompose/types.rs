//! Result and error types shared by every generation backend.

use serde::Serialize;

use goalsplit_db::models::GenerationSource;

/// Number of steps every decomposition carries.
pub const STEP_COUNT: usize = 5;

/// Lowest complexity score.
pub const MIN_COMPLEXITY: i32 = 1;

/// Highest complexity score.
pub const MAX_COMPLEXITY: i32 = 10;

/// Clamp a raw complexity value into `MIN_COMPLEXITY..=MAX_COMPLEXITY`.
pub fn clamp_complexity(raw: i64) -> i32 {
    // In range after the clamp, so the narrowing cast is lossless.
    raw.clamp(i64::from(MIN_COMPLEXITY), i64::from(MAX_COMPLEXITY)) as i32
}

/// Five ordered steps and a complexity score for one goal.
///
/// The step count is fixed by the array type and the constructor clamps the
/// complexity, so every value of this type is well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    steps: [String; STEP_COUNT],
    complexity: i32,
}

impl GenerationResult {
    pub fn new(steps: [String; STEP_COUNT], complexity: i64) -> Self {
        Self {
            steps,
            complexity: clamp_complexity(complexity),
        }
    }

    pub fn steps(&self) -> &[String; STEP_COUNT] {
        &self.steps
    }

    /// Borrowed view of the steps, in the shape the `goals` insert expects.
    pub fn step_refs(&self) -> [&str; STEP_COUNT] {
        self.steps.each_ref().map(String::as_str)
    }

    pub fn complexity(&self) -> i32 {
        self.complexity
    }
}

/// A generation result together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    #[serde(flatten)]
    pub result: GenerationResult,
    pub source: GenerationSource,
}

/// Why a backend could not produce a result.
///
/// These never reach callers of [`super::GoalDecomposer::decompose`]; they
/// are logged and replaced by the fallback result.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to generation backend failed: {0}")]
    Transport(String),

    #[error("generation backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation backend returned no text")]
    EmptyResponse,

    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("response JSON is invalid: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response JSON has the wrong shape: {0}")]
    Shape(String),
}
