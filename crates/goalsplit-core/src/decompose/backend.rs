//! The backend seams: raw text generation and goal decomposition.
//!
//! ```text
//! GoalDecomposer
//!     |
//!     v
//! dyn GenerationBackend ---- FallbackBackend (offline template)
//!     |
//!     +--- RemoteBackend --build_prompt--> dyn TextGenerator (GeminiClient, ...)
//!                        <--raw text----
//!                        parse_generation_response
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use goalsplit_db::models::GenerationSource;

use super::prompt::build_prompt;
use super::response::parse_generation_response;
use super::types::{BackendError, GenerationResult};

/// A service that completes a text prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short name used in logs (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the raw completion text. No retries.
    async fn generate_text(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Strategy that turns a goal into a [`GenerationResult`].
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Provenance recorded for results this backend produces.
    fn source(&self) -> GenerationSource;

    async fn generate(&self, goal: &str) -> Result<GenerationResult, BackendError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator, _: &dyn GenerationBackend) {}
};

/// Backend that prompts a [`TextGenerator`] and parses its answer.
#[derive(Clone)]
pub struct RemoteBackend {
    generator: Arc<dyn TextGenerator>,
}

impl RemoteBackend {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

impl std::fmt::Debug for RemoteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBackend")
            .field("generator", &self.generator.name())
            .finish()
    }
}

#[async_trait]
impl GenerationBackend for RemoteBackend {
    fn name(&self) -> &str {
        self.generator.name()
    }

    fn source(&self) -> GenerationSource {
        GenerationSource::Remote
    }

    async fn generate(&self, goal: &str) -> Result<GenerationResult, BackendError> {
        let prompt = build_prompt(goal);
        let text = self.generator.generate_text(&prompt).await?;
        parse_generation_response(&text, goal)
    }
}
