//! Goal decomposition: five steps and a complexity score for a goal.
//!
//! [`GoalDecomposer::decompose`] is total. It asks its backend for a result
//! and, on any [`BackendError`], logs the reason and answers with the
//! deterministic [`fallback_result`] instead. The returned
//! [`Decomposition`] says which path produced the steps.

pub mod backend;
pub mod fallback;
pub mod gemini;
pub mod prompt;
pub mod response;
pub mod types;

use std::sync::Arc;

use tracing::{debug, warn};

use goalsplit_db::models::GenerationSource;

pub use backend::{GenerationBackend, RemoteBackend, TextGenerator};
pub use fallback::{FallbackBackend, fallback_result, trim_goal};
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::build_prompt;
pub use response::{extract_json_object, parse_generation_response, strip_code_fences};
pub use types::{
    BackendError, Decomposition, GenerationResult, MAX_COMPLEXITY, MIN_COMPLEXITY, STEP_COUNT,
};

/// Runs one backend and degrades to the fallback generator on failure.
#[derive(Clone)]
pub struct GoalDecomposer {
    backend: Arc<dyn GenerationBackend>,
}

impl std::fmt::Debug for GoalDecomposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoalDecomposer")
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl GoalDecomposer {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Decomposer that never leaves the process.
    pub fn offline() -> Self {
        Self::new(Arc::new(FallbackBackend))
    }

    /// Decomposer backed by a remote text generator.
    pub fn remote(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Arc::new(RemoteBackend::new(generator)))
    }

    /// Gemini-backed when `config` carries an API key, offline otherwise.
    pub fn from_config(config: &GeminiConfig, http: reqwest::Client) -> Self {
        match GeminiClient::from_config(config, http) {
            Some(client) => Self::remote(Arc::new(client)),
            None => Self::offline(),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Decompose `goal`. Never fails.
    pub async fn decompose(&self, goal: &str) -> Decomposition {
        let backend = self.backend.name();
        let source = self.backend.source();

        match self.backend.generate(goal).await {
            Ok(result) => {
                debug!(backend, %source, complexity = result.complexity(), "goal decomposed");
                Decomposition { result, source }
            }
            Err(err) => {
                warn!(backend, error = %err, "generation backend failed, using fallback steps");
                Decomposition {
                    result: fallback_result(goal),
                    source: GenerationSource::Fallback,
                }
            }
        }
    }
}

impl Default for GoalDecomposer {
    fn default() -> Self {
        Self::offline()
    }
}

/// Hands out a decomposer per request.
///
/// `Configured` re-reads the API key from the environment on every call, so
/// setting or clearing `GOOGLE_API_KEY` takes effect without a restart.
/// `Fixed` always returns the same decomposer (tests, `--offline`).
#[derive(Debug, Clone)]
pub enum DecomposerSource {
    Configured {
        base: GeminiConfig,
        http: reqwest::Client,
    },
    Fixed(GoalDecomposer),
}

impl DecomposerSource {
    pub fn configured(base: GeminiConfig, http: reqwest::Client) -> Self {
        Self::Configured { base, http }
    }

    pub fn fixed(decomposer: GoalDecomposer) -> Self {
        Self::Fixed(decomposer)
    }

    /// The decomposer to use for the next request.
    pub fn current(&self) -> GoalDecomposer {
        match self {
            Self::Configured { base, http } => {
                GoalDecomposer::from_config(&base.with_env(), http.clone())
            }
            Self::Fixed(decomposer) => decomposer.clone(),
        }
    }
}
