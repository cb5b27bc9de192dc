//! Instruction sent to the remote text-generation backend.

use super::types::{MAX_COMPLEXITY, MIN_COMPLEXITY, STEP_COUNT};

/// Build the instruction asking for a JSON object with `steps` and
/// `complexity` and nothing else.
pub fn build_prompt(goal: &str) -> String {
    let goal = goal.trim();
    format!(
        "You turn a vague goal into exactly {STEP_COUNT} concise, actionable steps \
         and a complexity score.\n\
         \n\
         Rules:\n\
         - Return strictly {STEP_COUNT} steps, ordered as they should be done.\n\
         - Rate the complexity of the goal as one integer from {MIN_COMPLEXITY} to {MAX_COMPLEXITY}.\n\
         - Respond with a single JSON object with keys \"steps\" (array of {STEP_COUNT} strings) \
         and \"complexity\" (integer).\n\
         - Do not add commentary, explanations, or markdown code fences.\n\
         \n\
         Goal: {goal}\n\
         \n\
         JSON:"
    )
}
