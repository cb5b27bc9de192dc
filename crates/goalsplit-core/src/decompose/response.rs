//! Turning free-form model output into a [`GenerationResult`].
//!
//! Models tend to wrap JSON in code fences or surround it with chatter, so
//! the text is cleaned up before parsing:
//!
//! 1. strip a surrounding code fence (with optional language tag),
//! 2. cut from the first `{` to the last `}`,
//! 3. parse as JSON and check `steps` / `complexity` types,
//! 4. keep at most five steps, pad with placeholders, clamp complexity.

use serde_json::{Map, Value};

use super::fallback::trim_goal;
use super::types::{BackendError, GenerationResult, STEP_COUNT};

/// Remove a surrounding ```` ``` ```` fence, including a language tag such
/// as `json` on the opening line.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            _ => rest,
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

fn is_language_tag(tag: &str) -> bool {
    tag.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

/// The inclusive span from the first `{` to the last `}`, if any.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Placeholder used when the model returned fewer than five steps.
pub fn placeholder_step(goal: &str) -> String {
    format!(
        "Break down '{}' further and define the next concrete action.",
        trim_goal(goal)
    )
}

/// Parse raw model output for `goal` into a normalized result.
pub fn parse_generation_response(raw: &str, goal: &str) -> Result<GenerationResult, BackendError> {
    let text = strip_code_fences(raw);
    let candidate = extract_json_object(text).ok_or(BackendError::NoJsonObject)?;

    let value: Value = serde_json::from_str(candidate)?;
    let object = value
        .as_object()
        .ok_or_else(|| BackendError::Shape("expected a JSON object".to_string()))?;

    let steps = read_steps(object)?;
    let complexity = read_complexity(object)?;

    Ok(normalize(steps, complexity, goal))
}

fn read_steps(object: &Map<String, Value>) -> Result<Vec<String>, BackendError> {
    let items = object
        .get("steps")
        .and_then(Value::as_array)
        .ok_or_else(|| BackendError::Shape("`steps` must be an array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| BackendError::Shape(format!("`steps[{i}]` is not a string")))
        })
        .collect()
}

/// Integers are taken as-is; fractional values are truncated toward zero.
fn read_complexity(object: &Map<String, Value>) -> Result<i64, BackendError> {
    let Some(Value::Number(number)) = object.get("complexity") else {
        return Err(BackendError::Shape(
            "`complexity` must be a number".to_string(),
        ));
    };

    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    if number.is_u64() {
        return Ok(i64::MAX);
    }
    // `as` saturates out-of-range floats.
    Ok(number.as_f64().map(|f| f.trunc() as i64).unwrap_or(0))
}

fn normalize(steps: Vec<String>, complexity: i64, goal: &str) -> GenerationResult {
    let mut steps = steps.into_iter().take(STEP_COUNT);
    let steps: [String; STEP_COUNT] =
        std::array::from_fn(|_| steps.next().unwrap_or_else(|| placeholder_step(goal)));
    GenerationResult::new(steps, complexity)
}
