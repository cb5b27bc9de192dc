use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Where a goal's steps and complexity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum GenerationSource {
    /// Produced by the remote text-generation backend.
    Remote,
    /// Produced by the deterministic offline generator.
    Fallback,
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Remote => "remote",
            Self::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

impl FromStr for GenerationSource {
    type Err = GenerationSourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(Self::Remote),
            "fallback" => Ok(Self::Fallback),
            other => Err(GenerationSourceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`GenerationSource`] string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid generation source: {0:?}")]
pub struct GenerationSourceParseError(pub String);

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A persisted goal with its five steps and complexity score.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub goal_text: String,
    pub step_one: Option<String>,
    pub step_two: Option<String>,
    pub step_three: Option<String>,
    pub step_four: Option<String>,
    pub step_five: Option<String>,
    pub complexity: i32,
    pub source: GenerationSource,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// The populated step columns, in order.
    pub fn steps(&self) -> Vec<&str> {
        [
            &self.step_one,
            &self.step_two,
            &self.step_three,
            &self.step_four,
            &self.step_five,
        ]
        .into_iter()
        .filter_map(|s| s.as_deref())
        .collect()
    }
}

/// Column values for a new `goals` row.
#[derive(Debug, Clone)]
pub struct NewGoal<'a> {
    pub goal_text: &'a str,
    pub steps: [&'a str; 5],
    pub complexity: i32,
    pub source: GenerationSource,
    pub user_id: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_goal() -> Goal {
        Goal {
            id: 7,
            goal_text: "Learn Rust".to_string(),
            step_one: Some("Read the book".to_string()),
            step_two: Some("Do rustlings".to_string()),
            step_three: None,
            step_four: Some("Build a CLI".to_string()),
            step_five: None,
            complexity: 4,
            source: GenerationSource::Remote,
            user_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn generation_source_display_roundtrip() {
        for v in [GenerationSource::Remote, GenerationSource::Fallback] {
            let parsed: GenerationSource = v.to_string().parse().expect("should parse");
            assert_eq!(v, parsed);
        }
    }

    #[test]
    fn generation_source_invalid() {
        let err = "gemini".parse::<GenerationSource>().unwrap_err();
        assert_eq!(err.to_string(), "invalid generation source: \"gemini\"");
    }

    #[test]
    fn generation_source_serializes_snake_case() {
        let json = serde_json::to_value(GenerationSource::Fallback).unwrap();
        assert_eq!(json, serde_json::json!("fallback"));
    }

    #[test]
    fn steps_skips_empty_columns() {
        let goal = sample_goal();
        assert_eq!(goal.steps(), vec!["Read the book", "Do rustlings", "Build a CLI"]);
    }

    #[test]
    fn goal_json_shape() {
        let json = serde_json::to_value(sample_goal()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["goal_text"], "Learn Rust");
        assert_eq!(json["step_three"], serde_json::Value::Null);
        assert_eq!(json["complexity"], 4);
        assert_eq!(json["source"], "remote");
        assert!(json["created_at"].is_string());
    }
}
