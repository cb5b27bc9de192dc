//! Goal service: validate, decompose, persist.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use goalsplit_db::models::{Goal, NewGoal};
use goalsplit_db::queries::goals;

use crate::decompose::GoalDecomposer;

/// Longest accepted `user_id`, matching the column width.
pub const MAX_USER_ID_LEN: usize = 128;

/// Request to decompose and store a goal.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGoalRequest {
    pub goal: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl NewGoalRequest {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            user_id: None,
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Errors from [`create_goal`].
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("goal is required")]
    EmptyGoal,

    #[error("user_id must be at most {} characters", MAX_USER_ID_LEN)]
    UserIdTooLong,

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Reject empty or whitespace-only goals.
pub fn validate_goal(goal: &str) -> Result<&str, GoalError> {
    if goal.trim().is_empty() {
        return Err(GoalError::EmptyGoal);
    }
    Ok(goal)
}

fn validate_user_id(user_id: Option<&str>) -> Result<Option<&str>, GoalError> {
    match user_id.map(str::trim).filter(|u| !u.is_empty()) {
        Some(u) if u.chars().count() > MAX_USER_ID_LEN => Err(GoalError::UserIdTooLong),
        other => Ok(other),
    }
}

/// Decompose the requested goal and store it.
///
/// The goal text is stored as submitted. Validation happens before the
/// decomposer runs, so a rejected request makes no outbound call.
pub async fn create_goal(
    pool: &PgPool,
    decomposer: &GoalDecomposer,
    request: &NewGoalRequest,
) -> Result<Goal, GoalError> {
    let goal_text = validate_goal(&request.goal)?;
    let user_id = validate_user_id(request.user_id.as_deref())?;

    let decomposition = decomposer.decompose(goal_text).await;

    let new_goal = NewGoal {
        goal_text,
        steps: decomposition.result.step_refs(),
        complexity: decomposition.result.complexity(),
        source: decomposition.source,
        user_id,
    };
    let goal = goals::insert_goal(pool, &new_goal).await?;

    info!(
        goal_id = goal.id,
        source = %goal.source,
        complexity = goal.complexity,
        "goal created"
    );
    Ok(goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_goals_rejected() {
        assert!(matches!(validate_goal(""), Err(GoalError::EmptyGoal)));
        assert!(matches!(validate_goal(" \t\n"), Err(GoalError::EmptyGoal)));
        assert_eq!(validate_goal(" Run ").unwrap(), " Run ");
    }

    #[test]
    fn user_id_normalization() {
        assert_eq!(validate_user_id(None).unwrap(), None);
        assert_eq!(validate_user_id(Some("  ")).unwrap(), None);
        assert_eq!(validate_user_id(Some(" user_1 ")).unwrap(), Some("user_1"));
    }

    #[test]
    fn user_id_length_limit() {
        let ok = "u".repeat(MAX_USER_ID_LEN);
        assert!(validate_user_id(Some(&ok)).is_ok());
        let too_long = "u".repeat(MAX_USER_ID_LEN + 1);
        assert!(matches!(
            validate_user_id(Some(&too_long)),
            Err(GoalError::UserIdTooLong)
        ));
    }

    #[test]
    fn request_deserializes_without_user() {
        let req: NewGoalRequest = serde_json::from_str(r#"{"goal": "Ship it"}"#).unwrap();
        assert_eq!(req.goal, "Ship it");
        assert!(req.user_id.is_none());
    }

    #[test]
    fn error_messages() {
        assert_eq!(GoalError::EmptyGoal.to_string(), "goal is required");
        assert_eq!(
            GoalError::UserIdTooLong.to_string(),
            "user_id must be at most 128 characters"
        );
    }
}
