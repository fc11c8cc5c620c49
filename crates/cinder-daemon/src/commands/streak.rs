//! Streak command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Reconcile and report the caller's streak.
pub async fn check_streak(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let mut db = state.db.lock().await;
    let status = state.streaks.check_streak(&mut db, subject)?;

    super::to_json(&status)
}

/// Record today's task completion and pay out the streak reward.
pub async fn complete_task(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let mut db = state.db.lock().await;
    let outcome = state.streaks.complete_task(&mut db, subject)?;

    super::to_json(&outcome)
}
