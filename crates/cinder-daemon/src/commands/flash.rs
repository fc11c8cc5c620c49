//! Flash challenge command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Get the currently live flash session, or null.
pub async fn get_active_flash(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    match state.flash.active_session(&db)? {
        Some(session) => super::to_json(&session),
        None => Ok(Value::Null),
    }
}

/// Open a fresh flash session, replacing any live one.
pub async fn start_flash_session(state: &Arc<DaemonState>) -> Result {
    let mut db = state.db.lock().await;
    let session = state.flash.open_session(&mut db)?;

    super::to_json(&session)
}

/// Grade the caller's answer for a flash session.
pub async fn submit_flash_attempt(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let session_id = params
        .get("session_id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("session_id required"))?;
    let choice = params
        .get("choice")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("choice required"))?;
    let elapsed_ms = params
        .get("elapsed_ms")
        .and_then(|v| v.as_i64())
        .unwrap_or(0);

    let mut db = state.db.lock().await;
    let outcome = state
        .flash
        .submit_attempt(&mut db, subject, session_id, choice, elapsed_ms)?;

    super::to_json(&outcome)
}

/// Fastest correct answers for a session, best first.
pub async fn get_flash_leaderboard(state: &Arc<DaemonState>, params: &Value) -> Result {
    let session_id = params
        .get("session_id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("session_id required"))?;

    let db = state.db.lock().await;
    let entries = state.flash.leaderboard(&db, session_id)?;

    super::to_json(&entries)
}
