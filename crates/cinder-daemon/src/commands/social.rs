//! Social command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Search other users by username or email substring.
pub async fn search_users(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let query = params
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("query required"))?;

    let db = state.db.lock().await;
    let profiles = state.social.search_users(&db, query, subject)?;

    super::to_json(&profiles)
}

/// Record a friend request toward another user.
pub async fn send_friend_request(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let friend_subject = params
        .get("friend_subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("friend_subject required"))?;

    let db = state.db.lock().await;
    let outcome = state.social.send_friend_request(&db, subject, friend_subject)?;

    Ok(serde_json::json!({"outcome": outcome}))
}

/// Every friendship involving the caller.
pub async fn get_friends(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let db = state.db.lock().await;
    let friends = state.social.friends(&db, subject)?;

    super::to_json(&friends)
}

/// Create today's synergy link with a friend.
pub async fn link_streak(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let friend_subject = params
        .get("friend_subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("friend_subject required"))?;

    let db = state.db.lock().await;
    let outcome = state.social.link_streak(&db, subject, friend_subject)?;

    Ok(serde_json::json!({"outcome": outcome}))
}

/// Today's synergy link for the caller, or null.
pub async fn get_active_synergy(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let db = state.db.lock().await;
    match state.social.active_synergy(&db, subject)? {
        Some(status) => super::to_json(&status),
        None => Ok(Value::Null),
    }
}
