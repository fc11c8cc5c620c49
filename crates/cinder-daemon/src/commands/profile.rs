//! Account command handlers.

use std::sync::Arc;

use serde_json::Value;

use cinder_types::user::UserProfile;
use cinder_types::{Clock, EngineError};

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Create or refresh the caller's profile row.
pub async fn sync_user(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let username = params
        .get("username")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("username required"))?;
    let email = params
        .get("email")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("email required"))?;

    let db = state.db.lock().await;
    let row = cinder_db::queries::users::upsert(
        &db,
        subject,
        username,
        email,
        state.clock.today(),
        state.clock.now_ts(),
    )
    .map_err(EngineError::from)?;

    super::to_json(&UserProfile {
        subject: row.subject,
        username: row.username,
        email: row.email,
        coins: row.coins,
        current_streak: row.current_streak,
        longest_streak: row.longest_streak,
        last_active: row.last_active,
    })
}

/// Register the device push token used by the notification sweeps.
pub async fn set_push_token(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let token = params
        .get("token")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("token required"))?;

    let db = state.db.lock().await;
    cinder_db::queries::users::set_push_token(&db, subject, token, state.clock.now_ts())
        .map_err(EngineError::from)?;

    Ok(serde_json::json!({"status": "ok"}))
}
