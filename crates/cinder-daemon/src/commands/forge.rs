//! Crystal Forge command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// The caller's open crystal, or null.
pub async fn get_crystal(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let db = state.db.lock().await;
    match state.forge.crystal(&db, subject)? {
        Some(crystal) => super::to_json(&crystal),
        None => Ok(Value::Null),
    }
}

/// Stake coins on a new crystal.
pub async fn start_forge(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let amount = params
        .get("amount")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("amount required"))?;

    let mut db = state.db.lock().await;
    let crystal = state.forge.start_forge(&mut db, subject, amount)?;

    super::to_json(&crystal)
}

/// Claim a matured crystal's payout.
pub async fn claim_crystal(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let mut db = state.db.lock().await;
    let payout = state.forge.claim(&mut db, subject)?;

    super::to_json(&payout)
}
