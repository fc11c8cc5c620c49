//! Wallet command handlers.

use std::sync::Arc;

use serde_json::Value;

use cinder_wallet::CoinLedger;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Get the caller's coin balance.
pub async fn get_balance(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let db = state.db.lock().await;
    let balance = state.wallet.balance(&db, subject)?;

    Ok(serde_json::json!({"balance": balance}))
}

/// Get the caller's most recent ledger entries, newest first.
pub async fn get_transactions(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let limit = params
        .get("limit")
        .and_then(|v| v.as_u64())
        .map_or(50, |n| n.min(500) as u32);

    let db = state.db.lock().await;
    let records = state.wallet.transactions(&db, subject, limit)?;

    super::to_json(&records)
}
