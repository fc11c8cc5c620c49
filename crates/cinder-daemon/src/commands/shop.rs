//! Shop command handlers.

use std::sync::Arc;

use serde_json::Value;

use crate::rpc::RpcError;
use crate::DaemonState;

type Result = std::result::Result<Value, RpcError>;

/// Whether a limited-time shop window is live right now.
pub async fn get_shop_status(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    match state.shop.active_window(&db)? {
        Some(window) => Ok(serde_json::json!({
            "open": true,
            "starts_at": window.starts_at,
            "ends_at": window.ends_at,
        })),
        None => Ok(serde_json::json!({"open": false})),
    }
}

/// Open a fresh shop window, replacing any live one.
pub async fn start_shop_session(state: &Arc<DaemonState>) -> Result {
    let mut db = state.db.lock().await;
    let window = state.shop.open_window(&mut db)?;

    Ok(serde_json::json!({
        "open": true,
        "starts_at": window.starts_at,
        "ends_at": window.ends_at,
    }))
}

/// Full item catalog.
pub async fn get_catalog(state: &Arc<DaemonState>) -> Result {
    let db = state.db.lock().await;
    let items = state.shop.catalog(&db)?;

    super::to_json(&items)
}

/// Buy one unit of a catalog item during a live window.
pub async fn purchase_item(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;
    let item_id = params
        .get("item_id")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| RpcError::invalid_params("item_id required"))?;

    let mut db = state.db.lock().await;
    let outcome = state.shop.purchase(&mut db, subject, item_id)?;

    super::to_json(&outcome)
}

/// Everything the caller owns, with quantities.
pub async fn get_inventory(state: &Arc<DaemonState>, params: &Value) -> Result {
    let subject = params
        .get("subject")
        .and_then(|v| v.as_str())
        .ok_or_else(|| RpcError::invalid_params("subject required"))?;

    let db = state.db.lock().await;
    let owned = state.shop.inventory(&db, subject)?;

    super::to_json(&owned)
}
