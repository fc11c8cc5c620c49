//! IPC command handlers.
//!
//! Each submodule implements the commands for one RPC category.

use serde::Serialize;
use serde_json::Value;

use crate::rpc::RpcError;

pub mod flash;
pub mod forge;
pub mod profile;
pub mod shop;
pub mod social;
pub mod streak;
pub mod wallet;

/// Serialize an API value into a JSON-RPC result.
fn to_json<T: Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::internal_error(&format!("serialize: {e}")))
}
