//! JSON-RPC server over Unix socket.
//!
//! Listens on a Unix domain socket, accepts connections, and dispatches
//! JSON-RPC method calls to the appropriate command handlers. Requests
//! and responses are newline-delimited JSON.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixListener;
use tracing::{debug, error, info, warn};

use cinder_types::EngineError;

use crate::commands;
use crate::DaemonState;

/// JSON-RPC request.
#[derive(Debug, Deserialize)]
pub struct RpcRequest {
    /// JSON-RPC version (must be "2.0").
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Method name.
    pub method: String,
    /// Parameters.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// JSON-RPC response.
#[derive(Debug, Serialize)]
pub struct RpcResponse {
    /// JSON-RPC version.
    pub jsonrpc: String,
    /// Request ID.
    pub id: serde_json::Value,
    /// Result or error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcError {
    /// Error code.
    pub code: i32,
    /// Error name.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Create a success response.
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: serde_json::Value, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

impl RpcError {
    // Standard JSON-RPC errors

    /// Parse error (-32700).
    pub fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "PARSE_ERROR".to_string(),
            data: None,
        }
    }

    /// Invalid request (-32600).
    pub fn invalid_request() -> Self {
        Self {
            code: -32600,
            message: "INVALID_REQUEST".to_string(),
            data: None,
        }
    }

    /// Method not found (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "METHOD_NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"method": method})),
        }
    }

    /// Invalid params (-32602).
    pub fn invalid_params(detail: &str) -> Self {
        Self {
            code: -32602,
            message: "INVALID_PARAMS".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Internal error (-32603).
    pub fn internal_error(detail: &str) -> Self {
        Self {
            code: -32603,
            message: "INTERNAL_ERROR".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    // Domain errors

    /// Not found (-32020).
    pub fn not_found(detail: &str) -> Self {
        Self {
            code: -32020,
            message: "NOT_FOUND".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Conflict (-32030).
    pub fn conflict(detail: &str) -> Self {
        Self {
            code: -32030,
            message: "CONFLICT".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }

    /// Insufficient funds (-32040).
    pub fn insufficient_funds(required: i64, available: i64) -> Self {
        Self {
            code: -32040,
            message: "INSUFFICIENT_FUNDS".to_string(),
            data: Some(serde_json::json!({"required": required, "available": available})),
        }
    }

    /// Invalid state (-32050).
    pub fn invalid_state(detail: &str) -> Self {
        Self {
            code: -32050,
            message: "INVALID_STATE".to_string(),
            data: Some(serde_json::json!({"detail": detail})),
        }
    }
}

impl From<EngineError> for RpcError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(what) => RpcError::not_found(&what),
            EngineError::Conflict(what) => RpcError::conflict(&what),
            EngineError::InsufficientFunds {
                required,
                available,
            } => RpcError::insufficient_funds(required, available),
            EngineError::InvalidState(what) => RpcError::invalid_state(&what),
            EngineError::Store(detail) => RpcError::internal_error(&detail),
        }
    }
}

/// The RPC server.
pub struct RpcServer {
    state: Arc<DaemonState>,
    socket_path: PathBuf,
}

impl RpcServer {
    /// Create a new RPC server.
    pub fn new(state: Arc<DaemonState>, socket_path: PathBuf) -> Self {
        Self { state, socket_path }
    }

    /// Run the server, accepting connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        // Remove stale socket file
        let _ = std::fs::remove_file(&self.socket_path);

        let listener = UnixListener::bind(&self.socket_path)?;
        info!("IPC server listening on {:?}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(state, stream).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection(
    state: Arc<DaemonState>,
    stream: tokio::net::UnixStream,
) -> anyhow::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break; // EOF
        }

        let response = match serde_json::from_str::<RpcRequest>(&line) {
            Ok(request) => dispatch_request(state.clone(), request).await,
            Err(_) => RpcResponse::error(serde_json::Value::Null, RpcError::parse_error()),
        };

        let mut response_json = serde_json::to_string(&response)?;
        response_json.push('\n');
        writer.write_all(response_json.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Dispatch a JSON-RPC request to the appropriate command handler.
async fn dispatch_request(state: Arc<DaemonState>, request: RpcRequest) -> RpcResponse {
    let id = request.id.clone();
    if request.jsonrpc != "2.0" {
        return RpcResponse::error(id, RpcError::invalid_request());
    }
    let method = request.method.as_str();

    debug!("Dispatching RPC method: {}", method);

    let result = match method {
        // Account commands
        "sync_user" => commands::profile::sync_user(&state, &request.params).await,
        "set_push_token" => commands::profile::set_push_token(&state, &request.params).await,

        // Wallet commands
        "get_balance" => commands::wallet::get_balance(&state, &request.params).await,
        "get_transactions" => commands::wallet::get_transactions(&state, &request.params).await,

        // Streak commands
        "check_streak" => commands::streak::check_streak(&state, &request.params).await,
        "complete_task" => commands::streak::complete_task(&state, &request.params).await,

        // Flash challenge commands
        "get_active_flash" => commands::flash::get_active_flash(&state).await,
        "start_flash_session" => commands::flash::start_flash_session(&state).await,
        "submit_flash_attempt" => {
            commands::flash::submit_flash_attempt(&state, &request.params).await
        }
        "get_flash_leaderboard" => {
            commands::flash::get_flash_leaderboard(&state, &request.params).await
        }

        // Shop commands
        "get_shop_status" => commands::shop::get_shop_status(&state).await,
        "start_shop_session" => commands::shop::start_shop_session(&state).await,
        "get_catalog" => commands::shop::get_catalog(&state).await,
        "purchase_item" => commands::shop::purchase_item(&state, &request.params).await,
        "get_inventory" => commands::shop::get_inventory(&state, &request.params).await,

        // Forge commands
        "get_crystal" => commands::forge::get_crystal(&state, &request.params).await,
        "start_forge" => commands::forge::start_forge(&state, &request.params).await,
        "claim_crystal" => commands::forge::claim_crystal(&state, &request.params).await,

        // Social commands
        "search_users" => commands::social::search_users(&state, &request.params).await,
        "send_friend_request" => {
            commands::social::send_friend_request(&state, &request.params).await
        }
        "get_friends" => commands::social::get_friends(&state, &request.params).await,
        "link_streak" => commands::social::link_streak(&state, &request.params).await,
        "get_active_synergy" => {
            commands::social::get_active_synergy(&state, &request.params).await
        }

        _ => Err(RpcError::method_not_found(method)),
    };

    match result {
        Ok(value) => RpcResponse::success(id, value),
        Err(err) => RpcResponse::error(id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_codes() {
        assert_eq!(RpcError::not_found("user 'x'").code, -32020);
        assert_eq!(RpcError::conflict("dup").code, -32030);
        assert_eq!(RpcError::insufficient_funds(150, 20).code, -32040);
        assert_eq!(RpcError::invalid_state("closed").code, -32050);
        assert_eq!(RpcError::method_not_found("nope").code, -32601);
    }

    #[test]
    fn test_engine_error_mapping() {
        let err: RpcError = EngineError::not_found("user 'ghost'").into();
        assert_eq!(err.code, -32020);
        assert_eq!(err.message, "NOT_FOUND");

        let err: RpcError = EngineError::InsufficientFunds {
            required: 150,
            available: 20,
        }
        .into();
        assert_eq!(err.code, -32040);
        let data = err.data.expect("funds data");
        assert_eq!(data["required"], 150);
        assert_eq!(data["available"], 20);

        let err: RpcError = EngineError::conflict("task already completed today").into();
        assert_eq!(err.code, -32030);

        let err: RpcError = EngineError::invalid_state("shop is closed").into();
        assert_eq!(err.code, -32050);

        let err: RpcError = EngineError::Store("disk gone".into()).into();
        assert_eq!(err.code, -32603);
    }

    #[test]
    fn test_rpc_response_shapes() {
        let resp = RpcResponse::success(serde_json::json!(1), serde_json::json!({"balance": 10}));
        assert!(resp.result.is_some());
        assert!(resp.error.is_none());

        let resp = RpcResponse::error(serde_json::json!(1), RpcError::internal_error("test"));
        assert!(resp.result.is_none());
        assert!(resp.error.is_some());
    }
}
