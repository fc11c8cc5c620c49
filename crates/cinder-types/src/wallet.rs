//! Coin economy structures.

use serde::{Deserialize, Serialize};

/// Receipt for a ledger mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoinReceipt {
    /// Balance after the mutation.
    pub balance: i64,
    /// Signed delta that was applied.
    pub amount: i64,
    pub reason: String,
}

/// One append-only ledger entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub amount: i64,
    pub reason: String,
    pub created_at: i64,
}
