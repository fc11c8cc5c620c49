//! # cinder-wallet
//!
//! The coin ledger. Every balance change in Cinder flows through
//! [`WalletLedger::add_coins`], which updates the stored balance and
//! appends the matching `transactions` row in one database transaction.
//! The other engines receive the ledger through the narrow [`CoinLedger`]
//! trait rather than the concrete type.

use rusqlite::Connection;
use tracing::debug;

use cinder_db::queries::{users, wallet};
use cinder_db::DbError;
use cinder_types::wallet::{CoinReceipt, TransactionRecord};
use cinder_types::{Clock, EngineError};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Ledger capability handed to the other engines.
///
/// `credit` and `debit` take positive magnitudes. The ledger does not
/// enforce a balance floor; debiting callers check affordability first and
/// surface [`EngineError::InsufficientFunds`] themselves.
pub trait CoinLedger: Send + Sync {
    fn credit(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CoinReceipt>;

    fn debit(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CoinReceipt>;

    fn balance(&self, conn: &Connection, subject: &str) -> Result<i64>;
}

/// Production ledger over the `users` and `transactions` tables.
#[derive(Clone, Debug)]
pub struct WalletLedger<C> {
    clock: C,
}

impl<C: Clock> WalletLedger<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Apply a signed delta to the balance and append the matching ledger
    /// entry. Both writes commit together or not at all, which keeps the
    /// balance equal to the sum of the user's entries.
    pub fn add_coins(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CoinReceipt> {
        let now = self.clock.now_ts();
        let tx = conn.transaction().map_err(DbError::from)?;
        let user = users::get_by_subject(&tx, subject)?;
        let balance = user
            .coins
            .checked_add(amount)
            .ok_or_else(|| EngineError::Store("balance overflow".into()))?;
        users::set_balance(&tx, user.id, balance, now)?;
        wallet::append(&tx, user.id, amount, reason, now)?;
        tx.commit().map_err(DbError::from)?;

        debug!(subject, amount, balance, reason, "ledger entry appended");
        Ok(CoinReceipt {
            balance,
            amount,
            reason: reason.to_string(),
        })
    }

    /// Most recent ledger entries for a user.
    pub fn transactions(
        &self,
        conn: &Connection,
        subject: &str,
        limit: u32,
    ) -> Result<Vec<TransactionRecord>> {
        let user = users::get_by_subject(conn, subject)?;
        let rows = wallet::recent(conn, user.id, limit)?;
        Ok(rows
            .into_iter()
            .map(|r| TransactionRecord {
                amount: r.amount,
                reason: r.reason,
                created_at: r.created_at,
            })
            .collect())
    }
}

impl<C: Clock> CoinLedger for WalletLedger<C> {
    fn credit(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CoinReceipt> {
        self.add_coins(conn, subject, amount, reason)
    }

    fn debit(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
        reason: &str,
    ) -> Result<CoinReceipt> {
        self.add_coins(conn, subject, -amount, reason)
    }

    fn balance(&self, conn: &Connection, subject: &str) -> Result<i64> {
        Ok(users::get_by_subject(conn, subject)?.coins)
    }
}
