//! # cinder-shop
//!
//! The limited-time shop. Items can only be bought while a 15-minute
//! window is open; windows are opened on demand and judged expired at
//! read time. Purchases debit the ledger and stack into the buyer's
//! inventory.

use rusqlite::Connection;
use tracing::info;

use cinder_db::queries::{catalog, inventory, shop, users};
use cinder_db::DbError;
use cinder_types::shop::{CatalogItem, ItemCategory, OwnedItem, PurchaseOutcome, ShopWindow};
use cinder_types::{Clock, EngineError};
use cinder_wallet::CoinLedger;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Windows stay open for fifteen minutes.
pub const SHOP_WINDOW_SECS: i64 = 900;

/// Runs shop windows and purchases.
#[derive(Clone, Debug)]
pub struct ShopEngine<C, L> {
    clock: C,
    ledger: L,
}

impl<C: Clock, L: CoinLedger> ShopEngine<C, L> {
    pub fn new(clock: C, ledger: L) -> Self {
        Self { clock, ledger }
    }

    /// Open a fresh window, deactivating any prior one in the same
    /// transaction.
    pub fn open_window(&self, conn: &mut Connection) -> Result<ShopWindow> {
        let now = self.clock.now_ts();
        let ends_at = now + SHOP_WINDOW_SECS;
        let tx = conn.transaction().map_err(DbError::from)?;
        shop::deactivate_all(&tx)?;
        let id = shop::insert(&tx, now, ends_at)?;
        tx.commit().map_err(DbError::from)?;

        info!(window = id, ends_at, "shop window opened");
        Ok(ShopWindow {
            id,
            starts_at: now,
            ends_at,
        })
    }

    /// The live window, if one exists and has not passed its end time.
    pub fn active_window(&self, conn: &Connection) -> Result<Option<ShopWindow>> {
        Ok(shop::active(conn, self.clock.now_ts())?.map(|w| ShopWindow {
            id: w.id,
            starts_at: w.start_time,
            ends_at: w.end_time,
        }))
    }

    /// Full catalog listing.
    pub fn catalog(&self, conn: &Connection) -> Result<Vec<CatalogItem>> {
        catalog::all(conn)?.into_iter().map(item_from_row).collect()
    }

    /// Buy one copy of an item. Checked in order: the window must be
    /// open, the item must exist, the buyer must afford it. The debit
    /// and the inventory upsert then run back to back.
    pub fn purchase(
        &self,
        conn: &mut Connection,
        subject: &str,
        item_id: i64,
    ) -> Result<PurchaseOutcome> {
        let now = self.clock.now_ts();
        shop::active(conn, now)?.ok_or_else(|| EngineError::invalid_state("shop is closed"))?;
        let item = catalog::get(conn, item_id)?;
        let user = users::get_by_subject(conn, subject)?;
        if user.coins < item.price {
            return Err(EngineError::InsufficientFunds {
                required: item.price,
                available: user.coins,
            });
        }

        let reason = format!("Purchased {}", item.name);
        let receipt = self.ledger.debit(conn, subject, item.price, &reason)?;
        inventory::acquire(conn, user.id, item.id, now)?;

        info!(subject, item = %item.name, price = item.price, "item purchased");
        Ok(PurchaseOutcome {
            item: item_from_row(item)?,
            balance: receipt.balance,
        })
    }

    /// The user's unused inventory, newest acquisitions first.
    pub fn inventory(&self, conn: &Connection, subject: &str) -> Result<Vec<OwnedItem>> {
        let user = users::get_by_subject(conn, subject)?;
        inventory::owned(conn, user.id)?
            .into_iter()
            .map(|r| {
                Ok(OwnedItem {
                    item: item_from_row(catalog::ItemRow {
                        id: r.item_id,
                        name: r.name,
                        category: r.category,
                        price: r.price,
                        description: r.description,
                        icon: r.icon,
                    })?,
                    quantity: r.quantity,
                    acquired_at: r.acquired_at,
                })
            })
            .collect()
    }
}

fn item_from_row(row: catalog::ItemRow) -> Result<CatalogItem> {
    let category = ItemCategory::parse(&row.category)
        .ok_or_else(|| EngineError::Store(format!("unknown item category '{}'", row.category)))?;
    Ok(CatalogItem {
        id: row.id,
        name: row.name,
        category,
        price: row.price,
        description: row.description,
        icon: row.icon,
    })
}

#[cfg(test)]
mod tests {
    use cinder_types::FixedClock;
    use cinder_wallet::WalletLedger;

    use super::*;

    // 2024-06-15 00:00:00 UTC.
    const BASE_TS: i64 = 1_718_409_600;
    const FREEZE_ITEM_ID: i64 = 1;

    fn harness() -> (Connection, FixedClock, ShopEngine<FixedClock, WalletLedger<FixedClock>>) {
        let conn = cinder_db::open_memory().expect("open test db");
        let clock = FixedClock::at(BASE_TS);
        let engine = ShopEngine::new(clock.clone(), WalletLedger::new(clock.clone()));
        (conn, clock, engine)
    }

    fn seed_user(conn: &Connection, clock: &FixedClock, subject: &str) {
        users::upsert(
            conn,
            subject,
            subject,
            &format!("{subject}@cinder.app"),
            clock.today(),
            clock.now_ts(),
        )
        .expect("seed user");
    }

    fn fund(conn: &mut Connection, clock: &FixedClock, subject: &str, amount: i64) {
        WalletLedger::new(clock.clone())
            .add_coins(conn, subject, amount, "seed")
            .expect("fund user");
    }

    fn coins(conn: &Connection, subject: &str) -> i64 {
        users::get_by_subject(conn, subject).expect("user").coins
    }

    #[test]
    fn test_window_opens_and_expires() {
        let (mut conn, clock, engine) = harness();
        let window = engine.open_window(&mut conn).expect("open");
        assert_eq!(window.ends_at - window.starts_at, SHOP_WINDOW_SECS);

        let live = engine
            .active_window(&conn)
            .expect("query")
            .expect("live window");
        assert_eq!(live.id, window.id);

        clock.advance(SHOP_WINDOW_SECS);
        assert!(engine.active_window(&conn).expect("query").is_none());
    }

    #[test]
    fn test_reopen_replaces_window() {
        let (mut conn, _clock, engine) = harness();
        let first = engine.open_window(&mut conn).expect("first");
        let second = engine.open_window(&mut conn).expect("second");
        assert_ne!(first.id, second.id);

        let live = engine
            .active_window(&conn)
            .expect("query")
            .expect("live window");
        assert_eq!(live.id, second.id);
    }

    #[test]
    fn test_catalog_lists_seeded_items() {
        let (conn, _clock, engine) = harness();
        let items = engine.catalog(&conn).expect("catalog");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Streak Freeze");
        assert_eq!(items[0].category, ItemCategory::Utility);
        assert_eq!(items[0].price, 150);
    }

    #[test]
    fn test_purchase_debits_and_stocks_inventory() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 200);
        engine.open_window(&mut conn).expect("open");

        let outcome = engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect("purchase");
        assert_eq!(outcome.item.name, "Streak Freeze");
        assert_eq!(outcome.balance, 50);
        assert_eq!(coins(&conn, "ember"), 50);

        let owned = engine.inventory(&conn, "ember").expect("inventory");
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].quantity, 1);

        let history = WalletLedger::new(clock.clone())
            .transactions(&conn, "ember", 1)
            .expect("history");
        assert_eq!(history[0].amount, -150);
        assert_eq!(history[0].reason, "Purchased Streak Freeze");
    }

    #[test]
    fn test_repeat_purchase_stacks_quantity() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 400);
        engine.open_window(&mut conn).expect("open");

        engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect("first");
        engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect("second");

        let owned = engine.inventory(&conn, "ember").expect("inventory");
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].quantity, 2);
        assert_eq!(coins(&conn, "ember"), 100);
    }

    #[test]
    fn test_purchase_needs_open_window() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 500);

        let err = engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect_err("closed shop");
        assert!(matches!(err, EngineError::InvalidState(_)));
        assert_eq!(coins(&conn, "ember"), 500);
        assert!(engine.inventory(&conn, "ember").expect("inventory").is_empty());
    }

    #[test]
    fn test_purchase_after_expiry_rejected() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 500);
        engine.open_window(&mut conn).expect("open");

        clock.advance(SHOP_WINDOW_SECS);
        let err = engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect_err("expired window");
        assert!(matches!(err, EngineError::InvalidState(_)));
    }

    #[test]
    fn test_purchase_unknown_item() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 500);
        engine.open_window(&mut conn).expect("open");

        let err = engine
            .purchase(&mut conn, "ember", 999)
            .expect_err("missing item");
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_overdraft_leaves_no_trace() {
        let (mut conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ember");
        fund(&mut conn, &clock, "ember", 100);
        engine.open_window(&mut conn).expect("open");

        let err = engine
            .purchase(&mut conn, "ember", FREEZE_ITEM_ID)
            .expect_err("cannot afford");
        match err {
            EngineError::InsufficientFunds {
                required,
                available,
            } => {
                assert_eq!(required, 150);
                assert_eq!(available, 100);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(coins(&conn, "ember"), 100);
        assert!(engine.inventory(&conn, "ember").expect("inventory").is_empty());
        let history = WalletLedger::new(clock.clone())
            .transactions(&conn, "ember", 10)
            .expect("history");
        assert_eq!(history.len(), 1, "only the seed credit is recorded");
    }
}
