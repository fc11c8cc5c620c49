//! Integration test: full streak lifecycle.
//!
//! Exercises the daily loop end to end across the streak, wallet, and
//! shop crates:
//! 1. Sync a user
//! 2. Complete tasks for a week, collecting milestone bonuses
//! 3. Buy a Streak Freeze during a shop window
//! 4. Miss a day and let the freeze bridge the gap
//! 5. Miss several days with no freeze left and reset

use cinder_db::queries::users;
use cinder_shop::ShopEngine;
use cinder_streak::{NoStoke, StreakEngine};
use cinder_types::{Clock, EngineError, FixedClock, STREAK_FREEZE_ITEM};
use cinder_wallet::{CoinLedger, WalletLedger};

/// 2024-06-15 00:00:00 UTC.
const BASE_TS: i64 = 1_718_409_600;

const SUBJECT: &str = "auth0|ember";

#[test]
fn week_of_streaks_survives_one_missed_day() {
    let mut conn = cinder_db::open_memory().expect("in-memory db should open");
    let clock = FixedClock::at(BASE_TS);
    let ledger = WalletLedger::new(clock.clone());
    let streaks = StreakEngine::new(clock.clone(), WalletLedger::new(clock.clone()), NoStoke);
    let shop = ShopEngine::new(clock.clone(), WalletLedger::new(clock.clone()));

    // =========================================================
    // Step 1: Sync the user
    // =========================================================
    let user = users::upsert(
        &conn,
        SUBJECT,
        "ember",
        "ember@example.com",
        clock.today(),
        clock.now_ts(),
    )
    .expect("user sync should succeed");
    assert_eq!(user.current_streak, 0);
    assert_eq!(user.coins, 0);

    // Creation counts as activity today; the week starts tomorrow.
    clock.advance_days(1);

    // =========================================================
    // Step 2: Complete a task every day for a week
    // =========================================================
    let mut total_awarded = 0;
    for day in 1..=7 {
        let outcome = streaks
            .complete_task(&mut conn, SUBJECT)
            .expect("daily completion should succeed");
        assert_eq!(outcome.status.current_streak, day);
        total_awarded += outcome.coins_awarded;
        if day < 7 {
            clock.advance_days(1);
        }
    }

    // Five plain days at 10, day 3 pays 30, day 7 pays 60.
    assert_eq!(total_awarded, 140);
    assert_eq!(
        ledger.balance(&conn, SUBJECT).expect("balance"),
        total_awarded
    );

    // =========================================================
    // Step 3: Buy a Streak Freeze during a shop window
    // =========================================================
    shop.open_window(&mut conn).expect("shop window should open");
    let catalog = shop.catalog(&conn).expect("catalog should load");
    let freeze = catalog
        .iter()
        .find(|item| item.name == STREAK_FREEZE_ITEM)
        .expect("seeded catalog must contain the Streak Freeze");

    // 140 coins cannot cover the 150 coin freeze; top up first.
    ledger
        .credit(&mut conn, SUBJECT, 60, "Promo top-up")
        .expect("credit");
    let purchase = shop
        .purchase(&mut conn, SUBJECT, freeze.id)
        .expect("freeze purchase should succeed");
    assert_eq!(purchase.balance, 50);

    // =========================================================
    // Step 4: Miss one day; the freeze bridges it
    // =========================================================
    clock.advance_days(2);
    let outcome = streaks
        .complete_task(&mut conn, SUBJECT)
        .expect("completion after the gap should succeed");
    assert!(outcome.status.freeze_consumed, "freeze must bridge the gap");
    assert_eq!(outcome.status.current_streak, 8);

    // A second completion the same day is rejected.
    match streaks.complete_task(&mut conn, SUBJECT) {
        Err(EngineError::Conflict(_)) => {}
        other => panic!("expected same-day conflict, got {other:?}"),
    }

    // =========================================================
    // Step 5: Miss several days with no freeze left
    // =========================================================
    clock.advance_days(3);
    let outcome = streaks
        .complete_task(&mut conn, SUBJECT)
        .expect("completion after the reset should succeed");
    assert!(!outcome.status.freeze_consumed);
    assert_eq!(outcome.status.current_streak, 1, "streak must restart at 1");
    assert_eq!(outcome.status.longest_streak, 8, "longest streak survives");

    // Every coin movement is on the ledger: 160 in completion credits,
    // a 60 coin top-up, and the 150 coin freeze.
    let history = ledger
        .transactions(&conn, SUBJECT, 100)
        .expect("transaction history");
    let signed_sum: i64 = history.iter().map(|tx| tx.amount).sum();
    assert_eq!(signed_sum, 70);
    assert_eq!(ledger.balance(&conn, SUBJECT).expect("balance"), 70);
}
