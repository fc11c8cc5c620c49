//! Integration test: three users race one flash session.
//!
//! 1. A session opens with a seeded challenge
//! 2. Two correct answers and one wrong one come in
//! 3. Only correct answers are paid and ranked, fastest first
//! 4. The session expires but its leaderboard survives

use cinder_db::queries::{flash, users};
use cinder_flash::FlashEngine;
use cinder_types::{Clock, EngineError, FixedClock};
use cinder_wallet::{CoinLedger, WalletLedger};

/// 2024-06-15 00:00:00 UTC.
const BASE_TS: i64 = 1_718_409_600;

#[test]
fn fastest_correct_answer_leads_the_board() {
    let mut conn = cinder_db::open_memory().expect("in-memory db should open");
    let clock = FixedClock::at(BASE_TS);
    let ledger = WalletLedger::new(clock.clone());
    let flash_engine = FlashEngine::new(clock.clone(), WalletLedger::new(clock.clone()));

    for name in ["ash", "brook", "cedar"] {
        users::upsert(
            &conn,
            &format!("auth0|{name}"),
            name,
            &format!("{name}@example.com"),
            clock.today(),
            clock.now_ts(),
        )
        .expect("user sync should succeed");
    }

    // Step 1: open a session and learn its answer
    let session = flash_engine
        .open_session(&mut conn)
        .expect("flash session should open");
    assert_eq!(session.ends_at - session.starts_at, 3_600);
    assert_eq!(session.options.len(), 4);

    let grading = flash::grading(&conn, session.id, clock.now_ts())
        .expect("grading lookup")
        .expect("fresh session must be gradable");
    let correct = grading.correct_index;
    let wrong = (correct + 1) % session.options.len() as i64;

    // Step 2: three attempts with different speed and accuracy
    let attempt = flash_engine
        .submit_attempt(&mut conn, "auth0|ash", session.id, correct, 4_000)
        .expect("ash attempt");
    assert!(attempt.correct);
    let attempt = flash_engine
        .submit_attempt(&mut conn, "auth0|brook", session.id, correct, 1_500)
        .expect("brook attempt");
    assert!(attempt.correct);
    let attempt = flash_engine
        .submit_attempt(&mut conn, "auth0|cedar", session.id, wrong, 900)
        .expect("cedar attempt");
    assert!(!attempt.correct);
    assert_eq!(attempt.points_awarded, 0);

    // One attempt per user per session.
    match flash_engine.submit_attempt(&mut conn, "auth0|ash", session.id, correct, 100) {
        Err(EngineError::Conflict(_)) => {}
        other => panic!("expected duplicate-attempt conflict, got {other:?}"),
    }

    // Step 3: payouts and ranking
    assert_eq!(ledger.balance(&conn, "auth0|ash").expect("balance"), 50);
    assert_eq!(ledger.balance(&conn, "auth0|brook").expect("balance"), 50);
    assert_eq!(ledger.balance(&conn, "auth0|cedar").expect("balance"), 0);

    let board = flash_engine
        .leaderboard(&conn, session.id)
        .expect("leaderboard");
    assert_eq!(board.len(), 2, "wrong answers never rank");
    assert_eq!(board[0].username, "brook");
    assert_eq!(board[0].elapsed_ms, 1_500);
    assert_eq!(board[1].username, "ash");

    // Step 4: expiry closes grading but keeps the history
    clock.advance(3_601);
    assert!(flash_engine
        .active_session(&conn)
        .expect("session lookup")
        .is_none());
    match flash_engine.submit_attempt(&mut conn, "auth0|cedar", session.id, correct, 500) {
        Err(EngineError::InvalidState(_)) => {}
        other => panic!("expected expired-session rejection, got {other:?}"),
    }

    let board = flash_engine
        .leaderboard(&conn, session.id)
        .expect("leaderboard");
    assert_eq!(board.len(), 2, "history survives expiry");
}
