//! Integration test: notification sweeps pick the right cohorts.
//!
//! 1. Three users with push tokens in different activity states
//! 2. The reminder sweep hits everyone not yet active today
//! 3. The warning sweep hits only users with a live streak on the line
//! 4. Completing a task drops a user out of both cohorts

use std::sync::Mutex;

use cinder_db::queries::users;
use cinder_notify::{daily_reminder_sweep, streak_warning_sweep, Notifier};
use cinder_streak::{NoStoke, StreakEngine};
use cinder_types::{Clock, FixedClock};
use cinder_wallet::WalletLedger;

/// 2024-06-15 00:00:00 UTC.
const BASE_TS: i64 = 1_718_409_600;

/// Records every delivery address instead of sending.
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    fn addresses(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }

    fn clear(&self) {
        self.sent.lock().expect("lock").clear();
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, address: &str, _title: &str, _body: &str) -> bool {
        self.sent.lock().expect("lock").push(address.to_string());
        true
    }
}

#[test]
fn sweeps_follow_daily_activity() {
    let mut conn = cinder_db::open_memory().expect("in-memory db should open");
    let clock = FixedClock::at(BASE_TS);
    let streaks = StreakEngine::new(clock.clone(), WalletLedger::new(clock.clone()), NoStoke);
    let notifier = RecordingNotifier::new();

    // Step 1: three users, all with push tokens
    for name in ["ash", "brook", "cedar"] {
        let subject = format!("auth0|{name}");
        users::upsert(
            &conn,
            &subject,
            name,
            &format!("{name}@example.com"),
            clock.today(),
            clock.now_ts(),
        )
        .expect("user sync should succeed");
        users::set_push_token(&conn, &subject, &format!("token-{name}"), clock.now_ts())
            .expect("push token should register");
    }

    // Day 1: ash and brook start streaks, cedar stays idle.
    clock.advance_days(1);
    streaks
        .complete_task(&mut conn, "auth0|ash")
        .expect("ash completes");
    streaks
        .complete_task(&mut conn, "auth0|brook")
        .expect("brook completes");

    // Day 2: only ash completes again.
    clock.advance_days(1);
    streaks
        .complete_task(&mut conn, "auth0|ash")
        .expect("ash completes");

    // Step 2: the reminder sweep hits brook and cedar
    let sent = daily_reminder_sweep(&conn, &notifier, clock.today()).expect("reminder sweep");
    assert_eq!(sent, 2);
    let addresses = notifier.addresses();
    assert!(addresses.contains(&"token-brook".to_string()));
    assert!(addresses.contains(&"token-cedar".to_string()));
    assert!(!addresses.contains(&"token-ash".to_string()));

    // Step 3: the warning sweep hits only brook, whose streak is live
    notifier.clear();
    let sent = streak_warning_sweep(&conn, &notifier, clock.today()).expect("warning sweep");
    assert_eq!(sent, 1);
    assert_eq!(notifier.addresses(), vec!["token-brook".to_string()]);

    // Step 4: once brook completes, only idle cedar is reminded
    streaks
        .complete_task(&mut conn, "auth0|brook")
        .expect("brook completes");
    notifier.clear();
    let sent = daily_reminder_sweep(&conn, &notifier, clock.today()).expect("reminder sweep");
    assert_eq!(sent, 1);
    assert_eq!(notifier.addresses(), vec!["token-cedar".to_string()]);

    notifier.clear();
    let sent = streak_warning_sweep(&conn, &notifier, clock.today()).expect("warning sweep");
    assert_eq!(sent, 0, "no live streak is at risk anymore");
}
