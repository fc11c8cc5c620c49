//! # cinder-notify
//!
//! Scheduled notification sweeps. The sweep bodies live here and are
//! pure over the store plus a [`Notifier`]; the daemon owns the timers
//! that fire them. Delivery is a trait seam so no push provider SDK is
//! bound; the stock [`LogNotifier`] just logs each dispatch.

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::{info, warn};

use cinder_db::queries::users;
use cinder_types::EngineError;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Delivery seam. A `false` return means the send failed; sweeps log
/// and move on, so one dead token never stalls a cohort.
pub trait Notifier: Send + Sync {
    fn send(&self, address: &str, title: &str, body: &str) -> bool;
}

/// Logs every dispatch instead of delivering it. Used when no push
/// provider is wired.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, address: &str, title: &str, body: &str) -> bool {
        info!(address, title, body, "notification dispatched (log only)");
        true
    }
}

/// Remind every lapsed user with a push token to complete a task today.
/// Returns the number of successful sends.
pub fn daily_reminder_sweep(
    conn: &Connection,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> Result<usize> {
    let targets = users::reminder_targets(conn, today)?;
    let mut sent = 0;
    for target in &targets {
        let delivered = notifier.send(
            &target.push_token,
            "Don't lose your streak",
            "Complete a task today to keep your streak alive.",
        );
        if delivered {
            sent += 1;
        } else {
            warn!(subject = %target.subject, "reminder delivery failed");
        }
    }

    info!(candidates = targets.len(), sent, "daily reminder sweep finished");
    Ok(sent)
}

/// Warn every lapsed user whose live streak dies at midnight. Returns
/// the number of successful sends.
pub fn streak_warning_sweep(
    conn: &Connection,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> Result<usize> {
    let targets = users::warning_targets(conn, today)?;
    let mut sent = 0;
    for target in &targets {
        let body = format!(
            "Your {}-day streak resets at midnight. Complete a task now.",
            target.current_streak
        );
        let delivered = notifier.send(&target.push_token, "Streak at risk", &body);
        if delivered {
            sent += 1;
        } else {
            warn!(subject = %target.subject, "warning delivery failed");
        }
    }

    info!(candidates = targets.len(), sent, "streak warning sweep finished");
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every send; optionally refuses one address.
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, String)>>,
        refuse: Option<String>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                refuse: None,
            }
        }

        fn refusing(address: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                refuse: Some(address.to_string()),
            }
        }

        fn addresses(&self) -> Vec<String> {
            self.sent
                .lock()
                .expect("lock")
                .iter()
                .map(|(a, _)| a.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn send(&self, address: &str, _title: &str, body: &str) -> bool {
            if self.refuse.as_deref() == Some(address) {
                return false;
            }
            self.sent
                .lock()
                .expect("lock")
                .push((address.to_string(), body.to_string()));
            true
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    fn seed(conn: &Connection, subject: &str, last_active: &str, streak: i64, token: Option<&str>) {
        users::upsert(
            conn,
            subject,
            subject,
            &format!("{subject}@cinder.app"),
            day(last_active),
            0,
        )
        .expect("seed user");
        conn.execute(
            "UPDATE users SET current_streak = ?2, push_token = ?3 WHERE subject = ?1",
            rusqlite::params![subject, streak, token],
        )
        .expect("seed state");
    }

    #[test]
    fn test_reminder_sweep_targets_lapsed_with_tokens() {
        let conn = cinder_db::open_memory().expect("open test db");
        let today = day("2024-06-16");
        seed(&conn, "lapsed", "2024-06-15", 0, Some("tok-lapsed"));
        seed(&conn, "active", "2024-06-16", 3, Some("tok-active"));
        seed(&conn, "no-token", "2024-06-10", 2, None);

        let notifier = RecordingNotifier::new();
        let sent = daily_reminder_sweep(&conn, &notifier, today).expect("sweep");
        assert_eq!(sent, 1);
        assert_eq!(notifier.addresses(), ["tok-lapsed"]);
    }

    #[test]
    fn test_warning_sweep_needs_a_live_streak() {
        let conn = cinder_db::open_memory().expect("open test db");
        let today = day("2024-06-16");
        seed(&conn, "at-risk", "2024-06-15", 7, Some("tok-risk"));
        seed(&conn, "no-streak", "2024-06-15", 0, Some("tok-zero"));
        seed(&conn, "active", "2024-06-16", 5, Some("tok-active"));

        let notifier = RecordingNotifier::new();
        let sent = streak_warning_sweep(&conn, &notifier, today).expect("sweep");
        assert_eq!(sent, 1);
        assert_eq!(notifier.addresses(), ["tok-risk"]);

        let bodies: Vec<_> = notifier
            .sent
            .lock()
            .expect("lock")
            .iter()
            .map(|(_, b)| b.clone())
            .collect();
        assert!(bodies[0].contains("7-day streak"));
    }

    #[test]
    fn test_sweep_survives_delivery_failures() {
        let conn = cinder_db::open_memory().expect("open test db");
        let today = day("2024-06-16");
        seed(&conn, "a", "2024-06-15", 1, Some("tok-a"));
        seed(&conn, "b", "2024-06-15", 2, Some("tok-b"));
        seed(&conn, "c", "2024-06-15", 3, Some("tok-c"));

        let notifier = RecordingNotifier::refusing("tok-b");
        let sent = daily_reminder_sweep(&conn, &notifier, today).expect("sweep");
        assert_eq!(sent, 2, "failed sends are not counted");

        let mut addresses = notifier.addresses();
        addresses.sort_unstable();
        assert_eq!(addresses, ["tok-a", "tok-c"]);
    }

    #[test]
    fn test_empty_cohort_sends_nothing() {
        let conn = cinder_db::open_memory().expect("open test db");
        let notifier = RecordingNotifier::new();
        let sent = daily_reminder_sweep(&conn, &notifier, day("2024-06-16")).expect("sweep");
        assert_eq!(sent, 0);
        assert!(notifier.addresses().is_empty());
    }
}
