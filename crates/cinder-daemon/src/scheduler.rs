//! Notification scheduler.
//!
//! Runs the reminder and warning sweeps at their configured UTC hours.
//! Between firings the task sleeps; each firing locks the database for
//! the duration of one sweep.

use std::sync::Arc;

use tracing::{info, warn};

use cinder_types::Clock;

use crate::DaemonState;

/// Seconds per day.
pub const SECS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SweepKind {
    Reminder,
    Warning,
}

/// Seconds until the next occurrence of `hour` (UTC).
///
/// If the hour has already passed today (or is exactly now), the result
/// points at tomorrow's occurrence, so a sweep never fires twice in the
/// same second.
pub fn secs_until_hour(now_ts: i64, hour: u32) -> i64 {
    let target = i64::from(hour) * 3_600;
    let day_offset = now_ts.rem_euclid(SECS_PER_DAY);
    let wait = target - day_offset;
    if wait <= 0 {
        wait + SECS_PER_DAY
    } else {
        wait
    }
}

/// Run the scheduler loop.
pub async fn run(state: Arc<DaemonState>) {
    info!(
        reminder_hour = state.config.schedule.reminder_hour,
        warning_hour = state.config.schedule.warning_hour,
        "Notification scheduler started"
    );

    loop {
        let now = state.clock.now_ts();
        let reminder_wait = secs_until_hour(now, state.config.schedule.reminder_hour);
        let warning_wait = secs_until_hour(now, state.config.schedule.warning_hour);
        let (wait_secs, kind) = if reminder_wait <= warning_wait {
            (reminder_wait, SweepKind::Reminder)
        } else {
            (warning_wait, SweepKind::Warning)
        };

        tokio::time::sleep(std::time::Duration::from_secs(wait_secs.unsigned_abs())).await;

        let today = state.clock.today();
        let conn = state.db.lock().await;
        let outcome = match kind {
            SweepKind::Reminder => cinder_notify::daily_reminder_sweep(&conn, &state.notifier, today),
            SweepKind::Warning => cinder_notify::streak_warning_sweep(&conn, &state.notifier, today),
        };
        drop(conn);

        match outcome {
            Ok(count) => info!(?kind, count, "Notification sweep complete"),
            Err(e) => warn!(?kind, error = %e, "Notification sweep failed"),
        }
    }
}
