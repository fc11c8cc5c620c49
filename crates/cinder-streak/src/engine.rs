//! Streak reconciliation and daily completion.

use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::{info, warn};

use cinder_db::queries::users::UserRow;
use cinder_db::queries::{inventory, social, users};
use cinder_db::DbError;
use cinder_types::user::{StreakStatus, TaskOutcome};
use cinder_types::{Clock, EngineError, STREAK_FREEZE_ITEM};
use cinder_wallet::CoinLedger;

use crate::rewards::{completion_award, SYNERGY_BONUS, SYNERGY_REASON};
use crate::{Result, StokeHook};

/// Advances and repairs user streaks.
///
/// All streak writes go through this engine; the daemon holds one
/// instance wired with the production clock, ledger, and forge hook.
#[derive(Clone, Debug)]
pub struct StreakEngine<C, L, S> {
    clock: C,
    ledger: L,
    stoker: S,
}

impl<C: Clock, L: CoinLedger, S: StokeHook> StreakEngine<C, L, S> {
    pub fn new(clock: C, ledger: L, stoker: S) -> Self {
        Self {
            clock,
            ledger,
            stoker,
        }
    }

    /// Reconcile the stored streak against the calendar and report it.
    ///
    /// A gap of more than one day consumes an unused Streak Freeze when
    /// the user owns one, moving the activity date to yesterday so the
    /// next completion continues the streak. Without a freeze the
    /// current streak drops to zero. Same-day and next-day reads change
    /// nothing.
    pub fn check_streak(&self, conn: &mut Connection, subject: &str) -> Result<StreakStatus> {
        let user = users::get_by_subject(conn, subject)?;
        let (user, freeze_consumed) = self.reconcile(conn, user)?;
        Ok(StreakStatus {
            current_streak: user.current_streak,
            longest_streak: user.longest_streak,
            last_active: user.last_active,
            freeze_consumed,
        })
    }

    /// Complete today's task: advance the streak, pay the daily and
    /// milestone reward, fire the synergy boost when both linked
    /// partners have now completed, and stoke the forge.
    ///
    /// At most one completion counts per calendar day; a second attempt
    /// is a conflict and changes nothing.
    pub fn complete_task(&self, conn: &mut Connection, subject: &str) -> Result<TaskOutcome> {
        let user = users::get_by_subject(conn, subject)?;
        let (user, freeze_consumed) = self.reconcile(conn, user)?;
        let today = self.clock.today();

        if user.last_active == today && user.current_streak > 0 {
            return Err(EngineError::conflict("task already completed today"));
        }

        let streak = user.current_streak + 1;
        let longest = streak.max(user.longest_streak);
        users::apply_completion(conn, user.id, streak, longest, today, self.clock.now_ts())?;

        let (award, reason) = completion_award(streak);
        self.ledger.credit(conn, subject, award, &reason)?;
        let mut coins_awarded = award;

        let synergy_boosted = self.apply_synergy(conn, user.id, subject, today)?;
        if synergy_boosted {
            coins_awarded += SYNERGY_BONUS;
        }

        // Completion stands even when the crystal cannot be stoked.
        if let Err(e) = self.stoker.stoke(conn, subject) {
            warn!(subject, error = %e, "forge stoke failed after completion");
        }

        info!(subject, streak, coins_awarded, "daily task completed");
        Ok(TaskOutcome {
            status: StreakStatus {
                current_streak: streak,
                longest_streak: longest,
                last_active: today,
                freeze_consumed,
            },
            coins_awarded,
            synergy_boosted,
        })
    }

    /// Repair a lapsed streak in place and return the row as repaired.
    fn reconcile(&self, conn: &mut Connection, user: UserRow) -> Result<(UserRow, bool)> {
        let today = self.clock.today();
        let gap = (today - user.last_active).num_days();
        if gap <= 1 {
            return Ok((user, false));
        }

        match inventory::unused_entry_by_name(conn, user.id, STREAK_FREEZE_ITEM)? {
            Some(entry_id) => {
                let yesterday = today.pred_opt().unwrap_or(today);
                let now = self.clock.now_ts();
                let tx = conn.transaction().map_err(DbError::from)?;
                inventory::mark_used(&tx, entry_id)?;
                users::set_last_active(&tx, user.id, yesterday, now)?;
                tx.commit().map_err(DbError::from)?;

                info!(
                    subject = %user.subject,
                    streak = user.current_streak,
                    "streak freeze consumed"
                );
                let mut user = user;
                user.last_active = yesterday;
                Ok((user, true))
            }
            None => {
                users::reset_streak(conn, user.id, self.clock.now_ts())?;
                info!(
                    subject = %user.subject,
                    gap,
                    lost = user.current_streak,
                    "streak broken"
                );
                let mut user = user;
                user.current_streak = 0;
                Ok((user, false))
            }
        }
    }

    /// Pay the synergy boost when today's link exists, has not fired,
    /// and both members have completed today. The completer is credited
    /// first, then the link is marked, then the partner is credited.
    fn apply_synergy(
        &self,
        conn: &mut Connection,
        user_id: i64,
        subject: &str,
        today: NaiveDate,
    ) -> Result<bool> {
        let link = match social::link_for_day(conn, user_id, today)? {
            Some(link) => link,
            None => return Ok(false),
        };
        if link.is_boosted || link.lo_last_active != today || link.hi_last_active != today {
            return Ok(false);
        }

        self.ledger
            .credit(conn, subject, SYNERGY_BONUS, SYNERGY_REASON)?;
        social::mark_boosted(conn, link.id)?;

        let partner_id = if link.user_lo == user_id {
            link.user_hi
        } else {
            link.user_lo
        };
        let partner = users::get_by_id(conn, partner_id)?;
        self.ledger
            .credit(conn, &partner.subject, SYNERGY_BONUS, SYNERGY_REASON)?;

        info!(subject, partner = %partner.subject, "synergy boost fired");
        Ok(true)
    }
}
