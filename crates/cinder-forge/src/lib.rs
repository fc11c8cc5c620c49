//! # cinder-forge
//!
//! The crystal forge. A user stakes coins on a crystal whose rarity is
//! fixed by the stake size, stokes it once per day (normally as a side
//! effect of completing the daily task), and claims the payout once it
//! matures. One non-claimed crystal per user at a time.

use rusqlite::Connection;
use tracing::info;

use cinder_db::queries::{crystals, users};
use cinder_types::forge::{Crystal, CrystalState, ForgePayout, Rarity};
use cinder_types::{Clock, EngineError};
use cinder_wallet::CoinLedger;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Progress added per stoke. Five stokes mature a crystal.
pub const STOKE_PROGRESS: i64 = 20;

/// Progress at which a crystal matures.
pub const MATURE_PROGRESS: i64 = 100;

/// Evolution stage cap.
pub const MAX_STAGE: i64 = 5;

/// Minimum stakes per rarity tier.
pub const LEGENDARY_STAKE: i64 = 500;
pub const EPIC_STAKE: i64 = 250;
pub const RARE_STAKE: i64 = 100;

const STAKE_REASON: &str = "Staked in the Crystal Forge";
const PAYOUT_REASON: &str = "Crystal Forge payout";

/// Rarity tier for a stake, fixed at forge time.
pub fn rarity_for_stake(amount: i64) -> Rarity {
    if amount >= LEGENDARY_STAKE {
        Rarity::Legendary
    } else if amount >= EPIC_STAKE {
        Rarity::Epic
    } else if amount >= RARE_STAKE {
        Rarity::Rare
    } else {
        Rarity::Common
    }
}

/// Claim payout: floor of `stake * (1.2 + 0.1 * stage)`, computed in
/// integer arithmetic.
pub fn payout_for(stake: i64, stage: i64) -> i64 {
    stake.saturating_mul(12 + stage) / 10
}

/// Runs the forge lifecycle.
#[derive(Clone, Debug)]
pub struct ForgeEngine<C, L> {
    clock: C,
    ledger: L,
}

impl<C: Clock, L: CoinLedger> ForgeEngine<C, L> {
    pub fn new(clock: C, ledger: L) -> Self {
        Self { clock, ledger }
    }

    /// The user's non-claimed crystal, if any.
    pub fn crystal(&self, conn: &Connection, subject: &str) -> Result<Option<Crystal>> {
        let user = users::get_by_subject(conn, subject)?;
        match crystals::open_for_user(conn, user.id)? {
            Some(row) => Ok(Some(crystal_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Stake coins on a fresh crystal. The stake must be positive, the
    /// user must have no open crystal, and the balance must cover it.
    pub fn start_forge(
        &self,
        conn: &mut Connection,
        subject: &str,
        amount: i64,
    ) -> Result<Crystal> {
        if amount <= 0 {
            return Err(EngineError::invalid_state("stake must be positive"));
        }
        let user = users::get_by_subject(conn, subject)?;
        if crystals::open_for_user(conn, user.id)?.is_some() {
            return Err(EngineError::conflict("a crystal is already forged"));
        }
        if user.coins < amount {
            return Err(EngineError::InsufficientFunds {
                required: amount,
                available: user.coins,
            });
        }

        self.ledger.debit(conn, subject, amount, STAKE_REASON)?;
        let rarity = rarity_for_stake(amount);
        let row = crystals::insert(conn, user.id, amount, rarity.as_str(), self.clock.now_ts())?;

        info!(subject, amount, rarity = rarity.as_str(), "crystal forged");
        crystal_from_row(row)
    }

    /// Advance the active crystal by one day's progress. No-op returning
    /// the current state when the crystal is missing, matured, or was
    /// already stoked today. At full progress the crystal matures: the
    /// stage climbs (capped) and progress resets.
    pub fn stoke(&self, conn: &mut Connection, subject: &str) -> Result<Option<Crystal>> {
        let user = users::get_by_subject(conn, subject)?;
        let row = match crystals::open_for_user(conn, user.id)? {
            Some(row) => row,
            None => return Ok(None),
        };
        let today = self.clock.today();
        if row.status != CrystalState::Active.as_str() || row.last_stoked_date == Some(today) {
            return Ok(Some(crystal_from_row(row)?));
        }

        let progress = row.evolution_progress + STOKE_PROGRESS;
        if progress >= MATURE_PROGRESS {
            let stage = (row.stage + 1).min(MAX_STAGE);
            crystals::record_stoke(
                conn,
                row.id,
                0,
                stage,
                CrystalState::Matured.as_str(),
                today,
                self.clock.now_ts(),
            )?;
            info!(subject, crystal = row.id, stage, "crystal matured");
        } else {
            crystals::record_stoke(
                conn,
                row.id,
                progress,
                row.stage,
                CrystalState::Active.as_str(),
                today,
                self.clock.now_ts(),
            )?;
        }

        Ok(Some(crystal_from_row(crystals::get(conn, row.id)?)?))
    }

    /// Claim a matured crystal: credit the payout and retire the crystal,
    /// freeing the slot for a new forge.
    pub fn claim(&self, conn: &mut Connection, subject: &str) -> Result<ForgePayout> {
        let user = users::get_by_subject(conn, subject)?;
        let row = crystals::open_for_user(conn, user.id)?
            .ok_or_else(|| EngineError::invalid_state("no crystal to claim"))?;
        if row.status != CrystalState::Matured.as_str() {
            return Err(EngineError::invalid_state("crystal is not matured"));
        }

        let payout = payout_for(row.staked_amount, row.stage);
        let receipt = self.ledger.credit(conn, subject, payout, PAYOUT_REASON)?;
        crystals::set_claimed(conn, row.id, self.clock.now_ts())?;

        info!(subject, crystal = row.id, payout, "crystal claimed");
        Ok(ForgePayout {
            payout,
            balance: receipt.balance,
        })
    }
}

impl<C: Clock, L: CoinLedger> cinder_streak::StokeHook for ForgeEngine<C, L> {
    fn stoke(&self, conn: &mut Connection, subject: &str) -> cinder_streak::Result<()> {
        ForgeEngine::stoke(self, conn, subject)?;
        Ok(())
    }
}

fn crystal_from_row(row: crystals::CrystalRow) -> Result<Crystal> {
    let rarity = Rarity::parse(&row.rarity)
        .ok_or_else(|| EngineError::Store(format!("unknown rarity '{}'", row.rarity)))?;
    let state = CrystalState::parse(&row.status)
        .ok_or_else(|| EngineError::Store(format!("unknown crystal status '{}'", row.status)))?;
    Ok(Crystal {
        id: row.id,
        staked: row.staked_amount,
        rarity,
        stage: row.stage,
        progress: row.evolution_progress,
        state,
        last_stoked: row.last_stoked_date,
    })
}
