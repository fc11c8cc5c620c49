//! Crystal forge structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Crystal rarity tier, fixed at forge time from the staked amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Self::Common),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// Crystal lifecycle state. `Claimed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrystalState {
    Active,
    Matured,
    Claimed,
}

impl CrystalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Matured => "matured",
            Self::Claimed => "claimed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "matured" => Some(Self::Matured),
            "claimed" => Some(Self::Claimed),
            _ => None,
        }
    }
}

/// A user's crystal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Crystal {
    pub id: i64,
    pub staked: i64,
    pub rarity: Rarity,
    pub stage: i64,
    /// Evolution progress toward the next maturation, 0..100.
    pub progress: i64,
    pub state: CrystalState,
    pub last_stoked: Option<NaiveDate>,
}

/// Payout from claiming a matured crystal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForgePayout {
    pub payout: i64,
    /// Balance after the credit.
    pub balance: i64,
}
