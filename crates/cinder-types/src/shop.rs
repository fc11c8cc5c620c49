//! Shop catalog, window, and inventory structures.

use serde::{Deserialize, Serialize};

/// Catalog item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Utility,
    Cosmetic,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utility => "utility",
            Self::Cosmetic => "cosmetic",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "utility" => Some(Self::Utility),
            "cosmetic" => Some(Self::Cosmetic),
            _ => None,
        }
    }
}

/// One entry of the read-only shop catalog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub category: ItemCategory,
    pub price: i64,
    pub description: String,
    pub icon: String,
}

/// A limited-time shop window.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShopWindow {
    pub id: i64,
    pub starts_at: i64,
    pub ends_at: i64,
}

/// Inventory entry joined with its catalog item. Entries whose consumable
/// has been used are not listed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnedItem {
    pub item: CatalogItem,
    pub quantity: i64,
    pub acquired_at: i64,
}

/// Outcome of a successful purchase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    pub item: CatalogItem,
    /// Balance after the debit.
    pub balance: i64,
}
