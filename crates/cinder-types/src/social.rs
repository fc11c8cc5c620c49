//! Social graph structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::user::PublicProfile;

/// Friendship progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipState {
    Pending,
    Accepted,
}

impl FriendshipState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            _ => None,
        }
    }
}

/// One row of a friends listing: the tie plus the counterpart's profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FriendEntry {
    pub state: FriendshipState,
    pub friend: PublicProfile,
}

/// Result of a friend request. Duplicates are absorbed, not rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestOutcome {
    Requested,
    AlreadyExists,
}

/// Result of creating today's synergy link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}

/// Today's synergy link as seen by one of its members.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynergyStatus {
    /// Username of the other member.
    pub partner: String,
    pub link_date: NaiveDate,
    pub boosted: bool,
}
