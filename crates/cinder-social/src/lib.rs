//! # cinder-social
//!
//! The social graph: friendships, daily streak links, and user search.
//! Pair rows are stored with the lower user id first, so both orderings
//! of the same pair land on one row and duplicate requests are absorbed
//! rather than rejected.
//!
//! The synergy bonus itself is paid by the streak engine at completion
//! time; this crate only maintains the links it reads.

use rusqlite::Connection;
use tracing::info;

use cinder_db::queries::{social, users};
use cinder_types::social::{
    FriendEntry, FriendRequestOutcome, FriendshipState, LinkOutcome, SynergyStatus,
};
use cinder_types::user::PublicProfile;
use cinder_types::{Clock, EngineError};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Search results are capped.
pub const SEARCH_LIMIT: u32 = 10;

/// Maintains friendships and streak links.
#[derive(Clone, Debug)]
pub struct SocialEngine<C> {
    clock: C,
}

impl<C: Clock> SocialEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Record a friend request between two users. Self-friending is a
    /// conflict; a duplicate request from either side is absorbed.
    pub fn send_friend_request(
        &self,
        conn: &Connection,
        from: &str,
        to: &str,
    ) -> Result<FriendRequestOutcome> {
        let requester = users::get_by_subject(conn, from)?;
        let target = users::get_by_subject(conn, to)?;
        if requester.id == target.id {
            return Err(EngineError::conflict("cannot friend yourself"));
        }

        let (lo, hi) = ordered_pair(requester.id, target.id);
        let created = social::add_friendship(conn, lo, hi, self.clock.now_ts())?;
        if created {
            info!(from, to, "friend request recorded");
            Ok(FriendRequestOutcome::Requested)
        } else {
            Ok(FriendRequestOutcome::AlreadyExists)
        }
    }

    /// Every friendship involving the user, pending and accepted alike.
    pub fn friends(&self, conn: &Connection, subject: &str) -> Result<Vec<FriendEntry>> {
        let user = users::get_by_subject(conn, subject)?;
        social::friends_of(conn, user.id)?
            .into_iter()
            .map(|row| {
                let state = FriendshipState::parse(&row.status).ok_or_else(|| {
                    EngineError::Store(format!("unknown friendship status '{}'", row.status))
                })?;
                Ok(FriendEntry {
                    state,
                    friend: PublicProfile {
                        subject: row.subject,
                        username: row.username,
                        current_streak: row.current_streak,
                    },
                })
            })
            .collect()
    }

    /// Create today's synergy link for the pair. The link is what makes
    /// both users' completions today eligible for the boost.
    pub fn link_streak(
        &self,
        conn: &Connection,
        subject: &str,
        friend_subject: &str,
    ) -> Result<LinkOutcome> {
        let user = users::get_by_subject(conn, subject)?;
        let friend = users::get_by_subject(conn, friend_subject)?;
        if user.id == friend.id {
            return Err(EngineError::conflict("cannot link with yourself"));
        }

        let (lo, hi) = ordered_pair(user.id, friend.id);
        let today = self.clock.today();
        let created = social::add_link(conn, lo, hi, today, self.clock.now_ts())?;
        if created {
            info!(subject, friend = friend_subject, day = %today, "streak link created");
            Ok(LinkOutcome::Linked)
        } else {
            Ok(LinkOutcome::AlreadyLinked)
        }
    }

    /// Today's link for the user, if any.
    pub fn active_synergy(&self, conn: &Connection, subject: &str) -> Result<Option<SynergyStatus>> {
        let user = users::get_by_subject(conn, subject)?;
        let today = self.clock.today();
        Ok(
            social::synergy_for_day(conn, user.id, today)?.map(|row| SynergyStatus {
                partner: row.partner_username,
                link_date: row.link_date,
                boosted: row.is_boosted,
            }),
        )
    }

    /// Case-insensitive substring search over usernames and emails,
    /// excluding the caller.
    pub fn search_users(
        &self,
        conn: &Connection,
        query: &str,
        subject: &str,
    ) -> Result<Vec<PublicProfile>> {
        let rows = users::search(conn, query, subject, SEARCH_LIMIT)?;
        Ok(rows
            .into_iter()
            .map(|u| PublicProfile {
                subject: u.subject,
                username: u.username,
                current_streak: u.current_streak,
            })
            .collect())
    }
}

fn ordered_pair(a: i64, b: i64) -> (i64, i64) {
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use cinder_types::FixedClock;

    use super::*;

    // 2024-06-15 00:00:00 UTC.
    const BASE_TS: i64 = 1_718_409_600;

    fn harness() -> (Connection, FixedClock, SocialEngine<FixedClock>) {
        let conn = cinder_db::open_memory().expect("open test db");
        let clock = FixedClock::at(BASE_TS);
        let engine = SocialEngine::new(clock.clone());
        (conn, clock, engine)
    }

    fn seed_user(conn: &Connection, clock: &FixedClock, subject: &str) {
        users::upsert(
            conn,
            subject,
            subject,
            &format!("{subject}@cinder.app"),
            clock.today(),
            clock.now_ts(),
        )
        .expect("seed user");
    }

    #[test]
    fn test_friend_request_round_trip() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");
        seed_user(&conn, &clock, "brook");

        let outcome = engine
            .send_friend_request(&conn, "ash", "brook")
            .expect("request");
        assert_eq!(outcome, FriendRequestOutcome::Requested);

        let ash_friends = engine.friends(&conn, "ash").expect("list");
        assert_eq!(ash_friends.len(), 1);
        assert_eq!(ash_friends[0].friend.username, "brook");
        assert_eq!(ash_friends[0].state, FriendshipState::Pending);

        // The tie is visible from both sides.
        let brook_friends = engine.friends(&conn, "brook").expect("list");
        assert_eq!(brook_friends.len(), 1);
        assert_eq!(brook_friends[0].friend.username, "ash");
    }

    #[test]
    fn test_duplicate_requests_absorbed_from_either_side() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");
        seed_user(&conn, &clock, "brook");

        engine
            .send_friend_request(&conn, "ash", "brook")
            .expect("first");
        let repeat = engine
            .send_friend_request(&conn, "ash", "brook")
            .expect("repeat");
        assert_eq!(repeat, FriendRequestOutcome::AlreadyExists);

        let reversed = engine
            .send_friend_request(&conn, "brook", "ash")
            .expect("reversed");
        assert_eq!(reversed, FriendRequestOutcome::AlreadyExists);

        assert_eq!(engine.friends(&conn, "ash").expect("list").len(), 1);
    }

    #[test]
    fn test_self_friending_is_conflict() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");

        let err = engine
            .send_friend_request(&conn, "ash", "ash")
            .expect_err("self friend");
        assert!(matches!(err, EngineError::Conflict(_)));
        assert!(engine.friends(&conn, "ash").expect("list").is_empty());
    }

    #[test]
    fn test_request_to_unknown_user() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");

        let err = engine
            .send_friend_request(&conn, "ash", "ghost")
            .expect_err("missing user");
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[test]
    fn test_link_streak_is_daily() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");
        seed_user(&conn, &clock, "brook");

        let outcome = engine
            .link_streak(&conn, "ash", "brook")
            .expect("link");
        assert_eq!(outcome, LinkOutcome::Linked);

        // Either side retrying today lands on the same link.
        let repeat = engine
            .link_streak(&conn, "brook", "ash")
            .expect("repeat");
        assert_eq!(repeat, LinkOutcome::AlreadyLinked);

        // A new day allows a new link.
        clock.advance_days(1);
        let next = engine.link_streak(&conn, "ash", "brook").expect("next day");
        assert_eq!(next, LinkOutcome::Linked);
    }

    #[test]
    fn test_self_link_is_conflict() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");

        let err = engine
            .link_streak(&conn, "ash", "ash")
            .expect_err("self link");
        assert!(matches!(err, EngineError::Conflict(_)));
    }

    #[test]
    fn test_active_synergy_reports_todays_link() {
        let (conn, clock, engine) = harness();
        seed_user(&conn, &clock, "ash");
        seed_user(&conn, &clock, "brook");
        assert!(engine.active_synergy(&conn, "ash").expect("none").is_none());

        engine.link_streak(&conn, "ash", "brook").expect("link");
        let status = engine
            .active_synergy(&conn, "brook")
            .expect("query")
            .expect("linked");
        assert_eq!(status.partner, "ash");
        assert_eq!(status.link_date, clock.today());
        assert!(!status.boosted);

        // Yesterday's link is not today's synergy.
        clock.advance_days(1);
        assert!(engine.active_synergy(&conn, "ash").expect("query").is_none());
    }

    #[test]
    fn test_search_excludes_caller_and_caps_results() {
        let (conn, clock, engine) = harness();
        for i in 0..12 {
            seed_user(&conn, &clock, &format!("ash{i:02}"));
        }
        seed_user(&conn, &clock, "brook");

        let hits = engine.search_users(&conn, "ash", "ash00").expect("search");
        assert_eq!(hits.len(), 10);
        assert!(hits.iter().all(|p| p.subject != "ash00"));
        assert!(hits.iter().all(|p| p.username.starts_with("ash")));
    }
}
