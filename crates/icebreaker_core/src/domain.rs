//! crates/icebreaker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any HTTP client or serialization format;
//! adapters decode their wire payloads into these shapes.

use chrono::{DateTime, Utc};
use std::fmt;

//=========================================================================================
// Identifiers
//=========================================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Opaque server-issued identifier of a user.
    UserId
);
string_id!(
    /// Opaque server-issued identifier of a category.
    CategoryId
);
string_id!(
    /// Opaque server-issued identifier of a match.
    MatchId
);

//=========================================================================================
// Server-owned Entities
//=========================================================================================

/// A registered player.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// The player's handle, shown as `@intra_name`.
    pub intra_name: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A competitive discipline with its own rating pool and ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The current rating of one user in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating {
    pub id: String,
    pub user_id: UserId,
    pub category_id: CategoryId,
    pub rate: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One point of a user's rating history in a category.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistoryEntry {
    pub rate: f64,
    pub date: DateTime<Utc>,
}

/// Rating deltas the server attached to a match, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingChange {
    pub winner: f64,
    pub loser: f64,
}

/// A recorded match outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub winner_id: UserId,
    pub loser_id: UserId,
    pub category_id: CategoryId,
    pub winner_point: u32,
    pub loser_point: u32,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rating_change: Option<RatingChange>,
}

impl Match {
    /// Returns true if `user` took part in this match.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.winner_id == user || &self.loser_id == user
    }

    /// The party that is not `user`. Only meaningful when `involves(user)`.
    pub fn opponent_of(&self, user: &UserId) -> &UserId {
        if &self.winner_id == user {
            &self.loser_id
        } else {
            &self.winner_id
        }
    }
}

/// One row of a category ranking, in server order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingEntry {
    pub user_id: UserId,
    pub rate: f64,
    pub name: Option<String>,
    pub intra_name: Option<String>,
    pub image: Option<String>,
}

/// A message sent to the assistant chat together with its reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub datetime: DateTime<Utc>,
    pub content: String,
    pub reply: String,
}

//=========================================================================================
// Request Payloads
//=========================================================================================

#[derive(Debug, Clone)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SignUpRequest {
    pub name: String,
    pub intra_name: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
}

/// A partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub intra_name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.intra_name.is_none() && self.email.is_none() && self.image.is_none()
    }
}

/// A validated match outcome ready to be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub winner_id: UserId,
    pub loser_id: UserId,
    pub category_id: CategoryId,
    pub winner_point: u32,
    pub loser_point: u32,
    pub date: Option<DateTime<Utc>>,
}

//=========================================================================================
// Derived View Models (client-only)
//=========================================================================================

/// Where the subject sits in a category ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    /// 1-based position in the ranking list.
    Position(u32),
    /// The ranking was fetched but the subject is not in it.
    Unranked,
    /// The ranking lookup failed.
    Unavailable,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Position(n) => write!(f, "#{}", n),
            Rank::Unranked => f.write_str("unranked"),
            Rank::Unavailable => f.write_str("rank unavailable"),
        }
    }
}

/// Per-category summary of the subject's standing.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSummary {
    pub category_id: CategoryId,
    pub category_name: String,
    pub color: Option<String>,
    pub rate: f64,
    pub rank: Rank,
    /// Wins over matches involving the subject in this category.
    pub win_rate: f64,
}

/// A match annotated with opponent and category display data.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedMatch {
    pub record: Match,
    pub opponent_id: UserId,
    pub opponent_name: String,
    pub opponent_image: Option<String>,
    pub category_name: String,
    pub is_winner: bool,
    /// The subject's side of the server-supplied rating change.
    pub rating_change: Option<f64>,
}

/// Everything a home or profile page shows for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDashboard {
    pub user: User,
    pub rating_summaries: Vec<RatingSummary>,
    pub enhanced_matches: Vec<EnhancedMatch>,
}
