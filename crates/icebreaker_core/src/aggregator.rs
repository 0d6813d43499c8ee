//! crates/icebreaker_core/src/aggregator.rs
//!
//! Builds the home/profile view model for one user by fanning out over the
//! `IceBreakerApi` port and merging the answers.
//!
//! Only the subject user, their match list and the category list are on the
//! critical path. Opponent lookups and per-category summaries are isolated per
//! item: a failed opponent becomes "Unknown", a missing rating drops its category.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    Category, CategoryId, EnhancedMatch, Match, Rank, RankingEntry, RatingSummary, User,
    UserDashboard, UserId,
};
use crate::fanout::{failure_count, settle_all};
use crate::ports::{IceBreakerApi, PortError, PortResult};

/// Win rate reported when the subject has a rating but no countable matches.
pub const DEFAULT_WIN_RATE: f64 = 0.5;

/// Display name used when an opponent cannot be resolved.
pub const UNKNOWN_OPPONENT: &str = "Unknown";

//=========================================================================================
// Options and Errors
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    /// How many of the most recent matches get annotated.
    pub recent_matches: usize,
}

impl DashboardOptions {
    /// The signed-in user's own home view.
    pub fn home() -> Self {
        Self { recent_matches: 5 }
    }

    /// Another player's profile view.
    pub fn profile() -> Self {
        Self { recent_matches: 10 }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::home()
    }
}

/// A failure on the critical path; the dashboard cannot be shown at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Dashboard unavailable: could not load user: {0}")]
    User(#[source] PortError),
    #[error("Dashboard unavailable: could not load matches: {0}")]
    Matches(#[source] PortError),
    #[error("Dashboard unavailable: could not load categories: {0}")]
    Categories(#[source] PortError),
}

impl DashboardError {
    pub fn port_error(&self) -> &PortError {
        match self {
            DashboardError::User(e) | DashboardError::Matches(e) | DashboardError::Categories(e) => e,
        }
    }
}

//=========================================================================================
// The Aggregator
//=========================================================================================

#[derive(Clone)]
pub struct DashboardAggregator {
    api: Arc<dyn IceBreakerApi>,
    options: DashboardOptions,
}

impl DashboardAggregator {
    pub fn new(api: Arc<dyn IceBreakerApi>, options: DashboardOptions) -> Self {
        Self { api, options }
    }

    /// Assembles the dashboard for `subject`.
    ///
    /// `current_user` is the signed-in user held in memory; when it is the
    /// subject the user lookup is skipped. A missing subject (no session) is a
    /// no-op and yields `Ok(None)`.
    pub async fn build_user_dashboard(
        &self,
        subject: Option<&UserId>,
        current_user: Option<&User>,
    ) -> Result<Option<UserDashboard>, DashboardError> {
        let Some(subject) = subject else {
            debug!("No subject for dashboard; nothing to load.");
            return Ok(None);
        };

        let user = self
            .resolve_user(subject, current_user)
            .await
            .map_err(DashboardError::User)?;

        let (matches, categories) = futures::join!(
            self.api.get_user_matches(subject),
            self.api.get_all_categories()
        );
        let mut matches = matches.map_err(DashboardError::Matches)?;
        matches.truncate(self.options.recent_matches);
        let categories = categories.map_err(DashboardError::Categories)?;

        let category_names: HashMap<CategoryId, String> = categories
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();

        let (enhanced_matches, rating_summaries) = futures::join!(
            self.enhance_matches(subject, matches, &category_names),
            self.summarize_ratings(subject, &categories)
        );

        info!(
            user_id = %subject,
            matches = enhanced_matches.len(),
            ratings = rating_summaries.len(),
            "Dashboard assembled."
        );

        Ok(Some(UserDashboard {
            user,
            rating_summaries,
            enhanced_matches,
        }))
    }

    async fn resolve_user(&self, subject: &UserId, current_user: Option<&User>) -> PortResult<User> {
        match current_user {
            Some(user) if &user.id == subject => Ok(user.clone()),
            _ => self.api.get_user(subject).await,
        }
    }

    async fn enhance_matches(
        &self,
        subject: &UserId,
        matches: Vec<Match>,
        category_names: &HashMap<CategoryId, String>,
    ) -> Vec<EnhancedMatch> {
        let opponents = settle_all(
            matches
                .iter()
                .map(|m| self.api.get_user(m.opponent_of(subject))),
        )
        .await;

        let failed = failure_count(&opponents);
        if failed > 0 {
            warn!(user_id = %subject, failed, "Some opponent lookups failed; using placeholders.");
        }

        matches
            .into_iter()
            .zip(opponents)
            .map(|(record, opponent)| enhance_match(subject, record, opponent, category_names))
            .collect()
    }

    async fn summarize_ratings(&self, subject: &UserId, categories: &[Category]) -> Vec<RatingSummary> {
        let settled = settle_all(
            categories
                .iter()
                .map(|category| self.summarize_category(subject, category)),
        )
        .await;

        categories
            .iter()
            .zip(settled)
            .filter_map(|(category, summary)| match summary {
                Ok(summary) => Some(summary),
                Err(e) => {
                    debug!(category = %category.id, error = %e, "No rating in category; skipping.");
                    None
                }
            })
            .collect()
    }

    /// Fails only when the subject has no rating in `category`.
    async fn summarize_category(&self, subject: &UserId, category: &Category) -> PortResult<RatingSummary> {
        let rating = self.api.get_user_rating(subject, &category.id).await?;

        let (ranking, category_matches) = futures::join!(
            self.api.get_category_ranking(&category.id),
            self.api.get_category_matches(&category.id)
        );

        let rank = match ranking {
            Ok(entries) => rank_in(&entries, subject),
            Err(e) => {
                warn!(category = %category.id, error = %e, "Ranking lookup failed.");
                Rank::Unavailable
            }
        };

        let win_rate = match category_matches {
            Ok(matches) => win_rate(&matches, subject),
            Err(e) => {
                warn!(category = %category.id, error = %e, "Category match lookup failed.");
                DEFAULT_WIN_RATE
            }
        };

        Ok(RatingSummary {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            color: category.color.clone(),
            rate: rating.rate,
            rank,
            win_rate,
        })
    }
}

//=========================================================================================
// Pure Merging Helpers
//=========================================================================================

/// Annotates one match from the subject's point of view.
pub fn enhance_match(
    subject: &UserId,
    record: Match,
    opponent: PortResult<User>,
    category_names: &HashMap<CategoryId, String>,
) -> EnhancedMatch {
    let is_winner = &record.winner_id == subject;
    let opponent_id = record.opponent_of(subject).clone();
    let (opponent_name, opponent_image) = match opponent {
        Ok(user) => (user.name, user.image),
        Err(_) => (UNKNOWN_OPPONENT.to_string(), None),
    };
    let category_name = category_names
        .get(&record.category_id)
        .cloned()
        .unwrap_or_else(|| record.category_id.to_string());
    let rating_change = record
        .rating_change
        .map(|change| if is_winner { change.winner } else { change.loser });

    EnhancedMatch {
        record,
        opponent_id,
        opponent_name,
        opponent_image,
        category_name,
        is_winner,
        rating_change,
    }
}

/// 1-based position of `subject` in a server-ordered ranking.
pub fn rank_in(entries: &[RankingEntry], subject: &UserId) -> Rank {
    entries
        .iter()
        .position(|entry| &entry.user_id == subject)
        .map(|index| Rank::Position(index as u32 + 1))
        .unwrap_or(Rank::Unranked)
}

/// Wins over matches involving `subject`, or `DEFAULT_WIN_RATE` if there are none.
pub fn win_rate(matches: &[Match], subject: &UserId) -> f64 {
    let (played, won) = matches
        .iter()
        .filter(|m| m.involves(subject))
        .fold((0usize, 0usize), |(played, won), m| {
            (played + 1, won + usize::from(&m.winner_id == subject))
        });

    if played == 0 {
        DEFAULT_WIN_RATE
    } else {
        won as f64 / played as f64
    }
}
