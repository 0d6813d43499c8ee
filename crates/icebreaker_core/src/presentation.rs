//! crates/icebreaker_core/src/presentation.rs
//!
//! Display-side helpers: sorting the match table, filtering a ranking, and
//! deriving per-entry changes for a rating history. Nothing here calls out.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::domain::{EnhancedMatch, RankingEntry, RatingHistoryEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSortKey {
    Date,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// The match table's sort state; newest first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSort {
    pub key: MatchSortKey,
    pub order: SortOrder,
}

impl Default for MatchSort {
    fn default() -> Self {
        Self {
            key: MatchSortKey::Date,
            order: SortOrder::Desc,
        }
    }
}

impl MatchSort {
    /// Clicking the active column flips the order; another column starts descending.
    pub fn toggle(&mut self, key: MatchSortKey) {
        if self.key == key {
            self.order = self.order.flipped();
        } else {
            self.key = key;
            self.order = SortOrder::Desc;
        }
    }

    /// Stable sort, so equal keys keep the aggregator's order.
    pub fn apply(&self, matches: &mut [EnhancedMatch]) {
        matches.sort_by(|a, b| {
            let ordering = match self.key {
                MatchSortKey::Date => a.record.date.cmp(&b.record.date),
                MatchSortKey::Category => compare_names(&a.category_name, &b.category_name),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

/// Ranking rows whose name or handle contains `term` (case-insensitive),
/// each paired with its 1-based position in the unfiltered list.
pub fn filter_ranking<'a>(entries: &'a [RankingEntry], term: &str) -> Vec<(u32, &'a RankingEntry)> {
    let needle = term.trim().to_lowercase();
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| (index as u32 + 1, entry))
        .filter(|(_, entry)| {
            needle.is_empty()
                || [entry.name.as_deref(), entry.intra_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistoryRow {
    pub rate: f64,
    pub date: DateTime<Utc>,
    /// Difference to the next older entry; zero for the oldest.
    pub change: f64,
}

/// Orders a history newest first and computes the change each entry made.
pub fn rating_history_rows(mut entries: Vec<RatingHistoryEntry>) -> Vec<RatingHistoryRow> {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
    let older_rates: Vec<Option<f64>> = entries
        .iter()
        .skip(1)
        .map(|e| Some(e.rate))
        .chain(std::iter::once(None))
        .collect();

    entries
        .into_iter()
        .zip(older_rates)
        .map(|(entry, older)| RatingHistoryRow {
            rate: entry.rate,
            date: entry.date,
            change: older.map(|older| entry.rate - older).unwrap_or(0.0),
        })
        .collect()
}
