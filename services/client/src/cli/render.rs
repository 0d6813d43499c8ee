//! services/client/src/cli/render.rs
//!
//! Plain-text rendering of view models. Every function returns the full text
//! so callers decide where it goes.

use chrono::{DateTime, Utc};
use icebreaker_core::presentation::RatingHistoryRow;
use icebreaker_core::{Category, ChatExchange, EnhancedMatch, RankingEntry, User, UserDashboard};
use std::fmt::Write;

fn day(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn signed(change: f64) -> String {
    format!("{:+.1}", change)
}

pub fn user_line(user: &User) -> String {
    format!("{} (@{}) <{}>  id: {}", user.name, user.intra_name, user.email, user.id)
}

/// The dashboard as shown on the home and profile pages. `matches` is the
/// already-sorted match table.
pub fn dashboard(dashboard: &UserDashboard, matches: &[EnhancedMatch]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", user_line(&dashboard.user));
    if let Some(image) = &dashboard.user.image {
        let _ = writeln!(out, "image: {}", image);
    }

    let _ = writeln!(out, "\nRatings");
    if dashboard.rating_summaries.is_empty() {
        let _ = writeln!(out, "  no ratings yet");
    }
    for summary in &dashboard.rating_summaries {
        let _ = writeln!(
            out,
            "  {:<20} {:>8.1}  {:<16}  win rate {:>3.0}%",
            summary.category_name,
            summary.rate,
            summary.rank.to_string(),
            summary.win_rate * 100.0
        );
    }

    let _ = writeln!(out, "\nRecent matches");
    if matches.is_empty() {
        let _ = writeln!(out, "  no matches yet");
    }
    for m in matches {
        let outcome = if m.is_winner { "W" } else { "L" };
        let (own, theirs) = if m.is_winner {
            (m.record.winner_point, m.record.loser_point)
        } else {
            (m.record.loser_point, m.record.winner_point)
        };
        let change = m.rating_change.map(signed).unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {}  {}  {:>3}-{:<3} vs {:<20} {:<16} {}",
            day(&m.record.date),
            outcome,
            own,
            theirs,
            m.opponent_name,
            m.category_name,
            change
        );
    }
    out
}

pub fn users(users: &[User]) -> String {
    if users.is_empty() {
        return "No players found.\n".to_string();
    }
    users.iter().fold(String::new(), |mut out, user| {
        let _ = writeln!(out, "{}", user_line(user));
        out
    })
}

pub fn ranking(category: &Category, rows: &[(u32, &RankingEntry)]) -> String {
    let mut out = format!("{} ranking\n", category.name);
    if rows.is_empty() {
        out.push_str("  nobody matches\n");
    }
    for (position, entry) in rows {
        let name = entry.name.as_deref().unwrap_or(entry.user_id.as_str());
        let handle = entry
            .intra_name
            .as_deref()
            .map(|h| format!("@{}", h))
            .unwrap_or_default();
        let _ = writeln!(out, "  #{:<4} {:<20} {:<16} {:>8.1}", position, name, handle, entry.rate);
    }
    out
}

pub fn history(user: &User, category: &Category, rows: &[RatingHistoryRow]) -> String {
    let mut out = format!("{} in {}\n", user.name, category.name);
    match rows.first() {
        Some(latest) => {
            let _ = writeln!(out, "current rating {:.1}", latest.rate);
        }
        None => out.push_str("  no rating history\n"),
    }
    for row in rows {
        let _ = writeln!(out, "  {}  {:>8.1}  {}", day(&row.date), row.rate, signed(row.change));
    }
    out
}

pub fn categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.\n".to_string();
    }
    categories.iter().fold(String::new(), |mut out, category| {
        let _ = write!(out, "{}  {}", category.id, category.name);
        if let Some(description) = &category.description {
            let _ = write!(out, "  {}", description);
        }
        out.push('\n');
        out
    })
}

pub fn chat(exchange: &ChatExchange) -> String {
    format!("[{}] {}\n", exchange.datetime.format("%H:%M"), exchange.reply)
}
