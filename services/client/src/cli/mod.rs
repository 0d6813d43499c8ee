//! services/client/src/cli/mod.rs
//!
//! The command-line surface. Each subcommand plays the part of one page of the
//! IceBreaker client: it gathers its data through the core and prints it.

pub mod commands;
pub mod render;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use icebreaker_core::presentation::{MatchSort, MatchSortKey, SortOrder};

pub use commands::App;

#[derive(Debug, Parser)]
#[command(name = "icebreaker", version, about = "Matchmaking and rating tracker client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Sign in and remember the session.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ICEBREAKER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in with it.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        intra_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ICEBREAKER_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        image: Option<String>,
    },
    /// Forget the stored session.
    Signout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Your own dashboard.
    Home {
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Another player's profile.
    User {
        user_id: String,
        #[command(flatten)]
        sort: SortArgs,
    },
    /// Find players by name or handle.
    Search { term: String },
    /// The leaderboard of one category.
    Ranking {
        category_id: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// A player's rating over time in one category.
    History { user_id: String, category_id: String },
    /// Record the outcome of a match.
    Record {
        #[arg(long)]
        winner: String,
        #[arg(long)]
        loser: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value_t = 10)]
        winner_points: u32,
        #[arg(long, default_value_t = 0)]
        loser_points: u32,
        /// RFC 3339 timestamp or YYYY-MM-DD; the server's clock when omitted.
        #[arg(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
    },
    /// List all categories.
    Categories,
    /// Change fields of your profile.
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        intra_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Ask the assistant a question.
    Chat { message: String },
}

impl Command {
    /// Whether the command is only reachable with a session.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            Command::Signin { .. } | Command::Signup { .. } | Command::Signout | Command::Whoami
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortKeyArg {
    Date,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Args)]
pub struct SortArgs {
    #[arg(long, value_enum, default_value_t = SortKeyArg::Date)]
    pub sort: SortKeyArg,
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,
}

impl From<SortArgs> for MatchSort {
    fn from(args: SortArgs) -> Self {
        MatchSort {
            key: match args.sort {
                SortKeyArg::Date => MatchSortKey::Date,
                SortKeyArg::Category => MatchSortKey::Category,
            },
            order: match args.order {
                OrderArg::Asc => SortOrder::Asc,
                OrderArg::Desc => SortOrder::Desc,
            },
        }
    }
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is neither RFC 3339 nor YYYY-MM-DD", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("icebreaker").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn record_defaults_points() {
        match parse(&["record", "--winner", "a", "--loser", "b", "--category", "c"]) {
            Command::Record {
                winner_points,
                loser_points,
                date,
                ..
            } => {
                assert_eq!((winner_points, loser_points), (10, 0));
                assert!(date.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn dates_accept_plain_days() {
        let day = parse_date("2024-03-01").unwrap();
        assert_eq!(day.to_rfc3339(), "2024-03-01T00:00:00+00:00");
        assert!(parse_date("March first").is_err());
    }

    #[test]
    fn sort_flags_map_to_match_sort() {
        match parse(&["user", "u1", "--sort", "category", "--order", "asc"]) {
            Command::User { user_id, sort } => {
                assert_eq!(user_id, "u1");
                let sort = MatchSort::from(sort);
                assert_eq!(sort.key, MatchSortKey::Category);
                assert_eq!(sort.order, SortOrder::Asc);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        match parse(&["home"]) {
            Command::Home { sort } => assert_eq!(MatchSort::from(sort), MatchSort::default()),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn only_account_commands_are_public() {
        assert!(!parse(&["signout"]).is_protected());
        assert!(!parse(&["whoami"]).is_protected());
        assert!(parse(&["categories"]).is_protected());
        assert!(parse(&["chat", "hello"]).is_protected());
    }
}
