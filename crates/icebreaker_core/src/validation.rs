//! crates/icebreaker_core/src/validation.rs
//!
//! Local input checks that run before any request is issued.

use chrono::{DateTime, Utc};

use crate::domain::{CategoryId, NewMatch, SignInRequest, SignUpRequest, UserId, UserUpdate};

/// Minimum trimmed length of a user search term.
pub const MIN_SEARCH_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a winner")]
    MissingWinner,
    #[error("Please select a loser")]
    MissingLoser,
    #[error("Winner and loser cannot be the same person")]
    SamePlayer,
    #[error("Please select a category")]
    MissingCategory,
    #[error("Winner points must be greater than loser points")]
    PointsNotGreater,
    #[error("Search term must be at least {0} characters")]
    SearchTooShort(usize),
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Nothing to update")]
    EmptyUpdate,
}

/// The match-recording form as the viewer filled it in.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchForm {
    pub winner: Option<UserId>,
    pub loser: Option<UserId>,
    pub category: Option<CategoryId>,
    pub winner_point: u32,
    pub loser_point: u32,
    pub date: Option<DateTime<Utc>>,
}

impl Default for MatchForm {
    fn default() -> Self {
        Self {
            winner: None,
            loser: None,
            category: None,
            winner_point: 10,
            loser_point: 0,
            date: None,
        }
    }
}

impl MatchForm {
    /// Checks the form in the order the viewer reads it and builds the payload.
    pub fn validate(&self) -> Result<NewMatch, ValidationError> {
        let winner = self.winner.as_ref().ok_or(ValidationError::MissingWinner)?;
        let loser = self.loser.as_ref().ok_or(ValidationError::MissingLoser)?;
        if winner == loser {
            return Err(ValidationError::SamePlayer);
        }
        let category = self.category.as_ref().ok_or(ValidationError::MissingCategory)?;
        if self.winner_point <= self.loser_point {
            return Err(ValidationError::PointsNotGreater);
        }

        Ok(NewMatch {
            winner_id: winner.clone(),
            loser_id: loser.clone(),
            category_id: category.clone(),
            winner_point: self.winner_point,
            loser_point: self.loser_point,
            date: self.date,
        })
    }
}

/// Trims a search term and rejects it when too short to be useful.
pub fn search_term(raw: &str) -> Result<&str, ValidationError> {
    let term = raw.trim();
    if term.chars().count() < MIN_SEARCH_LEN {
        return Err(ValidationError::SearchTooShort(MIN_SEARCH_LEN));
    }
    Ok(term)
}

pub fn chat_message(raw: &str) -> Result<&str, ValidationError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(message)
}

pub fn sign_in(request: &SignInRequest) -> Result<(), ValidationError> {
    require("Email", &request.email)?;
    require("Password", &request.password)
}

pub fn sign_up(request: &SignUpRequest) -> Result<(), ValidationError> {
    require("Name", &request.name)?;
    require("Intra name", &request.intra_name)?;
    require("Email", &request.email)?;
    require("Password", &request.password)
}

pub fn user_update(update: &UserUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    Ok(())
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}
