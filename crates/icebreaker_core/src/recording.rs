//! crates/icebreaker_core/src/recording.rs
//!
//! Submits a match outcome. The form is validated locally first; an invalid
//! form never produces a request.

use tracing::{error, info};

use crate::domain::NewMatch;
use crate::ports::{IceBreakerApi, PortError};
use crate::validation::{MatchForm, ValidationError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Failed to submit match result. Please try again. ({0})")]
    Submit(#[source] PortError),
}

pub async fn submit_match(api: &dyn IceBreakerApi, form: &MatchForm) -> Result<NewMatch, RecordError> {
    let new_match = form.validate()?;
    api.create_match(&new_match).await.map_err(|e| {
        error!(error = %e, "Error submitting match.");
        RecordError::Submit(e)
    })?;
    info!(
        winner = %new_match.winner_id,
        loser = %new_match.loser_id,
        category = %new_match.category_id,
        "Match recorded."
    );
    Ok(new_match)
}
