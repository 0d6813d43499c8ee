//! crates/icebreaker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP client and of where the session is stored.

use async_trait::async_trait;

use crate::domain::{
    Category, CategoryId, ChatExchange, Match, NewMatch, RankingEntry, Rating,
    RatingHistoryEntry, SignInRequest, SignUpRequest, User, UserId, UserUpdate,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, disk).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Request failed with status {status}: {message}")]
    Request { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl PortError {
    /// Errors that mean the referenced session user no longer exists or is rejected.
    pub fn invalidates_session(&self) -> bool {
        matches!(self, PortError::NotFound(_) | PortError::Unauthorized)
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The remote IceBreaker REST service. One method per resource; never retries.
#[async_trait]
pub trait IceBreakerApi: Send + Sync {
    // --- Authentication ---
    async fn sign_in(&self, credentials: &SignInRequest) -> PortResult<User>;

    async fn sign_up(&self, profile: &SignUpRequest) -> PortResult<User>;

    // --- Users ---
    async fn get_user(&self, user_id: &UserId) -> PortResult<User>;

    async fn search_users(&self, key: Option<&str>) -> PortResult<Vec<User>>;

    async fn update_user(&self, user_id: &UserId, update: &UserUpdate) -> PortResult<User>;

    // --- Categories ---
    async fn get_category(&self, category_id: &CategoryId) -> PortResult<Category>;

    async fn get_all_categories(&self) -> PortResult<Vec<Category>>;

    // --- Ratings ---
    async fn get_user_rating(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Rating>;

    async fn get_user_rating_history(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Vec<RatingHistoryEntry>>;

    // --- Matches ---
    async fn get_user_matches(&self, user_id: &UserId) -> PortResult<Vec<Match>>;

    async fn get_category_matches(&self, category_id: &CategoryId) -> PortResult<Vec<Match>>;

    async fn create_match(&self, new_match: &NewMatch) -> PortResult<()>;

    // --- Rankings ---
    async fn get_category_ranking(&self, category_id: &CategoryId)
        -> PortResult<Vec<RankingEntry>>;

    // --- Assistant chat ---
    async fn send_chat_message(&self, content: &str) -> PortResult<ChatExchange>;
}

/// Persistent string key/value storage for client state.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}
