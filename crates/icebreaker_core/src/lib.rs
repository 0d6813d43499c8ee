pub mod aggregator;
pub mod auth;
pub mod domain;
pub mod fanout;
pub mod latest;
pub mod ports;
pub mod presentation;
pub mod recording;
pub mod session;
pub mod validation;
pub mod view;

#[cfg(test)]
mod testing;

pub use aggregator::{DashboardAggregator, DashboardError, DashboardOptions};
pub use auth::{AuthContext, AuthError, AuthState};
pub use domain::{
    Category, CategoryId, ChatExchange, EnhancedMatch, Match, MatchId, NewMatch, Rank,
    RankingEntry, Rating, RatingChange, RatingHistoryEntry, RatingSummary, SignInRequest,
    SignUpRequest, User, UserDashboard, UserId, UserUpdate,
};
pub use latest::{LatestRequest, RequestTicket};
pub use ports::{IceBreakerApi, PortError, PortResult, SessionStorage};
pub use recording::{submit_match, RecordError};
pub use session::{MemorySessionStorage, SessionStore};
pub use validation::{MatchForm, ValidationError};
pub use view::{DashboardView, ViewUpdate};
