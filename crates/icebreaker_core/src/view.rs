//! crates/icebreaker_core/src/view.rs
//!
//! A dashboard view with a lifetime: it owns the aggregator and the
//! latest-request guard, so a load superseded by a newer one (the viewer moved
//! on to another profile) is dropped instead of being shown.

use tracing::debug;

use crate::aggregator::{DashboardAggregator, DashboardError};
use crate::domain::{User, UserDashboard, UserId};
use crate::latest::LatestRequest;

/// The outcome of one load as far as the view is concerned.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewUpdate {
    /// Show this; `None` means there was no subject to load.
    Ready(Option<UserDashboard>),
    Failed(DashboardError),
    /// A newer load started or the view was closed; show nothing.
    Superseded,
}

pub struct DashboardView {
    aggregator: DashboardAggregator,
    latest: LatestRequest<Option<UserId>>,
}

impl DashboardView {
    pub fn new(aggregator: DashboardAggregator) -> Self {
        Self {
            aggregator,
            latest: LatestRequest::new(),
        }
    }

    pub async fn load(&self, subject: Option<&UserId>, current_user: Option<&User>) -> ViewUpdate {
        let ticket = self.latest.begin(subject.cloned());
        let Some(result) = ticket
            .run(self.aggregator.build_user_dashboard(subject, current_user))
            .await
        else {
            debug!(subject = ?ticket.key(), "Dashboard load superseded.");
            return ViewUpdate::Superseded;
        };

        match self.latest.commit(&ticket, result) {
            Some(Ok(dashboard)) => ViewUpdate::Ready(dashboard),
            Some(Err(e)) => ViewUpdate::Failed(e),
            None => ViewUpdate::Superseded,
        }
    }

    /// Ends the view's lifetime; loads still in flight will be discarded.
    pub fn close(&self) {
        self.latest.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::DashboardOptions;
    use crate::testing::{user, FakeApi};
    use std::sync::Arc;
    use std::time::Duration;

    fn view() -> DashboardView {
        let mut api = FakeApi::default()
            .with_user(user("slow", "Slow"))
            .with_user(user("fast", "Fast"));
        api.user_delays
            .insert(UserId::new("slow"), Duration::from_millis(50));
        DashboardView::new(DashboardAggregator::new(
            Arc::new(api),
            DashboardOptions::profile(),
        ))
    }

    #[tokio::test]
    async fn last_request_wins() {
        let view = view();
        let slow = UserId::new("slow");
        let fast = UserId::new("fast");

        let (first, second) = futures::join!(view.load(Some(&slow), None), view.load(Some(&fast), None));

        assert_eq!(first, ViewUpdate::Superseded);
        match second {
            ViewUpdate::Ready(Some(dashboard)) => assert_eq!(dashboard.user.name, "Fast"),
            other => panic!("unexpected update: {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_subject_is_ready_and_empty() {
        assert_eq!(view().load(None, None).await, ViewUpdate::Ready(None));
    }

    #[tokio::test]
    async fn closed_view_discards_in_flight_load() {
        let view = view();
        let slow = UserId::new("slow");
        let (update, ()) = futures::join!(view.load(Some(&slow), None), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            view.close();
        });
        assert_eq!(update, ViewUpdate::Superseded);
    }

    #[tokio::test]
    async fn fatal_errors_are_surfaced() {
        let update = view().load(Some(&UserId::new("missing")), None).await;
        assert!(matches!(update, ViewUpdate::Failed(DashboardError::User(_))));
    }
}
