//! services/client/src/cli/commands.rs
//!
//! Runs one parsed command against the core. The `App` owns the shared API
//! handle and the single `AuthContext` for the process.

use icebreaker_core::presentation::{filter_ranking, rating_history_rows, MatchSort};
use icebreaker_core::validation;
use icebreaker_core::{
    submit_match, AuthContext, CategoryId, DashboardAggregator, DashboardOptions,
    DashboardView, IceBreakerApi, MatchForm, SessionStore, SignInRequest, SignUpRequest,
    UserId, UserUpdate, ViewUpdate,
};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

use super::{render, Command};
use crate::error::ClientError;

pub struct App {
    api: Arc<dyn IceBreakerApi>,
    auth: AuthContext,
}

impl App {
    pub fn new(api: Arc<dyn IceBreakerApi>, session: SessionStore) -> Result<Self, ClientError> {
        let auth = AuthContext::init(api.clone(), session)?;
        Ok(Self { api, auth })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub async fn run(&mut self, command: Command, out: &mut dyn Write) -> Result<(), ClientError> {
        if command.is_protected() {
            self.auth.require_session()?;
        }

        match command {
            Command::Signin { email, password } => {
                if let Some(user_id) = self.auth.session_user_id() {
                    writeln!(out, "Already signed in as {}.", user_id)?;
                    return Ok(());
                }
                let user = self.auth.sign_in(SignInRequest { email, password }).await?;
                writeln!(out, "Signed in as {} (@{}).", user.name, user.intra_name)?;
            }
            Command::Signup {
                name,
                intra_name,
                email,
                password,
                image,
            } => {
                if let Some(user_id) = self.auth.session_user_id() {
                    writeln!(out, "Already signed in as {}.", user_id)?;
                    return Ok(());
                }
                let profile = SignUpRequest {
                    name,
                    intra_name,
                    email,
                    password,
                    image,
                };
                let user = self.auth.sign_up(profile).await?;
                writeln!(out, "Welcome, {} (@{}).", user.name, user.intra_name)?;
            }
            Command::Signout => {
                self.auth.sign_out()?;
                writeln!(out, "Signed out.")?;
            }
            Command::Whoami => {
                if self.auth.session_user_id().is_none() {
                    writeln!(out, "Not signed in.")?;
                    return Ok(());
                }
                let user = self.auth.load_current_user().await?;
                writeln!(out, "{}", render::user_line(user))?;
            }
            Command::Home { sort } => {
                let subject = self.auth.require_session()?.clone();
                self.show_dashboard(subject, DashboardOptions::home(), sort.into(), out)
                    .await?;
            }
            Command::User { user_id, sort } => {
                self.show_dashboard(UserId::new(user_id), DashboardOptions::profile(), sort.into(), out)
                    .await?;
            }
            Command::Search { term } => {
                let term = validation::search_term(&term)?;
                let users = self.api.search_users(Some(term)).await?;
                debug!(term, hits = users.len(), "Search complete.");
                out.write_all(render::users(&users).as_bytes())?;
            }
            Command::Ranking {
                category_id,
                filter,
            } => {
                let category_id = CategoryId::new(category_id);
                let (category, ranking) = futures::try_join!(
                    self.api.get_category(&category_id),
                    self.api.get_category_ranking(&category_id)
                )?;
                let rows = filter_ranking(&ranking, filter.as_deref().unwrap_or(""));
                out.write_all(render::ranking(&category, &rows).as_bytes())?;
            }
            Command::History {
                user_id,
                category_id,
            } => {
                let user_id = UserId::new(user_id);
                let category_id = CategoryId::new(category_id);
                let (user, category, history) = futures::try_join!(
                    self.api.get_user(&user_id),
                    self.api.get_category(&category_id),
                    self.api.get_user_rating_history(&user_id, &category_id)
                )?;
                let rows = rating_history_rows(history);
                out.write_all(render::history(&user, &category, &rows).as_bytes())?;
            }
            Command::Record {
                winner,
                loser,
                category,
                winner_points,
                loser_points,
                date,
            } => {
                let form = MatchForm {
                    winner: Some(UserId::new(winner)),
                    loser: Some(UserId::new(loser)),
                    category: Some(CategoryId::new(category)),
                    winner_point: winner_points,
                    loser_point: loser_points,
                    date,
                };
                let recorded = submit_match(self.api.as_ref(), &form).await?;
                writeln!(
                    out,
                    "Match recorded: {} beat {} {}-{}.",
                    recorded.winner_id, recorded.loser_id, recorded.winner_point, recorded.loser_point
                )?;
            }
            Command::Categories => {
                let categories = self.api.get_all_categories().await?;
                out.write_all(render::categories(&categories).as_bytes())?;
            }
            Command::UpdateProfile {
                name,
                intra_name,
                email,
                image,
            } => {
                let update = UserUpdate {
                    name,
                    intra_name,
                    email,
                    image,
                };
                let user = self.auth.update_profile(update).await?;
                writeln!(out, "Profile updated: {}", render::user_line(user))?;
            }
            Command::Chat { message } => {
                let message = validation::chat_message(&message)?;
                let exchange = self.api.send_chat_message(message).await?;
                out.write_all(render::chat(&exchange).as_bytes())?;
            }
        }
        Ok(())
    }

    async fn show_dashboard(
        &mut self,
        subject: UserId,
        options: DashboardOptions,
        sort: MatchSort,
        out: &mut dyn Write,
    ) -> Result<(), ClientError> {
        let view = DashboardView::new(DashboardAggregator::new(self.api.clone(), options));
        let update = view.load(Some(&subject), self.auth.current_user()).await;
        view.close();

        match update {
            ViewUpdate::Ready(Some(dashboard)) => {
                let mut matches = dashboard.enhanced_matches.clone();
                sort.apply(&mut matches);
                info!(user_id = %subject, matches = matches.len(), "Dashboard ready.");
                out.write_all(render::dashboard(&dashboard, &matches).as_bytes())?;
                Ok(())
            }
            ViewUpdate::Ready(None) | ViewUpdate::Superseded => {
                debug!(user_id = %subject, "Dashboard load produced nothing to show.");
                Ok(())
            }
            ViewUpdate::Failed(e) => {
                if self.auth.session_user_id() == Some(&subject) {
                    self.auth.invalidate_if_stale(e.port_error())?;
                }
                Err(e.into())
            }
        }
    }
}
