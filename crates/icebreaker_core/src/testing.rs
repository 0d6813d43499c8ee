//! In-memory `IceBreakerApi` used by the unit tests of this crate.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    Category, CategoryId, ChatExchange, Match, MatchId, NewMatch, RankingEntry, Rating,
    RatingHistoryEntry, SignInRequest, SignUpRequest, User, UserId, UserUpdate,
};
use crate::ports::{IceBreakerApi, PortError, PortResult};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 18, 0, 0).unwrap()
}

pub fn user(id: &str, name: &str) -> User {
    User {
        id: UserId::new(id),
        name: name.to_string(),
        intra_name: name.to_lowercase(),
        email: format!("{}@example.com", id),
        image: Some(format!("https://img.example.com/{}.png", id)),
        created_at: at(1),
        updated_at: at(1),
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        description: None,
        color: Some("#4f46e5".to_string()),
        image: None,
        created_at: at(1),
        updated_at: at(1),
    }
}

pub fn game(id: &str, winner: &str, loser: &str, category: &str, day: u32) -> Match {
    Match {
        id: MatchId::new(id),
        winner_id: UserId::new(winner),
        loser_id: UserId::new(loser),
        category_id: CategoryId::new(category),
        winner_point: 11,
        loser_point: 7,
        date: at(day),
        created_at: at(day),
        updated_at: at(day),
        rating_change: None,
    }
}

pub fn rating(user: &str, category: &str, rate: f64) -> Rating {
    Rating {
        id: format!("{}-{}", user, category),
        user_id: UserId::new(user),
        category_id: CategoryId::new(category),
        rate,
        date: at(2),
        created_at: at(2),
        updated_at: at(2),
    }
}

pub fn ranked(user: &str, rate: f64) -> RankingEntry {
    RankingEntry {
        user_id: UserId::new(user),
        rate,
        name: None,
        intra_name: None,
        image: None,
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub users: HashMap<UserId, User>,
    pub user_matches: HashMap<UserId, Vec<Match>>,
    pub categories: Vec<Category>,
    pub ratings: HashMap<(UserId, CategoryId), Rating>,
    pub rankings: HashMap<CategoryId, Vec<RankingEntry>>,
    pub category_matches: HashMap<CategoryId, Vec<Match>>,
    pub failing_rankings: HashSet<CategoryId>,
    pub failing_category_matches: HashSet<CategoryId>,
    pub fail_categories: bool,
    pub user_delays: HashMap<UserId, Duration>,
    pub passwords: HashMap<String, String>,
    pub get_user_calls: AtomicUsize,
    pub create_match_calls: AtomicUsize,
    pub created: Mutex<Vec<NewMatch>>,
}

impl FakeApi {
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_user_matches(mut self, user: &str, matches: Vec<Match>) -> Self {
        self.user_matches.insert(UserId::new(user), matches);
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.ratings
            .insert((rating.user_id.clone(), rating.category_id.clone()), rating);
        self
    }

    pub fn with_ranking(mut self, category: &str, entries: Vec<RankingEntry>) -> Self {
        self.rankings.insert(CategoryId::new(category), entries);
        self
    }

    pub fn with_category_matches(mut self, category: &str, matches: Vec<Match>) -> Self {
        self.category_matches.insert(CategoryId::new(category), matches);
        self
    }

    pub fn with_password(mut self, email: &str, password: &str) -> Self {
        self.passwords.insert(email.to_string(), password.to_string());
        self
    }

    pub fn get_user_calls(&self) -> usize {
        self.get_user_calls.load(Ordering::SeqCst)
    }

    pub fn create_match_calls(&self) -> usize {
        self.create_match_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IceBreakerApi for FakeApi {
    async fn sign_in(&self, credentials: &SignInRequest) -> PortResult<User> {
        match self.passwords.get(&credentials.email) {
            Some(password) if password == &credentials.password => self
                .users
                .values()
                .find(|u| u.email == credentials.email)
                .cloned()
                .ok_or_else(|| PortError::NotFound(credentials.email.clone())),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn sign_up(&self, profile: &SignUpRequest) -> PortResult<User> {
        if self.users.values().any(|u| u.email == profile.email) {
            return Err(PortError::Request {
                status: 409,
                message: "email already registered".to_string(),
            });
        }
        let mut created = user(&format!("new-{}", profile.intra_name), &profile.name);
        created.intra_name = profile.intra_name.clone();
        created.email = profile.email.clone();
        created.image = profile.image.clone();
        Ok(created)
    }

    async fn get_user(&self, user_id: &UserId) -> PortResult<User> {
        self.get_user_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.user_delays.get(user_id) {
            tokio::time::sleep(*delay).await;
        }
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("user {}", user_id)))
    }

    async fn search_users(&self, key: Option<&str>) -> PortResult<Vec<User>> {
        let key = key.unwrap_or_default().to_lowercase();
        let mut found: Vec<User> = self
            .users
            .values()
            .filter(|u| u.name.to_lowercase().contains(&key) || u.intra_name.contains(&key))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }

    async fn update_user(&self, user_id: &UserId, update: &UserUpdate) -> PortResult<User> {
        let mut updated = self.get_user(user_id).await?;
        if let Some(name) = &update.name {
            updated.name = name.clone();
        }
        if let Some(intra_name) = &update.intra_name {
            updated.intra_name = intra_name.clone();
        }
        if let Some(email) = &update.email {
            updated.email = email.clone();
        }
        if let Some(image) = &update.image {
            updated.image = Some(image.clone());
        }
        Ok(updated)
    }

    async fn get_category(&self, category_id: &CategoryId) -> PortResult<Category> {
        self.categories
            .iter()
            .find(|c| &c.id == category_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("category {}", category_id)))
    }

    async fn get_all_categories(&self) -> PortResult<Vec<Category>> {
        if self.fail_categories {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        Ok(self.categories.clone())
    }

    async fn get_user_rating(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Rating> {
        self.ratings
            .get(&(user_id.clone(), category_id.clone()))
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("rating {}/{}", user_id, category_id)))
    }

    async fn get_user_rating_history(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Vec<RatingHistoryEntry>> {
        let current = self.get_user_rating(user_id, category_id).await?;
        Ok(vec![RatingHistoryEntry {
            rate: current.rate,
            date: current.date,
        }])
    }

    async fn get_user_matches(&self, user_id: &UserId) -> PortResult<Vec<Match>> {
        Ok(self.user_matches.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_category_matches(&self, category_id: &CategoryId) -> PortResult<Vec<Match>> {
        if self.failing_category_matches.contains(category_id) {
            return Err(PortError::Request {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self
            .category_matches
            .get(category_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_match(&self, new_match: &NewMatch) -> PortResult<()> {
        self.create_match_calls.fetch_add(1, Ordering::SeqCst);
        self.created
            .lock()
            .map_err(|e| PortError::Storage(e.to_string()))?
            .push(new_match.clone());
        Ok(())
    }

    async fn get_category_ranking(
        &self,
        category_id: &CategoryId,
    ) -> PortResult<Vec<RankingEntry>> {
        if self.failing_rankings.contains(category_id) {
            return Err(PortError::Request {
                status: 503,
                message: "ranking service down".to_string(),
            });
        }
        Ok(self.rankings.get(category_id).cloned().unwrap_or_default())
    }

    async fn send_chat_message(&self, content: &str) -> PortResult<ChatExchange> {
        Ok(ChatExchange {
            datetime: at(4),
            content: content.to_string(),
            reply: format!("echo: {}", content),
        })
    }
}
