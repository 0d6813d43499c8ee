//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, which is the concrete implementation
//! of the `IceBreakerApi` port from the `core` crate. It handles all interactions
//! with the remote REST service using `reqwest`, and is the single place where
//! response payloads are decoded into domain types.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use icebreaker_core::domain::{
    Category, CategoryId, ChatExchange, Match, MatchId, NewMatch, RankingEntry, Rating,
    RatingChange, RatingHistoryEntry, SignInRequest, SignUpRequest, User, UserId, UserUpdate,
};
use icebreaker_core::ports::{IceBreakerApi, PortError, PortResult};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An HTTP adapter that implements the `IceBreakerApi` port.
#[derive(Clone)]
pub struct HttpApiAdapter {
    client: Client,
    base_url: Url,
}

impl HttpApiAdapter {
    /// Creates a new `HttpApiAdapter` rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| PortError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn dispatch(&self, request: RequestBuilder) -> PortResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().clone();
        if status.is_success() {
            debug!(%url, status = status.as_u16(), "Request succeeded.");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "Request failed.");
        Err(status_error(status, &body, url.path()))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> PortResult<T> {
        let response = self.dispatch(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| PortError::Decode(e.to_string()))
    }

    /// Decodes a list, skipping records that fail their domain checks.
    async fn fetch_list<R, T>(&self, request: RequestBuilder) -> PortResult<Vec<T>>
    where
        R: DeserializeOwned + ToDomain<T>,
    {
        let records: Vec<R> = self.fetch(request).await?;
        let items = records
            .into_iter()
            .filter_map(|record| match record.to_domain() {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(error = %e, "Dropping malformed record from list.");
                    None
                }
            })
            .collect();
        Ok(items)
    }
}

/// Maps a non-2xx response to the port's error taxonomy.
fn status_error(status: StatusCode, body: &str, path: &str) -> PortError {
    match status {
        StatusCode::NOT_FOUND => PortError::NotFound(path.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PortError::Unauthorized,
        _ => PortError::Request {
            status: status.as_u16(),
            message: error_message(status, body),
        },
    }
}

/// Pulls a human-readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(alias = "message", alias = "error")]
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(message),
        }) => message,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}

//=========================================================================================
// Wire Records (decoded shapes of the REST payloads)
//=========================================================================================

/// Converts a decoded wire record into its domain value.
trait ToDomain<T> {
    fn to_domain(self) -> PortResult<T>;
}

/// Accepts RFC 3339 timestamps and offset-less ones, which are taken as UTC.
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
}

/// The first spelling of a field that the payload actually carries.
fn first_of<T, const N: usize>(candidates: [Option<T>; N]) -> Option<T> {
    candidates.into_iter().flatten().next()
}

fn required<T>(field: &str, value: Option<T>) -> PortResult<T> {
    value.ok_or_else(|| PortError::Decode(format!("missing field `{}`", field)))
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    intra_name: String,
    email: String,
    #[serde(default)]
    user_image: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    updated_at: DateTime<Utc>,
}
impl ToDomain<User> for UserRecord {
    fn to_domain(self) -> PortResult<User> {
        let id = required("_id", first_of([self.object_id, self.id]))?;
        Ok(User {
            id: UserId::new(id),
            name: self.name,
            intra_name: self.intra_name,
            email: self.email,
            image: self.user_image.filter(|image| !image.is_empty()),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Deserialize)]
struct CategoryRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    updated_at: DateTime<Utc>,
}
impl ToDomain<Category> for CategoryRecord {
    fn to_domain(self) -> PortResult<Category> {
        let id = required("_id", first_of([self.object_id, self.id]))?;
        Ok(Category {
            id: CategoryId::new(id),
            name: self.name,
            description: self.description,
            color: self.color,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Deserialize)]
struct RatingRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default, rename = "categoryId")]
    category_id_camel: Option<String>,
    rate: f64,
    #[serde(deserialize_with = "timestamp")]
    date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    updated_at: DateTime<Utc>,
}
impl ToDomain<Rating> for RatingRecord {
    fn to_domain(self) -> PortResult<Rating> {
        Ok(Rating {
            id: required("_id", first_of([self.object_id, self.id]))?,
            user_id: UserId::new(required("user_id", first_of([self.user_id, self.user_id_camel]))?),
            category_id: CategoryId::new(required(
                "category_id",
                first_of([self.category_id, self.category_id_camel]),
            )?),
            rate: self.rate,
            date: self.date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Deserialize)]
struct RatingHistoryRecord {
    rate: f64,
    #[serde(deserialize_with = "timestamp")]
    date: DateTime<Utc>,
}
impl ToDomain<RatingHistoryEntry> for RatingHistoryRecord {
    fn to_domain(self) -> PortResult<RatingHistoryEntry> {
        Ok(RatingHistoryEntry {
            rate: self.rate,
            date: self.date,
        })
    }
}

#[derive(Deserialize)]
struct MatchRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    winner_id: String,
    loser_id: String,
    category_id: String,
    winner_point: u32,
    loser_point: u32,
    #[serde(deserialize_with = "timestamp")]
    date: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    updated_at: DateTime<Utc>,
    #[serde(default)]
    winner_rating_change: Option<f64>,
    #[serde(default)]
    loser_rating_change: Option<f64>,
}
impl ToDomain<Match> for MatchRecord {
    fn to_domain(self) -> PortResult<Match> {
        let id = required("_id", first_of([self.object_id, self.id]))?;
        if self.winner_id == self.loser_id {
            return Err(PortError::Decode(format!(
                "match {} has the same winner and loser",
                id
            )));
        }
        let rating_change = match (self.winner_rating_change, self.loser_rating_change) {
            (Some(winner), Some(loser)) => Some(RatingChange { winner, loser }),
            _ => None,
        };
        Ok(Match {
            id: MatchId::new(id),
            winner_id: UserId::new(self.winner_id),
            loser_id: UserId::new(self.loser_id),
            category_id: CategoryId::new(self.category_id),
            winner_point: self.winner_point,
            loser_point: self.loser_point,
            date: self.date,
            created_at: self.created_at,
            updated_at: self.updated_at,
            rating_change,
        })
    }
}

/// A leaderboard row. Servers disagree on spelling, and a row may carry its
/// own `_id` next to the user's id.
#[derive(Deserialize)]
struct RankingRecord {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default, rename = "userId")]
    user_id_camel: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    rate: Option<f64>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "userName")]
    user_name: Option<String>,
    #[serde(default)]
    intra_name: Option<String>,
    #[serde(default, rename = "intraName")]
    intra_name_camel: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default, rename = "userImage")]
    user_image_camel: Option<String>,
    #[serde(default)]
    user_image: Option<String>,
}
impl ToDomain<RankingEntry> for RankingRecord {
    fn to_domain(self) -> PortResult<RankingEntry> {
        let user_id = required(
            "user_id",
            first_of([self.user_id, self.user_id_camel, self.object_id]),
        )?;
        Ok(RankingEntry {
            user_id: UserId::new(user_id),
            rate: required("rate", first_of([self.rate, self.rating]))?,
            name: first_of([self.name, self.user_name]),
            intra_name: first_of([self.intra_name, self.intra_name_camel]),
            image: first_of([self.image, self.user_image_camel, self.user_image]),
        })
    }
}

#[derive(Deserialize)]
struct ChatRecord {
    #[serde(deserialize_with = "timestamp")]
    datetime: DateTime<Utc>,
    content: String,
    reply: String,
}
impl ToDomain<ChatExchange> for ChatRecord {
    fn to_domain(self) -> PortResult<ChatExchange> {
        Ok(ChatExchange {
            datetime: self.datetime,
            content: self.content,
            reply: self.reply,
        })
    }
}

//=========================================================================================
// Request Bodies
//=========================================================================================

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    name: &'a str,
    intra_name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_image: Option<&'a str>,
}

#[derive(Serialize)]
struct UserUpdateBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    intra_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_image: Option<&'a str>,
}

#[derive(Serialize)]
struct MatchResultBody<'a> {
    winner_id: &'a str,
    loser_id: &'a str,
    category_id: &'a str,
    winner_point: u32,
    loser_point: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    datetime: String,
    content: &'a str,
}

//=========================================================================================
// `IceBreakerApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl IceBreakerApi for HttpApiAdapter {
    async fn sign_in(&self, credentials: &SignInRequest) -> PortResult<User> {
        let body = SignInBody {
            email: &credentials.email,
            password: &credentials.password,
        };
        let url = self.endpoint(&["auth", "signin"])?;
        let record: UserRecord = self.fetch(self.client.post(url).json(&body)).await?;
        record.to_domain()
    }

    async fn sign_up(&self, profile: &SignUpRequest) -> PortResult<User> {
        let body = SignUpBody {
            name: &profile.name,
            intra_name: &profile.intra_name,
            email: &profile.email,
            password: &profile.password,
            user_image: profile.image.as_deref(),
        };
        let url = self.endpoint(&["auth", "signup"])?;
        let record: UserRecord = self.fetch(self.client.post(url).json(&body)).await?;
        record.to_domain()
    }

    async fn get_user(&self, user_id: &UserId) -> PortResult<User> {
        let url = self.endpoint(&["user", user_id.as_str()])?;
        let record: UserRecord = self.fetch(self.client.post(url)).await?;
        record.to_domain()
    }

    async fn search_users(&self, key: Option<&str>) -> PortResult<Vec<User>> {
        let url = self.endpoint(&["user"])?;
        let mut request = self.client.get(url);
        if let Some(key) = key {
            request = request.query(&[("key", key)]);
        }
        self.fetch_list::<UserRecord, _>(request).await
    }

    async fn update_user(&self, user_id: &UserId, update: &UserUpdate) -> PortResult<User> {
        let body = UserUpdateBody {
            name: update.name.as_deref(),
            intra_name: update.intra_name.as_deref(),
            email: update.email.as_deref(),
            user_image: update.image.as_deref(),
        };
        let url = self.endpoint(&["user", user_id.as_str()])?;
        let record: UserRecord = self.fetch(self.client.put(url).json(&body)).await?;
        record.to_domain()
    }

    async fn get_category(&self, category_id: &CategoryId) -> PortResult<Category> {
        let url = self.endpoint(&["category", category_id.as_str()])?;
        let record: CategoryRecord = self.fetch(self.client.get(url)).await?;
        record.to_domain()
    }

    async fn get_all_categories(&self) -> PortResult<Vec<Category>> {
        let url = self.endpoint(&["category"])?;
        self.fetch_list::<CategoryRecord, _>(self.client.get(url)).await
    }

    async fn get_user_rating(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Rating> {
        let url = self.endpoint(&[
            "rating",
            "user",
            user_id.as_str(),
            "category",
            category_id.as_str(),
        ])?;
        let record: RatingRecord = self.fetch(self.client.get(url)).await?;
        record.to_domain()
    }

    async fn get_user_rating_history(
        &self,
        user_id: &UserId,
        category_id: &CategoryId,
    ) -> PortResult<Vec<RatingHistoryEntry>> {
        let url = self.endpoint(&[
            "rating",
            "user",
            user_id.as_str(),
            "category",
            category_id.as_str(),
            "history",
        ])?;
        self.fetch_list::<RatingHistoryRecord, _>(self.client.get(url))
            .await
    }

    async fn get_user_matches(&self, user_id: &UserId) -> PortResult<Vec<Match>> {
        let url = self.endpoint(&["match", "user", user_id.as_str()])?;
        self.fetch_list::<MatchRecord, _>(self.client.get(url)).await
    }

    async fn get_category_matches(&self, category_id: &CategoryId) -> PortResult<Vec<Match>> {
        let url = self.endpoint(&["match", "category", category_id.as_str()])?;
        self.fetch_list::<MatchRecord, _>(self.client.get(url)).await
    }

    async fn create_match(&self, new_match: &NewMatch) -> PortResult<()> {
        let body = MatchResultBody {
            winner_id: new_match.winner_id.as_str(),
            loser_id: new_match.loser_id.as_str(),
            category_id: new_match.category_id.as_str(),
            winner_point: new_match.winner_point,
            loser_point: new_match.loser_point,
            date: new_match.date.map(|date| date.to_rfc3339()),
        };
        let url = self.endpoint(&["result"])?;
        self.dispatch(self.client.post(url).json(&body)).await?;
        Ok(())
    }

    async fn get_category_ranking(
        &self,
        category_id: &CategoryId,
    ) -> PortResult<Vec<RankingEntry>> {
        let url = self.endpoint(&["ranking", "category", category_id.as_str()])?;
        self.fetch_list::<RankingRecord, _>(self.client.get(url)).await
    }

    async fn send_chat_message(&self, content: &str) -> PortResult<ChatExchange> {
        let body = ChatBody {
            datetime: Utc::now().to_rfc3339(),
            content,
        };
        let url = self.endpoint(&["mcpchat"])?;
        let record: ChatRecord = self.fetch(self.client.post(url).json(&body)).await?;
        record.to_domain()
    }
}
