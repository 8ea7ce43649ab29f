//! Adapter between the raw endpoints and the command surface
//!
//! Reshapes wire responses for display, applies the short-lived response
//! cache to the two hot queries, and owns session orchestration (login,
//! registration, session restore, logout). Query methods degrade to
//! placeholder values on failure; mutations surface their outcome.

use std::sync::Arc;

use chrono::{Datelike, Local};

use crate::auth::{TokenStats, TokenStore};
use crate::cache::{cache_keys, Cache};
use crate::models::{
    CheckinCalendar, CheckinOutcome, CreateUserRequest, LoginRequest, PointsInfo,
    PointsRecordsPage, User,
};

use super::client::HttpClient;
use super::error::ApiError;
use super::{account, checkin, endpoints, points};

/// Points credited for a normal check-in, shown before the ledger confirms.
pub const DAILY_POINTS_ESTIMATE: i64 = 1;
/// Points deducted-then-credited net estimate for a retro check-in.
pub const RETRO_POINTS_ESTIMATE: i64 = 5;

pub struct Adapter {
    client: HttpClient,
    cache: Cache,
    tokens: TokenStore,
}

impl Adapter {
    pub fn new(client: HttpClient, cache: Cache, tokens: TokenStore) -> Self {
        Self {
            client,
            cache,
            tokens,
        }
    }

    /// Aggregate points view, assembled from the summary and current-month
    /// calendar endpoints. Cached; degrades to [`PointsInfo::fallback`] when
    /// either fetch fails.
    pub async fn points_info(&self) -> PointsInfo {
        let key = cache_keys::points_info();
        if let Some(cached) = self.cache.get::<PointsInfo>(&key) {
            tracing::debug!("points info served from cache");
            return cached;
        }

        let now = Local::now();
        let summary = points::summary(&self.client).await;
        let calendar = checkin::calendar(&self.client, now.year(), now.month()).await;

        let info = match (summary, calendar) {
            (Ok(summary), Ok(calendar)) => PointsInfo {
                total_points: summary.total,
                consecutive_days: calendar.detail.consecutive_days,
                retro_available: calendar.detail.remain_retro_times,
                checked_in_today: calendar.detail.is_checked_in_today,
                retro_checked_in_days: calendar.detail.retro_checked_in_days,
            },
            (summary, calendar) => {
                for err in [summary.err(), calendar.err()].into_iter().flatten() {
                    tracing::warn!("points info fetch degraded to fallback: {}", err);
                }
                // failures are not cached
                return PointsInfo::fallback();
            }
        };

        self.cache.set(&key, &info);
        info
    }

    /// Calendar for one month. Cached per month; degrades to an empty
    /// calendar when the fetch fails.
    pub async fn calendar_detail(&self, year: i32, month: u32) -> CheckinCalendar {
        let key = cache_keys::calendar(year, month);
        if let Some(cached) = self.cache.get::<CheckinCalendar>(&key) {
            tracing::debug!("calendar {} served from cache", key);
            return cached;
        }

        match checkin::calendar(&self.client, year, month).await {
            Ok(calendar) => {
                self.cache.set(&key, &calendar);
                calendar
            }
            Err(err) => {
                tracing::warn!("calendar fetch degraded to empty: {}", err);
                CheckinCalendar::empty(year, month)
            }
        }
    }

    /// Check in for today. Success drops every cached query so the next
    /// read sees the new state.
    pub async fn check_in(&self) -> CheckinOutcome {
        match checkin::daily(&self.client).await {
            Ok(()) => {
                self.cache.clear();
                CheckinOutcome {
                    success: true,
                    points: DAILY_POINTS_ESTIMATE,
                    message: "Check-in successful".to_string(),
                }
            }
            Err(err) => CheckinOutcome {
                success: false,
                points: 0,
                message: err.to_string(),
            },
        }
    }

    /// Make up a missed day, `date` is YYYY-MM-DD.
    pub async fn retro_check_in(&self, date: &str) -> CheckinOutcome {
        match checkin::retroactive(&self.client, date).await {
            Ok(()) => {
                self.cache.clear();
                CheckinOutcome {
                    success: true,
                    points: RETRO_POINTS_ESTIMATE,
                    message: format!("Retro check-in for {} successful", date),
                }
            }
            Err(err) => CheckinOutcome {
                success: false,
                points: 0,
                message: err.to_string(),
            },
        }
    }

    /// One ledger page, newest first. Degrades to an empty page on failure.
    pub async fn points_records(&self, limit: u32, offset: u32) -> PointsRecordsPage {
        match points::records(&self.client, limit, offset).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!("points records fetch degraded to empty: {}", err);
                PointsRecordsPage {
                    total: 0,
                    has_more: false,
                    list: Vec::new(),
                }
            }
        }
    }

    /// Log in and establish the session: store the token pair in the tier
    /// selected by `remember`, persist the user record, and drop the cache.
    /// A failed profile fetch is not fatal; a minimal record stands in.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<User, ApiError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let pair = account::login(&self.client, &request).await?;
        self.tokens
            .set_tokens(&pair.access_token, &pair.refresh_token, remember)
            .map_err(|err| ApiError::unknown(endpoints::AUTH_LOGIN, &format!("{:#}", err)))?;

        let user = match account::profile(&self.client).await {
            Ok(profile) => User::from_profile(profile),
            Err(err) => {
                tracing::warn!("profile fetch after login failed: {}", err);
                User::minimal(username)
            }
        };
        if let Err(err) = self.tokens.store_user(&user, remember) {
            tracing::warn!("failed to persist session user record: {:#}", err);
        }

        self.cache.clear();
        tracing::info!(username, remember, "logged in");
        Ok(user)
    }

    /// Register an account and immediately log in with a session-only login.
    /// Registration is the one place the backend reports the user id, so it
    /// is folded into the session record here.
    pub async fn register(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        let created = account::create_user(&self.client, request).await?;
        tracing::info!(user_id = created.user_id, "account created");

        let mut user = self
            .login(&request.username, &request.password, false)
            .await?;
        user.id = Some(created.user_id);
        if let Err(err) = self.tokens.store_user(&user, false) {
            tracing::warn!("failed to persist session user record: {:#}", err);
        }
        Ok(user)
    }

    /// Restore the session user, revalidating the stored tokens against the
    /// server. Any failure ends the session entirely: tokens, user record
    /// and cache are all cleared.
    pub async fn current_user(&self) -> Option<User> {
        if !self.tokens.has_valid_tokens() {
            return None;
        }
        let remember = self.tokens.is_remember_login();

        let profile = match account::profile(&self.client).await {
            Ok(profile) => profile,
            Err(err) => {
                tracing::warn!("stored session is no longer valid: {}", err);
                self.tokens.clear_tokens();
                self.cache.clear();
                return None;
            }
        };

        let user = match self.tokens.load_user() {
            // keep the id and creation stamp from the stored record
            Some(stored) => User {
                id: stored.id,
                username: profile.username,
                email: profile.email,
                avatar: profile.avatar,
                created_at: stored.created_at,
            },
            None => User::from_profile(profile),
        };
        if let Err(err) = self.tokens.store_user(&user, remember) {
            tracing::warn!("failed to persist session user record: {:#}", err);
        }
        Some(user)
    }

    pub fn logout(&self) {
        self.tokens.clear_tokens();
        self.cache.clear();
        tracing::info!("logged out");
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.has_valid_tokens()
    }

    pub fn token_stats(&self) -> TokenStats {
        self.tokens.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Shared handle used by the state containers and the command handlers.
pub type SharedAdapter = Arc<Adapter>;
