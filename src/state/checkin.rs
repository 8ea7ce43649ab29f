//! Check-in state container

use crate::api::adapter::SharedAdapter;
use crate::models::{CheckinCalendar, CheckinOutcome, PointsInfo};

pub struct CheckinState {
    adapter: SharedAdapter,
    points_info: PointsInfo,
    calendar: Option<CheckinCalendar>,
}

impl CheckinState {
    pub fn new(adapter: SharedAdapter) -> Self {
        Self {
            adapter,
            points_info: PointsInfo::default(),
            calendar: None,
        }
    }

    pub async fn fetch_points_info(&mut self) -> &PointsInfo {
        self.points_info = self.adapter.points_info().await;
        &self.points_info
    }

    /// Fetch one month's calendar and keep the points view consistent with
    /// its detail fields.
    pub async fn fetch_calendar(&mut self, year: i32, month: u32) -> &CheckinCalendar {
        let calendar = self.adapter.calendar_detail(year, month).await;
        self.points_info.consecutive_days = calendar.detail.consecutive_days;
        self.points_info.retro_available = calendar.detail.remain_retro_times;
        self.points_info.checked_in_today = calendar.detail.is_checked_in_today;
        self.points_info
            .retro_checked_in_days
            .clone_from(&calendar.detail.retro_checked_in_days);
        self.calendar.insert(calendar)
    }

    /// Check in for today and, on success, refetch the points view.
    pub async fn check_in(&mut self) -> CheckinOutcome {
        let outcome = self.adapter.check_in().await;
        if outcome.success {
            self.fetch_points_info().await;
        }
        outcome
    }

    /// Make up a missed day and, on success, refetch the points view.
    pub async fn retro_check_in(&mut self, date: &str) -> CheckinOutcome {
        let outcome = self.adapter.retro_check_in(date).await;
        if outcome.success {
            self.fetch_points_info().await;
        }
        outcome
    }

    /// Drop the cache and refetch, for an explicit user-requested refresh.
    pub async fn refresh(&mut self) -> &PointsInfo {
        self.adapter.clear_cache();
        self.fetch_points_info().await
    }

    pub fn points_info(&self) -> &PointsInfo {
        &self.points_info
    }

    pub fn calendar(&self) -> Option<&CheckinCalendar> {
        self.calendar.as_ref()
    }

    /// Back to the logged-out blank state.
    pub fn reset(&mut self) {
        self.points_info = PointsInfo::default();
        self.calendar = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::adapter::Adapter;
    use crate::api::client::HttpClient;
    use crate::auth::TokenStore;
    use crate::cache::Cache;
    use crate::config::ApiConfig;
    use crate::storage::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(server: &MockServer) -> CheckinState {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()));
        let config = ApiConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        };
        let client = HttpClient::new(&config, tokens.clone()).unwrap();
        CheckinState::new(Arc::new(Adapter::new(client, Cache::new(), tokens)))
    }

    fn ok_envelope(data: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"code": 0, "data": data}))
    }

    #[tokio::test]
    async fn fetch_calendar_syncs_the_points_view() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/checkins/calendar"))
            .respond_with(ok_envelope(json!({
                "year": 2026,
                "month": 8,
                "detail": {
                    "checkedInDays": [1, 2],
                    "retroCheckedInDays": [4],
                    "isCheckedInToday": true,
                    "remainRetroTimes": 1,
                    "consecutiveDays": 2,
                },
            })))
            .mount(&server)
            .await;

        let mut state = state(&server);
        state.fetch_calendar(2026, 8).await;

        let info = state.points_info();
        assert_eq!(info.consecutive_days, 2);
        assert_eq!(info.retro_available, 1);
        assert!(info.checked_in_today);
        assert_eq!(info.retro_checked_in_days, vec![4]);
        assert!(state.calendar().is_some());
    }

    #[tokio::test]
    async fn failed_check_in_leaves_the_view_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/checkins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 1001,
                "message": "already checked in today",
            })))
            .mount(&server)
            .await;

        let mut state = state(&server);
        let outcome = state.check_in().await;

        assert!(!outcome.success);
        assert_eq!(*state.points_info(), PointsInfo::default());
    }

    #[tokio::test]
    async fn reset_clears_the_view() {
        let server = MockServer::start().await;
        let mut state = state(&server);
        state.points_info.total_points = 99;
        state.calendar = Some(CheckinCalendar::empty(2026, 8));

        state.reset();

        assert_eq!(*state.points_info(), PointsInfo::default());
        assert!(state.calendar().is_none());
    }
}
