//! Check-in endpoints

use serde_json::json;

use crate::models::{CheckinCalendar, RetroCheckinRequest};

use super::client::HttpClient;
use super::endpoints;
use super::error::ApiError;

/// Calendar for one month, `month` is 1 through 12.
pub async fn calendar(
    client: &HttpClient,
    year: i32,
    month: u32,
) -> Result<CheckinCalendar, ApiError> {
    let path = format!(
        "{}?yearMonth={}-{:02}",
        endpoints::CHECKIN_CALENDAR,
        year,
        month
    );
    client.get(&path).await
}

/// Check in for today. The response body carries no payload we use.
pub async fn daily(client: &HttpClient) -> Result<(), ApiError> {
    client
        .post::<serde_json::Value, _>(endpoints::CHECKIN_DAILY, &json!({}))
        .await?;
    Ok(())
}

/// Make up a missed day, `date` is YYYY-MM-DD.
pub async fn retroactive(client: &HttpClient, date: &str) -> Result<(), ApiError> {
    let request = RetroCheckinRequest {
        date: date.to_string(),
    };
    client
        .post::<serde_json::Value, _>(endpoints::CHECKIN_RETRO, &request)
        .await?;
    Ok(())
}
