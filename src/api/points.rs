//! Points ledger endpoints

use crate::models::{PointsRecordsPage, PointsSummary};

use super::client::HttpClient;
use super::endpoints;
use super::error::ApiError;

/// One page of the transaction ledger, newest first.
pub async fn records(
    client: &HttpClient,
    limit: u32,
    offset: u32,
) -> Result<PointsRecordsPage, ApiError> {
    let path = format!(
        "{}?limit={}&offset={}",
        endpoints::POINTS_RECORDS,
        limit,
        offset
    );
    client.get(&path).await
}

/// Lifetime points total.
pub async fn summary(client: &HttpClient) -> Result<PointsSummary, ApiError> {
    client.get(endpoints::POINTS_SUMMARY).await
}
