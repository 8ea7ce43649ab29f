//! Check-in calendar models and the aggregate points view

use serde::{Deserialize, Serialize};

/// Retro quota shown when the backend is unreachable; the server owns the
/// real remaining count.
pub const DEFAULT_RETRO_TIMES: u32 = 3;

/// Per-month check-in detail as reported by the calendar endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinDetail {
    /// Day-of-month numbers that were checked in normally
    #[serde(default)]
    pub checked_in_days: Vec<u32>,
    /// Day-of-month numbers that were made up retroactively
    #[serde(default)]
    pub retro_checked_in_days: Vec<u32>,
    #[serde(default)]
    pub is_checked_in_today: bool,
    #[serde(default)]
    pub remain_retro_times: u32,
    #[serde(default)]
    pub consecutive_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinCalendar {
    pub year: i32,
    pub month: u32,
    pub detail: CheckinDetail,
}

impl CheckinCalendar {
    /// Placeholder calendar returned when the fetch fails.
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            detail: CheckinDetail {
                remain_retro_times: DEFAULT_RETRO_TIMES,
                ..CheckinDetail::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RetroCheckinRequest {
    /// Make-up date, `YYYY-MM-DD`
    pub date: String,
}

/// Aggregate points view assembled by the adapter from the summary and
/// calendar endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsInfo {
    pub total_points: i64,
    pub consecutive_days: u32,
    pub retro_available: u32,
    pub checked_in_today: bool,
    pub retro_checked_in_days: Vec<u32>,
}

impl PointsInfo {
    /// Degradation default used when the summary fetch fails.
    pub fn fallback() -> Self {
        Self {
            retro_available: DEFAULT_RETRO_TIMES,
            ..Self::default()
        }
    }
}

/// Outcome of a check-in or retro check-in, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinOutcome {
    pub success: bool,
    /// Client-side estimate only; the server decides the actual amount.
    pub points: i64,
    pub message: String,
}
