//! API layer for the Sunflower backend
//!
//! `client` is the single network entry point; `account`, `checkin` and
//! `points` are thin typed wrappers over it; `adapter` reshapes their
//! responses for display, applies the cache, and orchestrates the session.

pub mod account;
pub mod adapter;
pub mod checkin;
pub mod client;
pub mod error;
pub mod points;

/// REST endpoint paths under the configured base path.
pub mod endpoints {
    pub const USER_CREATE: &str = "/users";
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_REFRESH: &str = "/auth/refresh";
    pub const USER_PROFILE: &str = "/users/me";
    pub const CHECKIN_CALENDAR: &str = "/checkins/calendar";
    pub const CHECKIN_DAILY: &str = "/checkins";
    pub const CHECKIN_RETRO: &str = "/checkins/retroactive";
    pub const POINTS_RECORDS: &str = "/points/records";
    pub const POINTS_SUMMARY: &str = "/points/summary";
}
