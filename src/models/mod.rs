//! Data models for the Sunflower API

mod checkin;
mod points;
mod user;

pub use checkin::*;
pub use points::*;
pub use user::*;
