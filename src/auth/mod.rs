//! Session credential handling
//!
//! Tokens live in one of two injected storage tiers; which one is chosen at
//! login time by the `remember` flag. The refresh protocol itself lives in
//! the HTTP client and deduplicates through [`single_flight::SingleFlight`].

pub mod single_flight;
pub mod tokens;

pub use single_flight::SingleFlight;
pub use tokens::{StorageTier, TokenStats, TokenStore};
