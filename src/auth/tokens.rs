//! Token storage and management

use std::sync::Arc;

use anyhow::Result;

use crate::models::User;
use crate::storage::KeyValue;

/// Storage keys used in both tiers.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// Session user record, serialized JSON
    pub const USER: &str = "user";
    /// Single-token key written by pre-split releases. Cleared, never written.
    pub const LEGACY_TOKEN: &str = "token";
}

/// Which tier currently holds the session, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTier {
    Durable,
    Ephemeral,
    None,
}

/// Token presence report for the `status` command.
#[derive(Debug, Clone)]
pub struct TokenStats {
    pub has_access_token: bool,
    pub has_refresh_token: bool,
    pub remember: bool,
    pub tier: StorageTier,
}

/// Token pair and session-user record across the two storage tiers.
///
/// Lookups always prefer the durable tier. Validity here means presence only;
/// whether a token is still accepted is the server's call.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn KeyValue>,
    ephemeral: Arc<dyn KeyValue>,
}

impl TokenStore {
    pub fn new(durable: Arc<dyn KeyValue>, ephemeral: Arc<dyn KeyValue>) -> Self {
        Self { durable, ephemeral }
    }

    fn tier_for(&self, remember: bool) -> &Arc<dyn KeyValue> {
        if remember {
            &self.durable
        } else {
            &self.ephemeral
        }
    }

    /// Replace the stored pair wholesale: clear both tiers, then write the
    /// new pair into the tier selected by `remember`. The pair is never
    /// split across tiers.
    pub fn set_tokens(&self, access: &str, refresh: &str, remember: bool) -> Result<()> {
        self.clear_tokens();

        let tier = self.tier_for(remember);
        tier.set(keys::ACCESS_TOKEN, access)?;
        tier.set(keys::REFRESH_TOKEN, refresh)?;
        tracing::debug!(remember, "token pair stored");
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.durable
            .get(keys::ACCESS_TOKEN)
            .or_else(|| self.ephemeral.get(keys::ACCESS_TOKEN))
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.durable
            .get(keys::REFRESH_TOKEN)
            .or_else(|| self.ephemeral.get(keys::REFRESH_TOKEN))
    }

    /// Remove the token pair, the legacy single-token key, and the user
    /// record from both tiers. Best-effort: removal failures are logged and
    /// do not abort the sweep.
    pub fn clear_tokens(&self) {
        for tier in [&self.durable, &self.ephemeral] {
            for key in [
                keys::ACCESS_TOKEN,
                keys::REFRESH_TOKEN,
                keys::LEGACY_TOKEN,
                keys::USER,
            ] {
                if let Err(err) = tier.remove(key) {
                    tracing::warn!("failed to remove stored key {}: {:#}", key, err);
                }
            }
        }
    }

    /// Both halves of the pair are present. No expiry inspection.
    pub fn has_valid_tokens(&self) -> bool {
        self.access_token().is_some() && self.refresh_token().is_some()
    }

    /// True iff either token key sits in the durable tier.
    pub fn is_remember_login(&self) -> bool {
        self.durable.get(keys::ACCESS_TOKEN).is_some()
            || self.durable.get(keys::REFRESH_TOKEN).is_some()
    }

    pub fn store_user(&self, user: &User, remember: bool) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.tier_for(remember).set(keys::USER, &json)
    }

    pub fn load_user(&self) -> Option<User> {
        let raw = self
            .durable
            .get(keys::USER)
            .or_else(|| self.ephemeral.get(keys::USER))?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                tracing::warn!("stored user record is corrupt, discarding: {}", err);
                self.clear_user();
                None
            }
        }
    }

    pub fn clear_user(&self) {
        for tier in [&self.durable, &self.ephemeral] {
            if let Err(err) = tier.remove(keys::USER) {
                tracing::warn!("failed to remove stored user record: {:#}", err);
            }
        }
    }

    pub fn stats(&self) -> TokenStats {
        let has_access_token = self.access_token().is_some();
        let has_refresh_token = self.refresh_token().is_some();
        let remember = self.is_remember_login();

        let tier = if !has_access_token && !has_refresh_token {
            StorageTier::None
        } else if remember {
            StorageTier::Durable
        } else {
            StorageTier::Ephemeral
        };

        TokenStats {
            has_access_token,
            has_refresh_token,
            remember,
            tier,
        }
    }
}
