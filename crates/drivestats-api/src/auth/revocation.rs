//! In-process revocation list for signed-out tokens
//!
//! Sign-out records the token id (`jti`) together with the token's own
//! expiry. An entry is only useful until that expiry, after which the token
//! is rejected by signature validation anyway, so each cache entry lives
//! exactly as long as its token.
//!
//! The list lives in `AppState`: it is lost on restart and not shared between
//! instances.

use jsonwebtoken::get_current_timestamp;
use moka::{sync::Cache, Expiry};
use std::time::{Duration, Instant};

/// Upper bound on tracked revocations
const MAX_REVOKED_TOKENS: u64 = 100_000;

/// Expires each entry at the `exp` it was stored with
struct UntilTokenExpiry;

impl Expiry<String, u64> for UntilTokenExpiry {
    fn expire_after_create(
        &self,
        _jti: &String,
        exp: &u64,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(exp.saturating_sub(get_current_timestamp())))
    }

    fn expire_after_update(
        &self,
        _jti: &String,
        exp: &u64,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Duration::from_secs(exp.saturating_sub(get_current_timestamp())))
    }
}

/// TTL-indexed set of revoked token ids
#[derive(Clone)]
pub struct RevocationList {
    entries: Cache<String, u64>,
}

impl Default for RevocationList {
    fn default() -> Self {
        Self::new()
    }
}

impl RevocationList {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_REVOKED_TOKENS)
                .expire_after(UntilTokenExpiry)
                .build(),
        }
    }

    /// Revoke `jti` until `expires_at` (Unix seconds)
    pub fn revoke(&self, jti: &str, expires_at: u64) {
        if expires_at > get_current_timestamp() {
            self.entries.insert(jti.to_string(), expires_at);
        }
    }

    /// Whether `jti` was revoked and its token has not yet expired
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.get(jti).is_some()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.run_pending_tasks();
        self.entries.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
