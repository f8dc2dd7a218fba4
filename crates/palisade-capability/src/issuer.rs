//! Token issuance with caching and renewal.

use std::sync::{Mutex, PoisonError};

use palisade_core::CapabilityConfig;
use palisade_signing::Signer;

use crate::error::CapabilityError;
use crate::token::{mint, CapabilityClaims};

/// Time source seam, so renewal behavior is testable without sleeping.
pub trait Clock: Send + Sync {
    /// Current time as Unix seconds.
    fn now_unix(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

struct CachedToken {
    wire: String,
    expires_at: i64,
}

/// Mints capability tokens and caches the current one.
///
/// `token()` returns the cached token until the current time enters the
/// renewal window before its expiry, then mints a replacement. The cache
/// lock is held across minting, so concurrent callers hitting the window
/// at once still produce a single new token.
pub struct CapabilityIssuer {
    config: CapabilityConfig,
    signer: Signer,
    clock: Box<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl CapabilityIssuer {
    pub fn new(config: CapabilityConfig, signer: Signer) -> Self {
        Self::with_clock(config, signer, Box::new(SystemClock))
    }

    pub fn with_clock(config: CapabilityConfig, signer: Signer, clock: Box<dyn Clock>) -> Self {
        CapabilityIssuer {
            config,
            signer,
            clock,
            cached: Mutex::new(None),
        }
    }

    /// The bearer token for the next portal call.
    pub fn token(&self) -> Result<String, CapabilityError> {
        let now = self.clock.now_unix();
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(current) = cached.as_ref() {
            if now < current.expires_at - self.config.renewal_window_secs {
                return Ok(current.wire.clone());
            }
        }

        let claims = CapabilityClaims::new(
            &self.config.subject,
            &self.config.audience,
            self.config.scopes.clone(),
            &self.config.issued_by,
            now,
            self.config.lifetime_secs,
        );
        let wire = mint(&claims, &self.signer)?;
        tracing::debug!(
            sub = %claims.sub,
            exp = claims.exp,
            scopes = claims.scopes.len(),
            "minted capability token"
        );

        *cached = Some(CachedToken {
            wire: wire.clone(),
            expires_at: claims.exp,
        });
        Ok(wire)
    }

    pub fn config(&self) -> &CapabilityConfig {
        &self.config
    }
}
