//! Provider Factory
//!
//! Owns the primary and fallback provider slots. Each slot is filled on
//! first use and reused until explicitly reset. The primary vendor name is
//! taken from configuration when the factory is built and parsed lazily, so
//! an unknown name surfaces as a config error on the first generation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{ProviderKind, SharedProvider, create_provider};
use crate::config::LlmConfig;
use crate::types::Result;

/// Builds a provider for a vendor; swapped out in tests
pub type ProviderConstructor =
    Arc<dyn Fn(ProviderKind, &LlmConfig) -> Result<SharedProvider> + Send + Sync>;

pub struct ProviderFactory {
    config: LlmConfig,
    constructor: ProviderConstructor,
    primary: Mutex<Option<SharedProvider>>,
    fallback: Mutex<Option<SharedProvider>>,
}

impl std::fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderFactory")
            .field("provider", &self.config.provider)
            .field("primary_ready", &lock(&self.primary).is_some())
            .field("fallback_ready", &lock(&self.fallback).is_some())
            .finish()
    }
}

impl ProviderFactory {
    /// Factory backed by the real vendor adapters
    pub fn new(config: LlmConfig) -> Self {
        Self::with_constructor(config, create_provider)
    }

    pub fn with_constructor<F>(config: LlmConfig, constructor: F) -> Self
    where
        F: Fn(ProviderKind, &LlmConfig) -> Result<SharedProvider> + Send + Sync + 'static,
    {
        Self {
            config,
            constructor: Arc::new(constructor),
            primary: Mutex::new(None),
            fallback: Mutex::new(None),
        }
    }

    /// Configured primary vendor
    pub fn primary_kind(&self) -> Result<ProviderKind> {
        self.config.provider.parse()
    }

    /// Primary provider, constructed on first call.
    ///
    /// Errors for an unknown vendor name or a missing API key.
    pub fn provider(&self) -> Result<SharedProvider> {
        let mut slot = lock(&self.primary);
        if let Some(provider) = slot.as_ref() {
            return Ok(Arc::clone(provider));
        }

        let kind = self.primary_kind()?;
        let provider = (self.constructor)(kind, &self.config)?;
        debug!(provider = provider.name(), model = provider.model(), "Primary provider ready");

        *slot = Some(Arc::clone(&provider));
        Ok(provider)
    }

    /// The other vendor, or `None` when it cannot be built (usually a missing key).
    pub fn fallback_provider(&self) -> Option<SharedProvider> {
        let mut slot = lock(&self.fallback);
        if let Some(provider) = slot.as_ref() {
            return Some(Arc::clone(provider));
        }

        let kind = self.primary_kind().ok()?.fallback()?;
        match (self.constructor)(kind, &self.config) {
            Ok(provider) => {
                debug!(provider = provider.name(), "Fallback provider ready");
                *slot = Some(Arc::clone(&provider));
                Some(provider)
            }
            Err(e) => {
                debug!(provider = kind.display_name(), error = %e, "Fallback provider unavailable");
                None
            }
        }
    }

    /// Drop the cached primary; the next call rebuilds it
    pub fn reset_provider(&self) {
        *lock(&self.primary) = None;
    }

    pub fn reset_fallback_provider(&self) {
        *lock(&self.fallback) = None;
    }
}

fn lock(slot: &Mutex<Option<SharedProvider>>) -> MutexGuard<'_, Option<SharedProvider>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
