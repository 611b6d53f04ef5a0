//! Generation Parameters
//!
//! Vendor-generic knobs (`model`, `temperature`, `max_tokens`, `top_p`,
//! `random_seed`, `presence_penalty`, `frequency_penalty`) travel as an
//! ordered JSON map. Each provider merges caller overrides over its own
//! defaults and drops the keys its API rejects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-facing keys that toggle output validation instead of reaching the vendor
pub const SKIP_VALIDATION_KEYS: &[&str] = &["skipValidation", "skip_validation"];

/// Ordered parameter map sent in the vendor request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationParams(Map<String, Value>);

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary parameter (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn model(self, model: impl Into<String>) -> Self {
        self.with("model", model.into())
    }

    pub fn temperature(self, temperature: f64) -> Self {
        self.with("temperature", temperature)
    }

    pub fn max_tokens(self, max_tokens: u32) -> Self {
        self.with("max_tokens", max_tokens)
    }

    pub fn top_p(self, top_p: f64) -> Self {
        self.with("top_p", top_p)
    }

    pub fn random_seed(self, seed: u64) -> Self {
        self.with("random_seed", seed)
    }

    pub fn presence_penalty(self, penalty: f64) -> Self {
        self.with("presence_penalty", penalty)
    }

    pub fn frequency_penalty(self, penalty: f64) -> Self {
        self.with("frequency_penalty", penalty)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `self` on top of `defaults`; keys in `self` win.
    pub fn merged_over(&self, defaults: &GenerationParams) -> GenerationParams {
        let mut merged = defaults.0.clone();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }
        GenerationParams(merged)
    }

    /// Copy without the given keys
    pub fn without(&self, keys: &[&str]) -> GenerationParams {
        GenerationParams(
            self.0
                .iter()
                .filter(|(key, _)| !keys.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for GenerationParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Per-call options for [`crate::ai::Generator::generate`]
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Return raw output without the leaked-secret scan
    pub skip_validation: bool,
    /// Vendor parameter overrides
    pub params: GenerationParams,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_validation(mut self) -> Self {
        self.skip_validation = true;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Build from a raw option map, pulling the validation toggle out so it
    /// is never forwarded to a vendor.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let mut skip_validation = false;
        for key in SKIP_VALIDATION_KEYS {
            if let Some(value) = map.remove(*key) {
                skip_validation |= value.as_bool().unwrap_or(false);
            }
        }
        Self {
            skip_validation,
            params: GenerationParams(map),
        }
    }
}
