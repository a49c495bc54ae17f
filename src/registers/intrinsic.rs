//! Intrinsic Registers
//!
//! Named values computed on demand from configuration rather than
//! stored as mutable entries. The registry is structurally separate
//! from the mutable map, so the generic write path can never target an
//! intrinsic name.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::Address;
use serde_json::{json, Value};

use crate::error::RegisterError;
use crate::types::AgentConfig;

/// A provider computes the current value of one intrinsic register.
/// Providers must be pure functions of the configuration: idempotent
/// and side-effect free.
pub type IntrinsicProvider = Arc<dyn Fn(&AgentConfig) -> Value + Send + Sync>;

pub struct IntrinsicRegistry {
    config: Arc<AgentConfig>,
    providers: HashMap<String, IntrinsicProvider>,
}

impl IntrinsicRegistry {
    /// Build the registry with the built-in providers.
    pub fn new(config: Arc<AgentConfig>) -> Self {
        let mut registry = Self {
            config,
            providers: HashMap::new(),
        };

        registry.register(
            "wallet_address",
            Arc::new(|cfg| {
                // Checksummed when the configured address parses.
                match cfg.wallet_address.parse::<Address>() {
                    Ok(addr) => json!(addr.to_checksum(None)),
                    Err(_) => json!(cfg.wallet_address),
                }
            }),
        );
        registry.register("chain", Arc::new(|cfg| json!(cfg.chain)));
        registry.register("agent_name", Arc::new(|cfg| json!(cfg.name)));

        registry
    }

    /// Register a provider under `name`. Replaces any existing provider
    /// with the same name.
    pub fn register(&mut self, name: &str, provider: IntrinsicProvider) {
        self.providers.insert(name.to_string(), provider);
    }

    /// Whether `name` is an intrinsic register.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Compute the current value of the named intrinsic register.
    pub fn resolve(&self, name: &str) -> Result<Value, RegisterError> {
        let provider = self
            .providers
            .get(name)
            .ok_or_else(|| RegisterError::NotFound(name.to_string()))?;
        Ok(provider(&self.config))
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }
}
