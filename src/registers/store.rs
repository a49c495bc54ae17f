//! Register Store
//!
//! A concurrent, session-scoped key->value cache with per-entry
//! provenance. A tool that needs the address from the last swap quote
//! reads `get_path("swap_quote", "to")` directly instead of asking the
//! model to re-type a hex string it was shown moments earlier.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::error::RegisterError;
use crate::types::{AgentConfig, RegisterChange, RegisterEntry};

use super::{IntrinsicRegistry, RegisterEvents};

pub struct RegisterStore {
    entries: RwLock<HashMap<String, RegisterEntry>>,
    /// Policy table: register key -> the only tool allowed to write it.
    blocked: HashMap<String, String>,
    intrinsics: IntrinsicRegistry,
    events: RegisterEvents,
}

impl RegisterStore {
    /// Build a store for one session, wiring the blocked-register policy
    /// and intrinsic providers from the config.
    pub fn new(config: Arc<AgentConfig>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            blocked: config.blocked_registers.clone(),
            intrinsics: IntrinsicRegistry::new(config),
            events: RegisterEvents::default(),
        }
    }

    /// Store `(value, source, now)` under `key` atomically.
    ///
    /// Fails with `ReservedKey` when `key` names an intrinsic register,
    /// and with `Blocked` when the key is policy-governed and `source`
    /// is not its designated writer; a rejected write leaves the prior
    /// value (or absence) untouched. The change notification goes out
    /// after the lock is released.
    pub fn set(&self, key: &str, value: Value, source: &str) -> Result<(), RegisterError> {
        if self.intrinsics.contains(key) {
            return Err(RegisterError::ReservedKey(key.to_string()));
        }

        if let Some(required) = self.blocked.get(key) {
            if required != source {
                warn!(key, source, required = required.as_str(), "blocked register write rejected");
                return Err(RegisterError::Blocked {
                    key: key.to_string(),
                    required_writer: required.clone(),
                    attempted: source.to_string(),
                });
            }
        }

        let entry = RegisterEntry {
            value,
            source: source.to_string(),
            created_at: Utc::now(),
        };
        let change = RegisterChange {
            key: key.to_string(),
            value: entry.value.clone(),
            source: entry.source.clone(),
            timestamp: entry.created_at,
        };

        {
            let mut entries = self.entries.write();
            entries.insert(key.to_string(), entry);
        }

        // Observers must never stall a write.
        self.events.publish(change);
        info!(key, source, "register set");
        Ok(())
    }

    /// Point-in-time snapshot of `key`. Never waits for a future writer.
    pub fn get(&self, key: &str) -> Result<RegisterEntry, RegisterError> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| RegisterError::NotFound(key.to_string()))
    }

    /// Traverse a dotted path within the structured value under `key`.
    /// Array elements are addressed by numeric segments.
    pub fn get_path(&self, key: &str, path: &str) -> Result<Value, RegisterError> {
        let entry = self.get(key)?;

        let mut current = &entry.value;
        for segment in path.split('.') {
            let next = match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => {
                    return Err(RegisterError::PathNotFound {
                        key: key.to_string(),
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
            }
        }

        Ok(current.clone())
    }

    /// Whether the value under `key` is older than `max_age`.
    pub fn is_stale(&self, key: &str, max_age: Duration) -> Result<bool, RegisterError> {
        self.get_with_staleness(key, max_age).map(|(_, stale)| stale)
    }

    /// Read an entry together with its staleness flag. A stale value
    /// stays readable; the caller decides whether to recompute it.
    pub fn get_with_staleness(
        &self,
        key: &str,
        max_age: Duration,
    ) -> Result<(RegisterEntry, bool), RegisterError> {
        let entry = self.get(key)?;
        let stale = Utc::now() - entry.created_at > max_age;
        Ok((entry, stale))
    }

    /// Compute the current value of an intrinsic register.
    pub fn resolve_intrinsic(&self, name: &str) -> Result<Value, RegisterError> {
        self.intrinsics.resolve(name)
    }

    /// All currently set ordinary keys with metadata, sorted by key.
    /// For diagnostics and UI, not tool logic.
    pub fn list(&self) -> Vec<(String, RegisterEntry)> {
        let entries = self.entries.read();
        let mut listed: Vec<(String, RegisterEntry)> = entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        listed.sort_by(|a, b| a.0.cmp(&b.0));
        listed
    }

    /// Subscribe to change notifications for every successful write.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<RegisterChange>> {
        self.events.subscribe()
    }

    /// Names of the registered intrinsic providers.
    pub fn intrinsic_names(&self) -> Vec<&str> {
        self.intrinsics.names()
    }

    /// Clear all ordinary registers. Session teardown/reset only; there
    /// is no per-key delete in normal operation.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
