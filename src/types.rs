//! Teller - Type Definitions
//!
//! Shared types for the agent's data-integrity plane: registers,
//! context-bank items, configuration, and the tool system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─── Registers ───────────────────────────────────────────────────

/// A provenance-tagged slot in the register store.
///
/// The value is an arbitrary structured document, opaque to the store.
/// `value` and `source` are always written together; no reader ever
/// observes a value from one write paired with a source from another.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEntry {
    pub value: serde_json::Value,
    /// Name of the tool that last wrote this register.
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Change notification emitted on every successful register write.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterChange {
    pub key: String,
    pub value: serde_json::Value,
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

// ─── Context Bank ────────────────────────────────────────────────

/// The closed set of entity types the scanner extracts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Address,
    TokenSymbol,
}

/// An entity extracted from raw user input, stored exactly as it
/// appeared in the text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextItem {
    pub value: String,
    pub kind: EntityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A token symbol the scanner recognizes, with its display name and
/// (when known) canonical contract address.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnownToken {
    pub symbol: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// ─── Configuration ───────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub name: String,
    /// Address of the active wallet. Exposed to tools only through the
    /// `wallet_address` intrinsic register, never as a mutable entry.
    pub wallet_address: String,
    pub chain: String,
    /// Registers that only a designated tool may write: key -> tool name.
    pub blocked_registers: HashMap<String, String>,
    /// Token symbols the entity scanner recognizes.
    pub known_tokens: Vec<KnownToken>,
    /// Default staleness threshold for register reads, in seconds.
    pub register_max_age_secs: u64,
    pub log_level: LogLevel,
    pub version: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Returns a default `AgentConfig`. Fields with no sensible default are
/// set to empty strings so callers can override them.
pub fn default_config() -> AgentConfig {
    AgentConfig {
        name: "teller".to_string(),
        wallet_address: String::new(),
        chain: "base".to_string(),
        blocked_registers: HashMap::new(),
        known_tokens: default_known_tokens(),
        register_max_age_secs: 300,
        log_level: LogLevel::Info,
        version: "0.1.0".to_string(),
    }
}

/// The default token vocabulary: majors on Base.
pub fn default_known_tokens() -> Vec<KnownToken> {
    vec![
        KnownToken {
            symbol: "ETH".to_string(),
            name: "Ether".to_string(),
            address: None,
        },
        KnownToken {
            symbol: "WETH".to_string(),
            name: "Wrapped Ether".to_string(),
            address: Some("0x4200000000000000000000000000000000000006".to_string()),
        },
        KnownToken {
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            address: Some("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913".to_string()),
        },
        KnownToken {
            symbol: "DAI".to_string(),
            name: "Dai Stablecoin".to_string(),
            address: Some("0x50c5725949A6F0c72E6C4a641F24049A917DB0Cb".to_string()),
        },
        KnownToken {
            symbol: "cbBTC".to_string(),
            name: "Coinbase Wrapped BTC".to_string(),
            address: Some("0xcbB7C0000aB88B473b1f5aFd9ef808440eed33Bf".to_string()),
        },
    ]
}

// ─── Tool System ─────────────────────────────────────────────────

/// Trait that every tool the agent can invoke must implement.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> serde_json::Value;
    /// Whether this tool consumes register-eligible fields (addresses,
    /// amounts, calldata). Sensitive tools must declare those fields
    /// with the guarded two-armed schema.
    fn sensitive(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        args: serde_json::Value,
        context: &crate::tools::ToolContext,
    ) -> anyhow::Result<String>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
    pub result: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// OpenAI-compatible tool declaration handed to the inference layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferenceToolDefinition {
    #[serde(rename = "type")]
    pub def_type: String,
    pub function: InferenceToolDefinitionFunction,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InferenceToolDefinitionFunction {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}
