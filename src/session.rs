//! Session
//!
//! Exactly one register store and one context bank per session, created
//! together at session start and torn down together. Registers span
//! turns within the session; staleness, not implicit clearing, guards
//! against old values.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use crate::context_bank::ContextBank;
use crate::error::RegisterError;
use crate::registers::RegisterStore;
use crate::tools::ToolContext;
use crate::types::AgentConfig;

pub struct Session {
    pub id: String,
    config: Arc<AgentConfig>,
    registers: Arc<RegisterStore>,
    bank: Arc<ContextBank>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(config: Arc<AgentConfig>) -> Self {
        let registers = Arc::new(RegisterStore::new(config.clone()));
        let bank = Arc::new(ContextBank::new(config.known_tokens.clone()));
        let session = Self {
            id: format!("sess_{}", Uuid::new_v4()),
            config,
            registers,
            bank,
            created_at: Utc::now(),
        };
        info!(session = session.id.as_str(), "session started");
        session
    }

    /// Scan raw user input into the context bank. Runs before any
    /// reasoning, so the extracted entities cannot be contaminated by
    /// model output.
    pub fn ingest_user_input(&self, text: &str) {
        self.bank.scan_input(text);
    }

    /// The context bank digest for the model's context window, or
    /// `None` when nothing has been extracted yet.
    pub fn context_digest(&self) -> Option<String> {
        self.bank.format_for_agent()
    }

    /// Build the execution context handed to a tool invocation.
    pub fn tool_context(&self) -> ToolContext {
        ToolContext::new(
            self.config.clone(),
            self.registers.clone(),
            self.bank.clone(),
        )
    }

    pub fn registers(&self) -> &Arc<RegisterStore> {
        &self.registers
    }

    pub fn bank(&self) -> &Arc<ContextBank> {
        &self.bank
    }

    /// Whether a register is older than the configured default
    /// threshold. Callers decide whether to recompute; nothing is
    /// corrected silently.
    pub fn is_register_stale(&self, key: &str) -> Result<bool, RegisterError> {
        self.registers.is_stale(
            key,
            Duration::seconds(self.config.register_max_age_secs as i64),
        )
    }

    /// Clear all session state. The only bulk-delete path.
    pub fn reset(&self) {
        self.registers.clear();
        self.bank.clear();
        info!(session = self.id.as_str(), "session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{guarded_schema, GuardedValue, ToolRegistry};
    use crate::types::{default_config, AgentTool};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Fetches a swap quote and parks the calldata in a register; only
    /// a short confirmation ever reaches the model.
    struct QuoteTool;

    #[async_trait]
    impl AgentTool for QuoteTool {
        fn name(&self) -> &str {
            "quote_tool"
        }
        fn description(&self) -> &str {
            "Fetch a swap quote and store it for the submitter"
        }
        fn parameters(&self) -> Value {
            json!({ "type": "object", "properties": {} })
        }
        async fn execute(&self, _args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
            ctx.registers.set(
                "swap_quote",
                json!({"to": "0xAAA", "data": "0xdead", "value": "1000"}),
                self.name(),
            )?;
            Ok("Quote stored under register 'swap_quote'".to_string())
        }
    }

    /// Consumes the quote through the register plane, never through
    /// model-restated text.
    struct SubmitTool;

    #[async_trait]
    impl AgentTool for SubmitTool {
        fn name(&self) -> &str {
            "submit_tool"
        }
        fn description(&self) -> &str {
            "Submit a transaction to a destination"
        }
        fn sensitive(&self) -> bool {
            true
        }
        fn parameters(&self) -> Value {
            json!({
                "type": "object",
                "properties": {
                    "destination": guarded_schema("Destination address")
                },
                "required": ["destination"]
            })
        }
        async fn execute(&self, args: Value, ctx: &ToolContext) -> anyhow::Result<String> {
            let destination = GuardedValue::parse(&args, "destination")?;
            let resolved = destination.resolve(&ctx.registers)?;
            let to = resolved
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Destination is not a string"))?;
            Ok(format!("submitted to {}", to))
        }
    }

    fn test_session() -> Session {
        Session::new(Arc::new(default_config()))
    }

    #[tokio::test]
    async fn test_quote_flows_to_submitter_without_model_text() {
        let session = test_session();
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(QuoteTool));
        registry.register(Box::new(SubmitTool));
        let ctx = session.tool_context();

        let quote = registry.execute("quote_tool", &json!({}), &ctx).await;
        assert!(quote.error.is_none());
        // The destination address never appears in the model-visible output.
        assert!(!quote.result.contains("0xAAA"));

        let submit = registry
            .execute(
                "submit_tool",
                &json!({"destination": {"register": "swap_quote", "path": "to"}}),
                &ctx,
            )
            .await;
        assert!(submit.error.is_none());
        assert_eq!(submit.result, "submitted to 0xAAA");
    }

    #[tokio::test]
    async fn test_ambiguous_guarded_input_fails_before_the_tool_body() {
        let session = test_session();
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(SubmitTool));

        let result = registry
            .execute(
                "submit_tool",
                &json!({"destination": {"register": "swap_quote", "literal": "0xBBB"}}),
                &session.tool_context(),
            )
            .await;
        let error = result.error.expect("validation error");
        assert!(error.contains("both"));
    }

    #[tokio::test]
    async fn test_literal_arm_works_without_prior_registers() {
        let session = test_session();
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(SubmitTool));

        let result = registry
            .execute(
                "submit_tool",
                &json!({"destination": {"literal": "0xBBB"}}),
                &session.tool_context(),
            )
            .await;
        assert!(result.error.is_none());
        assert_eq!(result.result, "submitted to 0xBBB");
    }

    #[test]
    fn test_registers_span_turns_until_reset() {
        let session = test_session();
        session
            .registers()
            .set("swap_quote", json!({"to": "0xAAA"}), "quote_tool")
            .expect("set");
        session.ingest_user_input("swap 5 USDC");

        // A later turn still sees both.
        assert!(session.registers().get("swap_quote").is_ok());
        assert!(session.context_digest().is_some());

        session.reset();
        assert!(session.registers().get("swap_quote").is_err());
        assert!(session.context_digest().is_none());
    }

    #[test]
    fn test_digest_reflects_ingested_input() {
        let session = test_session();
        assert!(session.context_digest().is_none());

        session.ingest_user_input(
            "transfer 5 USDC to 0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913",
        );
        let digest = session.context_digest().expect("digest");
        assert!(digest.contains("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(digest.contains("USDC"));
    }

    #[test]
    fn test_default_staleness_threshold_comes_from_config() {
        let mut config = default_config();
        config.register_max_age_secs = 3600;
        let session = Session::new(Arc::new(config));

        session
            .registers()
            .set("swap_quote", json!({}), "quote_tool")
            .expect("set");
        assert!(!session.is_register_stale("swap_quote").expect("stale check"));
        assert!(session.is_register_stale("never_set").is_err());
    }

    #[test]
    fn test_each_session_owns_its_own_stores() {
        let first = test_session();
        let second = test_session();

        first
            .registers()
            .set("swap_quote", json!({}), "quote_tool")
            .expect("set");
        assert!(second.registers().get("swap_quote").is_err());
    }
}
