//! Tool Registry
//!
//! Holds the tools exposed to the inference model and executes tool
//! calls, capturing duration and errors in the result record.

use std::collections::HashMap;
use std::time::Instant;

use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::types::{
    AgentTool, InferenceToolDefinition, InferenceToolDefinitionFunction, ToolCallResult,
};

use super::ToolContext;

pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn AgentTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn AgentTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn AgentTool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Convert registered tools to OpenAI-compatible declarations.
    pub fn definitions(&self) -> Vec<InferenceToolDefinition> {
        self.tools
            .values()
            .map(|t| InferenceToolDefinition {
                def_type: "function".to_string(),
                function: InferenceToolDefinitionFunction {
                    name: t.name().to_string(),
                    description: t.description().to_string(),
                    parameters: t.parameters(),
                },
            })
            .collect()
    }

    /// Execute a tool call and return the result record. A failed tool
    /// ends the current step, never the session, so errors are captured
    /// in the record rather than propagated.
    pub async fn execute(
        &self,
        tool_name: &str,
        args: &Value,
        ctx: &ToolContext,
    ) -> ToolCallResult {
        let start = Instant::now();

        let tool = match self.tools.get(tool_name) {
            Some(tool) => tool,
            None => {
                return ToolCallResult {
                    id: format!("tc_{}", Uuid::new_v4()),
                    name: tool_name.to_string(),
                    arguments: args.clone(),
                    result: String::new(),
                    duration_ms: 0,
                    error: Some(format!("Unknown tool: {}", tool_name)),
                }
            }
        };

        match tool.execute(args.clone(), ctx).await {
            Ok(output) => {
                info!(tool = tool_name, "tool executed");
                ToolCallResult {
                    id: format!("tc_{}", Uuid::new_v4()),
                    name: tool_name.to_string(),
                    arguments: args.clone(),
                    result: output,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            Err(err) => ToolCallResult {
                id: format!("tc_{}", Uuid::new_v4()),
                name: tool_name.to_string(),
                arguments: args.clone(),
                result: String::new(),
                duration_ms: start.elapsed().as_millis() as u64,
                error: Some(err.to_string()),
            },
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
