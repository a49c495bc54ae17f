//! Tool Execution Context
//!
//! The aggregate handed by reference into every tool invocation:
//! register store access, context bank read access, and the
//! change-notification sink for observing clients.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::context_bank::ContextBank;
use crate::registers::RegisterStore;
use crate::types::{AgentConfig, RegisterChange};

#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<AgentConfig>,
    pub registers: Arc<RegisterStore>,
    pub bank: Arc<ContextBank>,
}

impl ToolContext {
    pub fn new(
        config: Arc<AgentConfig>,
        registers: Arc<RegisterStore>,
        bank: Arc<ContextBank>,
    ) -> Self {
        Self {
            config,
            registers,
            bank,
        }
    }

    /// Subscribe to register change notifications (UI, logging).
    pub fn subscribe_changes(&self) -> broadcast::Receiver<Arc<RegisterChange>> {
        self.registers.subscribe()
    }
}
