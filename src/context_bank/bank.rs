//! Context Bank
//!
//! Session-scoped store of entities discovered in raw user input,
//! deduplicated and exposed as a compact digest for the model's context
//! window. Membership is append-only: scanning never removes entities.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{ContextItem, EntityKind, KnownToken};

use super::scanner;

struct BankInner {
    /// Insertion order, for digest determinism.
    items: Vec<ContextItem>,
    seen: HashSet<(String, EntityKind)>,
}

pub struct ContextBank {
    inner: RwLock<BankInner>,
    vocabulary: Vec<KnownToken>,
}

impl ContextBank {
    pub fn new(vocabulary: Vec<KnownToken>) -> Self {
        Self {
            inner: RwLock::new(BankInner {
                items: Vec::new(),
                seen: HashSet::new(),
            }),
            vocabulary,
        }
    }

    /// Scan raw user text and add any new entities. Idempotent:
    /// rescanning the same text does not duplicate items.
    pub fn scan_input(&self, text: &str) {
        let found = scanner::scan(text, &self.vocabulary);
        if found.is_empty() {
            return;
        }

        let mut inner = self.inner.write();
        let mut added = 0usize;
        for item in found {
            let fingerprint = (item.value.clone(), item.kind.clone());
            if inner.seen.insert(fingerprint) {
                inner.items.push(item);
                added += 1;
            }
        }

        if added > 0 {
            debug!(added, total = inner.items.len(), "context bank updated");
        }
    }

    /// A deterministic digest of all known items grouped by kind, or
    /// `None` when the bank is empty. Insertion order within each group.
    pub fn format_for_agent(&self) -> Option<String> {
        let inner = self.inner.read();
        if inner.items.is_empty() {
            return None;
        }

        let addresses: Vec<&ContextItem> = inner
            .items
            .iter()
            .filter(|i| i.kind == EntityKind::Address)
            .collect();
        let symbols: Vec<&ContextItem> = inner
            .items
            .iter()
            .filter(|i| i.kind == EntityKind::TokenSymbol)
            .collect();

        let mut lines = vec!["Entities seen in user input:".to_string()];
        if !addresses.is_empty() {
            let rendered: Vec<&str> = addresses.iter().map(|i| i.value.as_str()).collect();
            lines.push(format!("Addresses: {}", rendered.join(", ")));
        }
        if !symbols.is_empty() {
            let rendered: Vec<String> = symbols
                .iter()
                .map(|i| match &i.label {
                    Some(label) => format!("{} ({})", i.value, label),
                    None => i.value.clone(),
                })
                .collect();
            lines.push(format!("Tokens: {}", rendered.join(", ")));
        }

        Some(lines.join("\n"))
    }

    /// Snapshot of all known items, in insertion order.
    pub fn items(&self) -> Vec<ContextItem> {
        self.inner.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Session teardown/reset only.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.items.clear();
        inner.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_known_tokens;

    fn test_bank() -> ContextBank {
        ContextBank::new(default_known_tokens())
    }

    #[test]
    fn test_scanning_twice_does_not_duplicate() {
        let bank = test_bank();
        let text = "send to 0x742d35Cc6634C0532925a3b844Bc9e7595f8FdF0";

        bank.scan_input(text);
        bank.scan_input(text);

        let items = bank.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, EntityKind::Address);
    }

    #[test]
    fn test_symbol_dedup_is_case_canonical() {
        let bank = test_bank();
        bank.scan_input("swap USDC");
        bank.scan_input("swap usdc again");
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_membership_is_append_only() {
        let bank = test_bank();
        bank.scan_input("pay 0x742d35Cc6634C0532925a3b844Bc9e7595f8FdF0");
        bank.scan_input("now about DAI");

        let items = bank.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, EntityKind::Address);
        assert_eq!(items[1].value, "DAI");
    }

    #[test]
    fn test_digest_groups_by_kind_with_labels() {
        let bank = test_bank();
        bank.scan_input("transfer 5 USDC to 0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");

        let digest = bank.format_for_agent().expect("digest");
        let lines: Vec<&str> = digest.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Addresses: 0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"));
        assert!(lines[2].contains("USDC (USD Coin)"));
    }

    #[test]
    fn test_digest_is_deterministic_across_calls() {
        let bank = test_bank();
        bank.scan_input("swap ETH for DAI at 0x742d35Cc6634C0532925a3b844Bc9e7595f8FdF0");

        let first = bank.format_for_agent().expect("digest");
        let second = bank.format_for_agent().expect("digest");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_bank_has_no_digest() {
        let bank = test_bank();
        assert!(bank.format_for_agent().is_none());

        bank.scan_input("nothing interesting here");
        assert!(bank.format_for_agent().is_none());
    }

    #[test]
    fn test_clear_empties_the_bank() {
        let bank = test_bank();
        bank.scan_input("swap USDC");
        assert!(!bank.is_empty());

        bank.clear();
        assert!(bank.is_empty());
        assert!(bank.format_for_agent().is_none());

        // After a reset the same entity can be learned again.
        bank.scan_input("swap USDC");
        assert_eq!(bank.len(), 1);
    }
}
