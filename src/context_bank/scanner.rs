//! Entity Scanner
//!
//! Stateless extractors that pull structured entities out of raw user
//! text. Matched literals are kept exactly as they appear; the literal
//! is the ground truth, not a normalized form of it.

use alloy_primitives::Address;
use regex::Regex;

use crate::types::{ContextItem, EntityKind, KnownToken};

/// Address-like tokens: a 0x prefix and exactly 40 hex characters,
/// word-bounded on both sides.
const ADDRESS_PATTERN: &str = r"\b0x[0-9a-fA-F]{40}\b";

/// Check whether a string parses as an EVM address.
pub fn is_evm_address(s: &str) -> bool {
    s.parse::<Address>().is_ok()
}

/// Extract address-like tokens in order of appearance.
pub fn extract_addresses(text: &str) -> Vec<ContextItem> {
    let candidates: Vec<String> = Regex::new(ADDRESS_PATTERN)
        .map(|re| {
            re.find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        })
        .unwrap_or_default();

    candidates
        .into_iter()
        .filter(|candidate| is_evm_address(candidate))
        .map(|value| ContextItem {
            value,
            kind: EntityKind::Address,
            label: None,
        })
        .collect()
}

/// Extract whole-word, case-insensitive matches against the known-token
/// vocabulary. Matches carry the canonical symbol and the token's full
/// name as a label.
pub fn extract_symbols(text: &str, vocabulary: &[KnownToken]) -> Vec<ContextItem> {
    let mut items = Vec::new();

    for token in vocabulary {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(&token.symbol));
        let matched = Regex::new(&pattern)
            .map(|re| re.is_match(text))
            .unwrap_or(false);

        if matched {
            items.push(ContextItem {
                value: token.symbol.clone(),
                kind: EntityKind::TokenSymbol,
                label: Some(token.name.clone()),
            });
        }
    }

    items
}

/// Run all extractors in fixed order: addresses first, then symbols.
pub fn scan(text: &str, vocabulary: &[KnownToken]) -> Vec<ContextItem> {
    let mut items = extract_addresses(text);
    items.extend(extract_symbols(text, vocabulary));
    items
}
