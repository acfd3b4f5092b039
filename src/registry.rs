//! Token metadata registry.
//!
//! Display metadata (human names, decimal precision) is a side channel: the
//! accrual and aggregation layers never consult it, amounts flow through in
//! the token's natural unit, and only the output writer looks names up.

use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Display metadata for one token.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenMeta {
    /// Token account identifier
    pub token: String,

    /// Human-readable token name
    pub name: String,

    /// Decimal precision of the token's base unit
    pub decimals: u8,
}

/// In-memory token registry, passed explicitly wherever metadata is needed.
#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, TokenMeta>,
}

impl TokenRegistry {
    /// Creates an empty registry. Lookups against it all miss, which the
    /// output layer treats as "no display name known".
    pub fn new() -> Self {
        TokenRegistry {
            tokens: HashMap::new(),
        }
    }

    /// Loads a `token,name,decimals` CSV.
    ///
    /// Rows that fail to parse are logged and skipped; metadata is cosmetic
    /// and a bad row must not take the dashboard down. Only reader-level
    /// failures abort.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut registry = TokenRegistry::new();
        for (row_idx, result) in csv_reader.deserialize::<TokenMeta>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            match result {
                Ok(meta) if meta.token.is_empty() => {
                    warn!("Row {}: token registry entry without a token id, skipping", row_num);
                }
                Ok(meta) => registry.insert(meta),
                Err(e) => warn!("Row {}: invalid token registry entry: {}", row_num, e),
            }
        }
        Ok(registry)
    }

    /// Registers metadata, replacing any previous entry for the token.
    pub fn insert(&mut self, meta: TokenMeta) {
        self.tokens.insert(meta.token.clone(), meta);
    }

    /// Looks up metadata for a token identifier.
    pub fn get(&self, token: &str) -> Option<&TokenMeta> {
        self.tokens.get(token)
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no tokens are registered.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
