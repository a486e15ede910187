//! Engine configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_NAME_LENGTH, DEFAULT_MAX_PRICE, DEFAULT_MAX_QUANTITY};

/// Validation bounds enforced by the catalog when a listing is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLimits {
    /// Maximum listing name length in bytes.
    pub max_name_length: usize,
    /// Maximum unit price.
    pub max_price: Decimal,
    /// Maximum stock quantity per listing.
    pub max_quantity: u32,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            max_name_length: DEFAULT_MAX_NAME_LENGTH,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub catalog: CatalogLimits,
}
