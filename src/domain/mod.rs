// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{ClientError, ClientResult};
pub use models::{
    Agent, AgentStatus, Asset, AssetBalances, LedgerExchangeAssetMap, LedgerExchangePriceMap,
    Order, Price, PriceQuotes, StateResponse,
};
