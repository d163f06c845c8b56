// src/domain/models.rs
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Wire Contract Types
///
/// Everything the state service transmits is optional: the service emits
/// whatever subset it currently knows and the decoder never fills in
/// defaults. Absent fields stay absent on re-serialization, and unknown
/// fields are ignored on decode.

/// Market quote for a trading pair at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Unix timestamp in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bid_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ask_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vwap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_close: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_volume: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_volume: Option<f64>,
    /// Opaque exchange-specific payload, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<HashMap<String, Value>>,
}

impl Price {
    /// Quote time as a UTC datetime, when the millisecond timestamp is
    /// present and in range.
    pub fn datetime_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// A trading order as reported by the service.
///
/// `status`, `side`, and `order_type` are opaque integer codes. The upstream
/// contract ships no value-set definition for them, so they are not mapped
/// onto enums here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub order_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<HashMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_b: Option<String>,
    /// Millisecond timestamp transmitted as a string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_trade_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filled: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trades: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fees: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_price: Option<f64>,
}

impl Order {
    /// Order time as a UTC datetime, when the string-encoded millisecond
    /// timestamp is present and parseable.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|raw| raw.parse::<i64>().ok())
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

/// Per-asset balance at a single venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<HashMap<String, Value>>,
}

/// Balances keyed by asset symbol.
pub type AssetBalances = HashMap<String, Asset>;

/// Quotes keyed by market symbol.
pub type PriceQuotes = HashMap<String, Price>;

/// Portfolio holdings keyed by ledger id, then exchange id.
pub type LedgerExchangeAssetMap = HashMap<String, HashMap<String, AssetBalances>>;

/// Market quotes keyed by ledger id, then exchange id.
pub type LedgerExchangePriceMap = HashMap<String, HashMap<String, PriceQuotes>>;

/// The aggregate snapshot returned by `GET /`.
///
/// A fresh, disposable value replaced wholesale by the next successful
/// query; no field carries identity across requests. The order lists other
/// than `open_orders` are declared as opaque values by the upstream
/// contract and are kept that way here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<LedgerExchangeAssetMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<LedgerExchangePriceMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_orders: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_orders: Option<Vec<Order>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_orders: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_orders: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unaffordable_opportunity: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_open_orders: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_since_last_update: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_period: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_healthy: Option<bool>,
}

impl StateResponse {
    /// Open-order count, preferring the service-reported total and falling
    /// back to the decoded list length.
    pub fn open_order_count(&self) -> usize {
        self.total_open_orders
            .map(|n| n as usize)
            .or_else(|| self.open_orders.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    /// Balances for one ledger/exchange pair, if present in the snapshot.
    pub fn balances(&self, ledger_id: &str, exchange_id: &str) -> Option<&AssetBalances> {
        self.portfolio.as_ref()?.get(ledger_id)?.get(exchange_id)
    }

    /// Quotes for one ledger/exchange pair, if present in the snapshot.
    pub fn quotes(&self, ledger_id: &str, exchange_id: &str) -> Option<&PriceQuotes> {
        self.prices.as_ref()?.get(ledger_id)?.get(exchange_id)
    }
}

/// Shell-Facing Contracts
///
/// Consumed by the desktop shell that supervises agents. Wire names are
/// camelCase for compatibility with that consumer; nothing here is used by
/// the query path itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentStatus {
    Started,
    Running,
    Stopped,
    Stopping,
    Paused,
    Exited,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Started => "Started",
            AgentStatus::Running => "Running",
            AgentStatus::Stopped => "Stopped",
            AgentStatus::Stopping => "Stopping",
            AgentStatus::Paused => "Paused",
            AgentStatus::Exited => "Exited",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Started" => Ok(AgentStatus::Started),
            "Running" => Ok(AgentStatus::Running),
            "Stopped" => Ok(AgentStatus::Stopped),
            "Stopping" => Ok(AgentStatus::Stopping),
            "Paused" => Ok(AgentStatus::Paused),
            "Exited" => Ok(AgentStatus::Exited),
            other => Err(format!("unknown agent status: {}", other)),
        }
    }
}

/// A supervised agent as the shell sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub status: AgentStatus,
    pub address: String,
    pub last_seen_timestamp: String,
}

impl Agent {
    /// Last-seen time as a UTC datetime, when the RFC 3339 timestamp parses.
    pub fn last_seen_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_seen_timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
