//! Domain Models
//!
//! Data read from the explorer and market APIs, plus the per-token activity
//! derived from it. Uses `rust_decimal` for all amounts and prices.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Native-currency balance of a wallet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceInfo {
    /// Amount in native units (ETH, not wei)
    pub amount: Decimal,

    /// USD value at the live price, if the price was available
    pub usd_value: Option<Decimal>,
}

impl BalanceInfo {
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            usd_value: None,
        }
    }

    /// Attach a USD valuation
    pub fn priced(mut self, usd_price: Decimal) -> Self {
        self.usd_value = Some(self.amount * usd_price);
        self
    }
}

/// Direction of a transfer relative to the queried wallet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// A token moving into or out of the queried wallet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenTransferEvent {
    /// Symbol as reported by the explorer (not normalized)
    pub symbol: String,

    /// Token contract address
    pub contract_address: String,

    pub direction: Direction,

    /// Amount in whole token units
    pub amount: Decimal,

    pub timestamp: DateTime<Utc>,
}

/// Net trading stance on a token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Buying,
    Selling,
    /// Equal buy and sell counts
    Mixed,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Buying => "BUYING",
            Classification::Selling => "SELLING",
            Classification::Mixed => "MIXED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Classification::Buying => "🟢",
            Classification::Selling => "🔴",
            Classification::Mixed => "⚪",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buy/sell tally for one token symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenActivity {
    pub symbol: String,

    /// Contract of the first transfer seen for this symbol
    pub contract_address: String,

    pub buys: u32,
    pub sells: u32,

    pub buy_amount: Decimal,
    pub sell_amount: Decimal,
}

impl TokenActivity {
    pub fn new(symbol: impl Into<String>, contract_address: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            contract_address: contract_address.into(),
            buys: 0,
            sells: 0,
            buy_amount: Decimal::ZERO,
            sell_amount: Decimal::ZERO,
        }
    }

    /// Count one transfer
    pub fn record(&mut self, direction: Direction, amount: Decimal) {
        match direction {
            Direction::In => {
                self.buys += 1;
                self.buy_amount += amount;
            }
            Direction::Out => {
                self.sells += 1;
                self.sell_amount += amount;
            }
        }
    }

    pub fn total(&self) -> u32 {
        self.buys + self.sells
    }

    pub fn classification(&self) -> Classification {
        use std::cmp::Ordering;
        match self.buys.cmp(&self.sells) {
            Ordering::Greater => Classification::Buying,
            Ordering::Less => Classification::Selling,
            Ordering::Equal => Classification::Mixed,
        }
    }
}

/// A token ranked by 24h trading volume
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendingToken {
    pub symbol: String,

    /// Base token contract address
    pub address: String,

    pub volume_24h: Decimal,

    pub price_usd: Option<Decimal>,

    /// 24h price change in percent
    pub price_change_24h: Option<Decimal>,
}

/// Market snapshot for a single token
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub name: String,
    pub price_usd: Decimal,
    pub price_change_24h: Decimal,
    pub volume_24h: Decimal,
    pub liquidity_usd: Decimal,
}
