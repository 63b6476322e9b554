//! Market Data Integration
//!
//! Native-currency USD prices and per-network trending tokens.

mod client;
mod mock;

pub use client::MarketClient;
pub use mock::MockMarketClient;

use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::{Result, ScannerError};
use crate::model::{TokenInfo, TrendingToken};

/// Market data client trait (Strategy pattern)
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Current USD price of a native currency (e.g. "ETH")
    async fn get_usd_price(&self, native_symbol: &str) -> Result<Decimal>;

    /// Up to `top_n` tokens on `network`, by 24h volume descending
    async fn get_trending_tokens(&self, network: &str, top_n: usize) -> Result<Vec<TrendingToken>>;

    /// Market snapshot for one token contract, `None` if it has no pairs
    async fn get_token_info(&self, contract_address: &str) -> Result<Option<TokenInfo>>;

    /// Data source name
    fn name(&self) -> &str;
}

/// CoinGecko id for a native currency symbol
pub fn coingecko_id(native_symbol: &str) -> Result<&'static str> {
    match native_symbol.trim().to_uppercase().as_str() {
        "ETH" | "WETH" => Ok("ethereum"),
        "BTC" => Ok("bitcoin"),
        "SOL" => Ok("solana"),
        "MATIC" | "POL" => Ok("matic-network"),
        "BNB" => Ok("binancecoin"),
        "AVAX" => Ok("avalanche-2"),
        other => Err(ScannerError::InvalidArgument(format!(
            "no price source for native currency {:?}",
            other
        ))),
    }
}

/// Order by volume descending then symbol ascending, keep one entry per token
/// address (the highest-volume one), and cut to `top_n`.
pub fn rank_trending(mut tokens: Vec<TrendingToken>, top_n: usize) -> Result<Vec<TrendingToken>> {
    ensure_top_n(top_n)?;

    tokens.sort_by(|a, b| {
        b.volume_24h
            .cmp(&a.volume_24h)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let mut seen = HashSet::new();
    tokens.retain(|t| t.address.is_empty() || seen.insert(t.address.to_ascii_lowercase()));
    tokens.truncate(top_n);
    Ok(tokens)
}

pub(crate) fn ensure_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(ScannerError::InvalidArgument("top_n must be positive".into()));
    }
    Ok(())
}
