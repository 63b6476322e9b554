//! Mock Market Client
//!
//! For testing and demo purposes. Returns realistic static Base market data.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use super::{coingecko_id, rank_trending, MarketDataClient};
use crate::error::{Result, ScannerError};
use crate::model::{TokenInfo, TrendingToken};

/// Mock market client with static prices
pub struct MockMarketClient {
    eth_price: Decimal,
    trending: Vec<TrendingToken>,
    fail_price: bool,
    fail_trending: bool,
    fail_token_info: bool,
    calls: AtomicUsize,
}

impl Default for MockMarketClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketClient {
    pub fn new() -> Self {
        let trending = [
            ("BRETT", "0x532f27101965dd16442e59d40670faf5ebb142e4", 18_500_000u64, 0.0712, 4.2),
            ("DEGEN", "0x4ed4e862860bed51a9570b96d89af5e1b0efefed", 6_200_000, 0.0041, -2.7),
            ("AERO", "0x940181a94a35a4569e4529a3cdfb74e38fd98631", 6_200_000, 0.93, 1.1),
            ("TOSHI", "0xac1bd2486aaf3b5c0fc3fd868558b082a531b2b4", 2_900_000, 0.00031, -0.4),
        ]
        .into_iter()
        .map(|(symbol, address, volume, price, change)| TrendingToken {
            symbol: symbol.into(),
            address: address.into(),
            volume_24h: Decimal::from(volume),
            price_usd: Decimal::from_f64(price),
            price_change_24h: Decimal::from_f64(change),
        })
        .collect();

        Self {
            eth_price: Decimal::from(3450),
            trending,
            fail_price: false,
            fail_trending: false,
            fail_token_info: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_eth_price(mut self, price: Decimal) -> Self {
        self.eth_price = price;
        self
    }

    pub fn with_trending(mut self, trending: Vec<TrendingToken>) -> Self {
        self.trending = trending;
        self
    }

    pub fn failing_price(mut self) -> Self {
        self.fail_price = true;
        self
    }

    pub fn failing_trending(mut self) -> Self {
        self.fail_trending = true;
        self
    }

    pub fn failing_token_info(mut self) -> Self {
        self.fail_token_info = true;
        self
    }

    /// Fail every call
    pub fn unavailable() -> Self {
        Self::new().failing_price().failing_trending().failing_token_info()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn outage() -> ScannerError {
    ScannerError::Timeout("mock-market")
}

#[async_trait]
impl MarketDataClient for MockMarketClient {
    async fn get_usd_price(&self, native_symbol: &str) -> Result<Decimal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        coingecko_id(native_symbol)?;
        if self.fail_price {
            return Err(outage());
        }
        Ok(self.eth_price)
    }

    async fn get_trending_tokens(
        &self,
        _network: &str,
        top_n: usize,
    ) -> Result<Vec<TrendingToken>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trending {
            return Err(outage());
        }
        rank_trending(self.trending.clone(), top_n)
    }

    async fn get_token_info(&self, contract_address: &str) -> Result<Option<TokenInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_token_info {
            return Err(outage());
        }
        Ok(self
            .trending
            .iter()
            .find(|t| t.address.eq_ignore_ascii_case(contract_address))
            .map(|t| TokenInfo {
                symbol: t.symbol.clone(),
                name: t.symbol.clone(),
                price_usd: t.price_usd.unwrap_or(Decimal::ZERO),
                price_change_24h: t.price_change_24h.unwrap_or(Decimal::ZERO),
                volume_24h: t.volume_24h,
                liquidity_usd: t.volume_24h / Decimal::from(4),
            }))
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}
