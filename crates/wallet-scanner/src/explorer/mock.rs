//! Mock Chain Client
//!
//! For testing and demo purposes. Serves a fixed balance and transfer list,
//! or fails on demand.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use super::ChainDataClient;
use crate::address::WalletAddress;
use crate::error::{Result, ScannerError};
use crate::model::{BalanceInfo, Direction, TokenTransferEvent};

/// Mock explorer with static data
#[derive(Default)]
pub struct MockChainClient {
    balance: Decimal,
    transfers: Vec<TokenTransferEvent>,
    fail_balance: bool,
    fail_transfers: bool,
    calls: AtomicUsize,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    /// Append a transfer; timestamps count down so the list stays newest-first
    pub fn with_transfer(mut self, symbol: &str, direction: Direction, amount: Decimal) -> Self {
        let offset = self.transfers.len() as i64;
        let timestamp = Utc
            .timestamp_opt(1_717_000_000 - offset * 60, 0)
            .single()
            .unwrap_or_default();
        self.transfers.push(TokenTransferEvent {
            symbol: symbol.to_string(),
            contract_address: format!("0x{:0>40}", symbol.to_ascii_lowercase()),
            direction,
            amount,
            timestamp,
        });
        self
    }

    pub fn failing_balance(mut self) -> Self {
        self.fail_balance = true;
        self
    }

    pub fn failing_transfers(mut self) -> Self {
        self.fail_transfers = true;
        self
    }

    /// Fail every call
    pub fn unavailable() -> Self {
        Self::new().failing_balance().failing_transfers()
    }

    /// Number of calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn outage() -> ScannerError {
    ScannerError::Upstream {
        service: "mock-explorer",
        status: 503,
        reason: "Service Unavailable".into(),
    }
}

#[async_trait]
impl ChainDataClient for MockChainClient {
    async fn get_balance(&self, _address: &WalletAddress) -> Result<BalanceInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_balance {
            return Err(outage());
        }
        Ok(BalanceInfo::new(self.balance))
    }

    async fn get_recent_transfers(
        &self,
        _address: &WalletAddress,
        limit: usize,
    ) -> Result<Vec<TokenTransferEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if limit == 0 {
            return Err(ScannerError::InvalidArgument("transfer limit must be positive".into()));
        }
        if self.fail_transfers {
            return Err(outage());
        }
        Ok(self.transfers.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &str {
        "MockExplorer"
    }
}
