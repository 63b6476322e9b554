//! Chain Data Integration
//!
//! Abstractions and implementations for block explorer APIs.

mod etherscan;
mod mock;

pub use etherscan::EtherscanClient;
pub use mock::MockChainClient;

use async_trait::async_trait;

use crate::address::WalletAddress;
use crate::error::Result;
use crate::model::{BalanceInfo, TokenTransferEvent};

/// Block explorer client trait (Strategy pattern)
#[async_trait]
pub trait ChainDataClient: Send + Sync {
    /// Native-currency balance, without USD valuation
    async fn get_balance(&self, address: &WalletAddress) -> Result<BalanceInfo>;

    /// Most recent token transfers touching `address`, newest first, at most `limit`
    async fn get_recent_transfers(
        &self,
        address: &WalletAddress,
        limit: usize,
    ) -> Result<Vec<TokenTransferEvent>>;

    /// Explorer name
    fn name(&self) -> &str;
}
