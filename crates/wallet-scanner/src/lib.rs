//! # wallet-scanner
//!
//! Read-only wallet activity scanner for the Base network. Given a wallet
//! address it fans out to a block explorer and market data APIs, tallies
//! token buys and sells, and renders a chat reply.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────────────────────┐   ┌────────────┐
//! │ inbound text │──▶│        ConversationHandler         │──▶│ Reply text │
//! └──────────────┘   │  validate ─▶ fetch ─▶ aggregate ─▶ │   └────────────┘
//!                    │            format                  │
//!                    └───────┬──────────────────┬─────────┘
//!                            │                  │
//!                 ┌──────────▼───────┐ ┌────────▼──────────┐
//!                 │ ChainDataClient  │ │ MarketDataClient  │
//!                 │ (Etherscan v2)   │ │ (CoinGecko, Dex-  │
//!                 │                  │ │  Screener)        │
//!                 └──────────────────┘ └───────────────────┘
//! ```
//!
//! Both client traits have mock implementations so the handler can be driven
//! without network access.

pub mod activity;
pub mod address;
pub mod config;
pub mod error;
pub mod explorer;
pub mod format;
pub mod handler;
pub mod market;
pub mod model;

mod http;

pub use address::{validate, WalletAddress};
pub use config::{ChainProfile, ScannerConfig};
pub use error::{Result, ScannerError};
pub use handler::{Command, ConversationHandler, Inbound, Reply, Stage};
pub use model::{
    BalanceInfo, Classification, Direction, TokenActivity, TokenInfo, TokenTransferEvent,
    TrendingToken,
};

use std::sync::Arc;

use explorer::EtherscanClient;
use market::MarketClient;

/// Build a handler wired to the live APIs
pub fn live_handler(config: Arc<ScannerConfig>) -> Result<ConversationHandler> {
    let chain = Arc::new(EtherscanClient::new(&config)?);
    let market = Arc::new(MarketClient::new(&config)?);
    Ok(ConversationHandler::new(chain, market, config))
}
