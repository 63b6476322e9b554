//! Conversation Handler
//!
//! Single entry point per inbound message. Each call walks
//!
//! ```text
//! Idle → AwaitingValidation → Fetching → Aggregating → Formatting → Replied
//!               │                 │           │
//!               └→ Rejected       └───────────┴→ DegradedReply / Unavailable
//! ```
//!
//! and always ends in exactly one [`Reply`]. No state survives between calls.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::activity::{aggregate, rank_by_activity, DISPLAY_LIMIT};
use crate::address::WalletAddress;
use crate::config::ScannerConfig;
use crate::error::ScannerError;
use crate::explorer::ChainDataClient;
use crate::format::{self, WalletReport};
use crate::market::MarketDataClient;

/// Commands recognized in inbound text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Trending,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::Start, Command::Help, Command::Trending];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Trending => "trending",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Welcome message",
            Command::Help => "Show help",
            Command::Trending => "Top tokens by 24h volume",
        }
    }
}

/// What an inbound message asks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    /// Anything else, to be tried as a wallet address
    Text(String),
}

impl Inbound {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let command = trimmed
            .strip_prefix('/')
            .and_then(|rest| rest.split_whitespace().next())
            .map(|word| word.split('@').next().unwrap_or(word).to_ascii_lowercase());

        match command.as_deref() {
            Some("start") => Inbound::Command(Command::Start),
            Some("help") => Inbound::Command(Command::Help),
            Some("trending") => Inbound::Command(Command::Trending),
            _ => Inbound::Text(trimmed.to_string()),
        }
    }
}

/// Handler states
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Idle,
    AwaitingValidation,
    Fetching,
    Aggregating,
    Formatting,
    Replied,
    Rejected,
    DegradedReply,
    Unavailable,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Stage::Replied | Stage::Rejected | Stage::DegradedReply | Stage::Unavailable
        )
    }
}

/// The single outbound message for one inbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    /// Telegram HTML
    pub text: String,

    /// Terminal stage that produced it
    pub outcome: Stage,
}

impl Reply {
    fn new(text: String, outcome: Stage) -> Self {
        debug_assert!(outcome.is_terminal());
        debug!(?outcome, "reply ready");
        Self { text, outcome }
    }
}

pub struct ConversationHandler {
    chain: Arc<dyn ChainDataClient>,
    market: Arc<dyn MarketDataClient>,
    config: Arc<ScannerConfig>,
}

impl ConversationHandler {
    pub fn new(
        chain: Arc<dyn ChainDataClient>,
        market: Arc<dyn MarketDataClient>,
        config: Arc<ScannerConfig>,
    ) -> Self {
        Self {
            chain,
            market,
            config,
        }
    }

    /// Process one inbound message
    pub async fn handle(&self, text: &str) -> Reply {
        let mut stage = Stage::Idle;
        advance(&mut stage, Stage::AwaitingValidation);

        match Inbound::parse(text) {
            Inbound::Command(Command::Start | Command::Help) => {
                Reply::new(format::welcome_text(&self.config.chain), Stage::Replied)
            }
            Inbound::Command(Command::Trending) => self.trending(stage).await,
            Inbound::Text(raw) => match WalletAddress::parse(&raw) {
                Ok(address) => self.analyze(stage, &address).await,
                Err(e) => {
                    debug!(error = %e, "rejected input");
                    Reply::new(format::invalid_address_text(&self.config.chain), Stage::Rejected)
                }
            },
        }
    }

    async fn trending(&self, mut stage: Stage) -> Reply {
        let chain = &self.config.chain;
        advance(&mut stage, Stage::Fetching);

        match self
            .market
            .get_trending_tokens(&chain.network, self.config.trending_limit)
            .await
        {
            Ok(tokens) => {
                advance(&mut stage, Stage::Formatting);
                Reply::new(format::format_trending(&tokens, chain), Stage::Replied)
            }
            Err(e) => {
                warn!(source = self.market.name(), error = %e, "trending lookup failed");
                Reply::new(format::trending_unavailable_text(), Stage::Unavailable)
            }
        }
    }

    async fn analyze(&self, mut stage: Stage, address: &WalletAddress) -> Reply {
        let chain = &self.config.chain;
        advance(&mut stage, Stage::Fetching);

        let (balance, transfers, price) = tokio::join!(
            self.chain.get_balance(address),
            self.chain.get_recent_transfers(address, self.config.transfer_limit),
            self.market.get_usd_price(&chain.native_symbol),
        );

        let mut missing = Vec::new();
        let balance = balance
            .map_err(|e| log_failure(self.chain.name(), "balance", &e))
            .ok();
        let transfers = transfers
            .map_err(|e| log_failure(self.chain.name(), "transfers", &e))
            .ok();
        let price = price
            .map_err(|e| log_failure(self.market.name(), "price", &e))
            .ok();

        // A price with nothing to value is not worth a reply
        if balance.is_none() && transfers.is_none() {
            let err = ScannerError::ServiceUnavailable;
            warn!(address = %address.short(), error = %err, "no wallet data");
            return Reply::new(format::error_text(&err), Stage::Unavailable);
        }

        if balance.is_none() {
            missing.push("balance");
        }
        if price.is_none() {
            missing.push("USD price");
        }
        if transfers.is_none() {
            missing.push("token activity");
        }

        let balance = balance.map(|b| match price {
            Some(p) => b.priced(p),
            None => b,
        });

        if missing.is_empty()
            && balance.as_ref().is_some_and(|b| b.amount.is_zero())
            && transfers.as_ref().is_some_and(|t| t.is_empty())
        {
            return Reply::new(format::no_activity_text(chain), Stage::Replied);
        }

        advance(&mut stage, Stage::Aggregating);
        let activities = transfers.map(|t| rank_by_activity(aggregate(&t), DISPLAY_LIMIT));

        let top_token = match activities.as_ref().and_then(|a| a.first()) {
            Some(top) => match self.market.get_token_info(&top.contract_address).await {
                Ok(info) => info,
                Err(e) => {
                    debug!(token = %top.symbol, error = %e, "top token lookup failed");
                    None
                }
            },
            None => None,
        };

        advance(&mut stage, Stage::Formatting);
        let report = WalletReport {
            address: address.clone(),
            balance,
            activities,
            top_token,
            missing,
        };
        let outcome = if report.is_degraded() {
            Stage::DegradedReply
        } else {
            Stage::Replied
        };

        Reply::new(format::format_wallet_report(&report, chain), outcome)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    let from = *stage;
    debug!(?from, to = ?next, "stage");
    *stage = next;
}

fn log_failure(source: &str, what: &str, err: &ScannerError) {
    warn!(source, what, error = %err, "upstream call failed");
}
