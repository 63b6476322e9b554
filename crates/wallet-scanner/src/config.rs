//! Scanner Configuration
//!
//! Built once at startup and shared read-only. Credentials come from the
//! process environment; everything else has a default.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, ScannerError};

/// The chain being scanned
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainProfile {
    /// DexScreener network id
    pub network: String,

    /// Etherscan v2 chain id
    pub chain_id: u64,

    /// Fee asset symbol
    pub native_symbol: String,

    /// Block explorer web root (address links)
    pub explorer_url: String,

    /// Block explorer display name
    pub explorer_name: String,

    /// DexScreener web root for chart links
    pub dex_url: String,
}

impl ChainProfile {
    pub fn base() -> Self {
        Self {
            network: "base".into(),
            chain_id: 8453,
            native_symbol: "ETH".into(),
            explorer_url: "https://basescan.org".into(),
            explorer_name: "Basescan".into(),
            dex_url: "https://dexscreener.com/base".into(),
        }
    }

    /// Pretty network name for replies
    pub fn display_name(&self) -> String {
        let mut chars = self.network.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for ChainProfile {
    fn default() -> Self {
        Self::base()
    }
}

#[derive(Clone)]
pub struct ScannerConfig {
    /// Telegram bot token
    pub telegram_token: String,

    /// Etherscan API key
    pub explorer_api_key: String,

    pub explorer_base_url: String,
    pub price_base_url: String,
    pub dex_base_url: String,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// Recent token transfers considered per wallet
    pub transfer_limit: usize,

    /// Tokens shown by the trending command
    pub trending_limit: usize,

    pub chain: ChainProfile,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            explorer_api_key: String::new(),
            explorer_base_url: "https://api.etherscan.io/v2/api".into(),
            price_base_url: "https://api.coingecko.com/api/v3".into(),
            dex_base_url: "https://api.dexscreener.com".into(),
            request_timeout_secs: 10,
            transfer_limit: 30,
            trending_limit: 10,
            chain: ChainProfile::base(),
        }
    }
}

impl ScannerConfig {
    /// Load from environment variables
    ///
    /// `TELEGRAM_TOKEN` and `ETHERSCAN_API_KEY` are required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ScannerError::Config(format!("{} not set", key)))
        };

        let defaults = Self::default();
        let config = Self {
            telegram_token: required("TELEGRAM_TOKEN")?,
            explorer_api_key: required("ETHERSCAN_API_KEY")?,
            explorer_base_url: lookup("ETHERSCAN_BASE_URL")
                .unwrap_or(defaults.explorer_base_url),
            price_base_url: lookup("COINGECKO_BASE_URL").unwrap_or(defaults.price_base_url),
            dex_base_url: lookup("DEXSCREENER_BASE_URL").unwrap_or(defaults.dex_base_url),
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            transfer_limit: parse_or(&lookup, "TRANSFER_LIMIT", defaults.transfer_limit)?,
            trending_limit: parse_or(&lookup, "TRENDING_LIMIT", defaults.trending_limit)?,
            chain: defaults.chain,
        };

        config.validate()?;
        Ok(config)
    }

    /// Config with placeholder credentials, for tests and offline use
    pub fn with_credentials(
        telegram_token: impl Into<String>,
        explorer_api_key: impl Into<String>,
    ) -> Self {
        Self {
            telegram_token: telegram_token.into(),
            explorer_api_key: explorer_api_key.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ScannerError::Config("REQUEST_TIMEOUT_SECS must be positive".into()));
        }
        if self.transfer_limit == 0 {
            return Err(ScannerError::Config("TRANSFER_LIMIT must be positive".into()));
        }
        if self.trending_limit == 0 {
            return Err(ScannerError::Config("TRENDING_LIMIT must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ScannerError::Config(format!("{} is not a valid number: {:?}", key, raw))),
        None => Ok(default),
    }
}

impl fmt::Debug for ScannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScannerConfig")
            .field("telegram_token", &"<redacted>")
            .field("explorer_api_key", &"<redacted>")
            .field("explorer_base_url", &self.explorer_base_url)
            .field("price_base_url", &self.price_base_url)
            .field("dex_base_url", &self.dex_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("transfer_limit", &self.transfer_limit)
            .field("trending_limit", &self.trending_limit)
            .field("chain", &self.chain)
            .finish()
    }
}
