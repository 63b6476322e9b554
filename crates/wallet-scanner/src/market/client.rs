//! HTTP Market Client
//!
//! CoinGecko for native-currency prices, DexScreener for pair data. Neither
//! needs an API key.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use super::{coingecko_id, ensure_top_n, rank_trending, MarketDataClient};
use crate::config::ScannerConfig;
use crate::error::{Result, ScannerError};
use crate::http;
use crate::model::{TokenInfo, TrendingToken};

const COINGECKO: &str = "coingecko";
const DEXSCREENER: &str = "dexscreener";

#[derive(Debug, Default, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    #[serde(default)]
    chain_id: String,
    #[serde(default)]
    base_token: BaseToken,
    price_usd: Option<Decimal>,
    price_change: Option<Window>,
    volume: Option<Window>,
    liquidity: Option<Liquidity>,
}

#[derive(Debug, Default, Deserialize)]
struct BaseToken {
    #[serde(default)]
    address: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct Window {
    h24: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct Liquidity {
    usd: Option<Decimal>,
}

impl Pair {
    fn volume_24h(&self) -> Decimal {
        self.volume.as_ref().and_then(|w| w.h24).unwrap_or(Decimal::ZERO)
    }

    fn change_24h(&self) -> Option<Decimal> {
        self.price_change.as_ref().and_then(|w| w.h24)
    }

    fn symbol(&self) -> String {
        match self.base_token.symbol.trim() {
            "" => "???".to_string(),
            s => s.to_string(),
        }
    }
}

/// Live market data client
pub struct MarketClient {
    client: Client,
    price_base_url: String,
    dex_base_url: String,
}

impl MarketClient {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.request_timeout())?,
            price_base_url: config.price_base_url.trim_end_matches('/').to_string(),
            dex_base_url: config.dex_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataClient for MarketClient {
    async fn get_usd_price(&self, native_symbol: &str) -> Result<Decimal> {
        let id = coingecko_id(native_symbol)?;
        let url = format!("{}/simple/price", self.price_base_url);
        let prices: HashMap<String, HashMap<String, Decimal>> = http::get_json(
            &self.client,
            COINGECKO,
            &url,
            &[("ids", id.to_string()), ("vs_currencies", "usd".to_string())],
        )
        .await?;

        extract_usd_price(&prices, id)
    }

    async fn get_trending_tokens(&self, network: &str, top_n: usize) -> Result<Vec<TrendingToken>> {
        ensure_top_n(top_n)?;

        let url = format!("{}/latest/dex/search", self.dex_base_url);
        let response: PairsResponse =
            http::get_json(&self.client, DEXSCREENER, &url, &[("q", network.to_string())]).await?;

        let trending = trending_from_pairs(response, network, top_n)?;
        info!(network, count = trending.len(), "fetched trending tokens");
        Ok(trending)
    }

    async fn get_token_info(&self, contract_address: &str) -> Result<Option<TokenInfo>> {
        let url = format!("{}/latest/dex/tokens/{}", self.dex_base_url, contract_address.trim());
        let response: PairsResponse = http::get_json(&self.client, DEXSCREENER, &url, &[]).await?;
        Ok(token_info_from_pairs(response))
    }

    fn name(&self) -> &str {
        "CoinGecko+DexScreener"
    }
}

fn extract_usd_price(
    prices: &HashMap<String, HashMap<String, Decimal>>,
    id: &str,
) -> Result<Decimal> {
    prices
        .get(id)
        .and_then(|quotes| quotes.get("usd"))
        .copied()
        .ok_or_else(|| ScannerError::Malformed {
            service: COINGECKO,
            reason: format!("no USD quote for {}", id),
        })
}

fn trending_from_pairs(
    response: PairsResponse,
    network: &str,
    top_n: usize,
) -> Result<Vec<TrendingToken>> {
    let tokens = response
        .pairs
        .unwrap_or_default()
        .into_iter()
        .filter(|pair| pair.chain_id.eq_ignore_ascii_case(network))
        .map(|pair| TrendingToken {
            symbol: pair.symbol(),
            volume_24h: pair.volume_24h(),
            price_usd: pair.price_usd,
            price_change_24h: pair.change_24h(),
            address: pair.base_token.address,
        })
        .collect();

    rank_trending(tokens, top_n)
}

fn token_info_from_pairs(response: PairsResponse) -> Option<TokenInfo> {
    let pair = response.pairs.unwrap_or_default().into_iter().next()?;
    Some(TokenInfo {
        symbol: pair.symbol(),
        volume_24h: pair.volume_24h(),
        price_change_24h: pair.change_24h().unwrap_or(Decimal::ZERO),
        price_usd: pair.price_usd.unwrap_or(Decimal::ZERO),
        liquidity_usd: pair
            .liquidity
            .as_ref()
            .and_then(|l| l.usd)
            .unwrap_or(Decimal::ZERO),
        name: match pair.base_token.name.trim() {
            "" => "Unknown".to_string(),
            n => n.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn pairs(value: serde_json::Value) -> PairsResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_usd_price() {
        let prices: HashMap<String, HashMap<String, Decimal>> =
            serde_json::from_value(json!({"ethereum": {"usd": 3450.12}})).unwrap();
        assert_eq!(extract_usd_price(&prices, "ethereum").unwrap(), dec!(3450.12));

        let empty: HashMap<String, HashMap<String, Decimal>> = HashMap::new();
        assert!(matches!(
            extract_usd_price(&empty, "ethereum"),
            Err(ScannerError::Malformed { .. })
        ));
    }

    #[test]
    fn test_trending_filters_network_and_ranks() {
        let response = pairs(json!({
            "pairs": [
                {
                    "chainId": "base",
                    "baseToken": {"address": "0xaaa", "name": "Brett", "symbol": "BRETT"},
                    "priceUsd": "0.1234",
                    "priceChange": {"h24": 5.2},
                    "volume": {"h24": 1500000}
                },
                {
                    "chainId": "solana",
                    "baseToken": {"address": "So1", "name": "Bonk", "symbol": "BONK"},
                    "priceUsd": "0.00002",
                    "volume": {"h24": 9000000}
                },
                {
                    "chainId": "base",
                    "baseToken": {"address": "0xbbb", "name": "Degen", "symbol": "DEGEN"},
                    "priceUsd": "0.01",
                    "volume": {"h24": 2500000}
                },
                {
                    "chainId": "base",
                    "baseToken": {"address": "0xccc", "symbol": "AERO"}
                }
            ]
        }));

        let trending = trending_from_pairs(response, "base", 10).unwrap();
        let symbols: Vec<_> = trending.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, ["DEGEN", "BRETT", "AERO"]);

        assert_eq!(trending[1].price_usd, Some(dec!(0.1234)));
        assert_eq!(trending[1].price_change_24h, Some(dec!(5.2)));
        assert_eq!(trending[0].price_change_24h, None);
        assert_eq!(trending[2].volume_24h, Decimal::ZERO);
    }

    #[test]
    fn test_trending_null_pairs() {
        let response = pairs(json!({"schemaVersion": "1.0.0", "pairs": null}));
        assert!(trending_from_pairs(response, "base", 5).unwrap().is_empty());
    }

    #[test]
    fn test_token_info_uses_first_pair() {
        let response = pairs(json!({
            "pairs": [
                {
                    "chainId": "base",
                    "baseToken": {"address": "0xaaa", "name": "Brett", "symbol": "BRETT"},
                    "priceUsd": "0.123456",
                    "priceChange": {"h24": -3.5},
                    "volume": {"h24": 1000},
                    "liquidity": {"usd": 250000.5}
                },
                {
                    "chainId": "base",
                    "baseToken": {"address": "0xaaa", "name": "Brett", "symbol": "BRETT"},
                    "priceUsd": "0.2"
                }
            ]
        }));

        let info = token_info_from_pairs(response).unwrap();
        assert_eq!(info.name, "Brett");
        assert_eq!(info.price_usd, dec!(0.123456));
        assert_eq!(info.price_change_24h, dec!(-3.5));
        assert_eq!(info.liquidity_usd, dec!(250000.5));

        assert!(token_info_from_pairs(pairs(json!({"pairs": []}))).is_none());
    }

    #[tokio::test]
    async fn test_invalid_arguments_short_circuit() {
        let client = MarketClient::new(&ScannerConfig::with_credentials("t", "k")).unwrap();

        assert!(matches!(
            client.get_trending_tokens("base", 0).await,
            Err(ScannerError::InvalidArgument(_))
        ));
        assert!(matches!(
            client.get_usd_price("NOPE").await,
            Err(ScannerError::InvalidArgument(_))
        ));
    }
}
