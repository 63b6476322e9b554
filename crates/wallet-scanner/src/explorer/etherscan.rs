//! Etherscan v2 Client
//!
//! One key covers every chain Etherscan indexes; the chain is picked with the
//! `chainid` query parameter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::ChainDataClient;
use crate::address::WalletAddress;
use crate::config::ScannerConfig;
use crate::error::{Result, ScannerError};
use crate::http;
use crate::model::{BalanceInfo, Direction, TokenTransferEvent};

const SERVICE: &str = "etherscan";
const NATIVE_DECIMALS: u32 = 18;

/// Every explorer response is wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    #[serde(default)]
    time_stamp: String,
    #[serde(default)]
    contract_address: String,
    #[serde(default)]
    to: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    token_symbol: String,
    #[serde(default)]
    token_decimal: String,
}

pub struct EtherscanClient {
    client: Client,
    base_url: String,
    api_key: String,
    chain_id: u64,
}

impl EtherscanClient {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.request_timeout())?,
            base_url: config.explorer_base_url.clone(),
            api_key: config.explorer_api_key.clone(),
            chain_id: config.chain.chain_id,
        })
    }

    async fn call(
        &self,
        action: &str,
        address: &WalletAddress,
        extra: &[(&str, String)],
    ) -> Result<Value> {
        let mut query = vec![
            ("chainid", self.chain_id.to_string()),
            ("module", "account".to_string()),
            ("action", action.to_string()),
            ("address", address.to_string()),
        ];
        query.extend(extra.iter().cloned());
        query.push(("apikey", self.api_key.clone()));

        let envelope: Envelope =
            http::get_json(&self.client, SERVICE, &self.base_url, &query).await?;
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl ChainDataClient for EtherscanClient {
    async fn get_balance(&self, address: &WalletAddress) -> Result<BalanceInfo> {
        let result = self.call("balance", address, &[("tag", "latest".to_string())]).await?;
        parse_balance(&result)
    }

    async fn get_recent_transfers(
        &self,
        address: &WalletAddress,
        limit: usize,
    ) -> Result<Vec<TokenTransferEvent>> {
        if limit == 0 {
            return Err(ScannerError::InvalidArgument("transfer limit must be positive".into()));
        }

        let result = self
            .call(
                "tokentx",
                address,
                &[
                    ("startblock", "0".to_string()),
                    ("endblock", "99999999".to_string()),
                    ("page", "1".to_string()),
                    ("offset", limit.to_string()),
                    ("sort", "desc".to_string()),
                ],
            )
            .await?;

        let transfers = parse_transfers(result, address, limit)?;
        info!(address = %address.short(), count = transfers.len(), "fetched token transfers");
        Ok(transfers)
    }

    fn name(&self) -> &str {
        "Etherscan"
    }
}

/// Map the explorer's `status`/`message`/`result` convention onto `Result`
fn unwrap_envelope(envelope: Envelope) -> Result<Value> {
    if envelope.status == "1" {
        return Ok(envelope.result);
    }

    match envelope.result {
        // "No transactions found" comes back as status 0 with an empty list
        Value::Array(items) if items.is_empty() => Ok(Value::Array(items)),
        Value::String(reason) => {
            let status = if reason.to_ascii_lowercase().contains("rate limit") {
                429
            } else {
                200
            };
            Err(ScannerError::Upstream {
                service: SERVICE,
                status,
                reason,
            })
        }
        other => Err(ScannerError::Upstream {
            service: SERVICE,
            status: 200,
            reason: format!("{} ({})", envelope.message, other),
        }),
    }
}

fn parse_balance(result: &Value) -> Result<BalanceInfo> {
    let raw = result.as_str().ok_or_else(|| malformed("balance is not a string"))?;
    let amount = scale_units(raw, NATIVE_DECIMALS)
        .ok_or_else(|| malformed(format!("balance is not an integer: {:?}", raw)))?;
    Ok(BalanceInfo::new(amount))
}

fn parse_transfers(
    result: Value,
    wallet: &WalletAddress,
    limit: usize,
) -> Result<Vec<TokenTransferEvent>> {
    let raw: Vec<RawTransfer> =
        serde_json::from_value(result).map_err(|e| malformed(e.to_string()))?;

    Ok(raw
        .into_iter()
        .take(limit)
        .map(|tx| {
            let decimals = tx.token_decimal.trim().parse().unwrap_or(NATIVE_DECIMALS);
            let symbol = match tx.token_symbol.trim() {
                "" => "???".to_string(),
                s => s.to_string(),
            };
            let direction = if wallet.matches(&tx.to) {
                Direction::In
            } else {
                Direction::Out
            };
            let timestamp = tx
                .time_stamp
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
                .unwrap_or_default();

            TokenTransferEvent {
                symbol,
                contract_address: tx.contract_address.to_ascii_lowercase(),
                direction,
                amount: scale_units(&tx.value, decimals).unwrap_or(Decimal::ZERO),
                timestamp,
            }
        })
        .collect())
}

/// Convert an integer amount of base units into whole units.
///
/// `Decimal` holds 28 significant digits with a scale of at most 28; larger
/// inputs drop least-significant fractional digits. Returns `None` for
/// non-numeric input or integer parts that do not fit.
pub(crate) fn scale_units(raw: &str, decimals: u32) -> Option<Decimal> {
    const MAX_DIGITS: usize = 28;

    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut digits = raw.trim_start_matches('0');
    let mut scale = decimals;
    while (digits.len() > MAX_DIGITS || scale > MAX_DIGITS as u32) && scale > 0 {
        digits = &digits[..digits.len().saturating_sub(1)];
        scale -= 1;
    }
    if digits.is_empty() {
        return Some(Decimal::ZERO);
    }
    if digits.len() > MAX_DIGITS {
        return None;
    }

    let mantissa: i128 = digits.parse().ok()?;
    Decimal::try_from_i128_with_scale(mantissa, scale)
        .ok()
        .map(|d| d.normalize())
}

fn malformed(reason: impl Into<String>) -> ScannerError {
    ScannerError::Malformed {
        service: SERVICE,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn wallet() -> WalletAddress {
        WalletAddress::parse("0x1234567890123456789012345678901234567890").unwrap()
    }

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scale_units() {
        assert_eq!(scale_units("1500000000000000000", 18), Some(dec!(1.5)));
        assert_eq!(scale_units("0", 18), Some(Decimal::ZERO));
        assert_eq!(scale_units("000", 6), Some(Decimal::ZERO));
        assert_eq!(scale_units("1234567", 6), Some(dec!(1.234567)));
        assert_eq!(scale_units("42", 0), Some(dec!(42)));
        assert_eq!(scale_units("", 18), None);
        assert_eq!(scale_units("-5", 18), None);
        assert_eq!(scale_units("1e18", 18), None);
    }

    #[test]
    fn test_scale_units_huge_values() {
        // 1e12 tokens with 18 decimals: 31 digits, precision is trimmed
        let amount = scale_units("1000000000000000000000000000000", 18).unwrap();
        assert_eq!(amount, dec!(1000000000000));

        // Too large even as an integer
        assert_eq!(scale_units(&"9".repeat(40), 0), None);
    }

    #[test]
    fn test_parse_balance() {
        let result = unwrap_envelope(envelope(json!({
            "status": "1",
            "message": "OK",
            "result": "2500000000000000000"
        })))
        .unwrap();
        assert_eq!(parse_balance(&result).unwrap().amount, dec!(2.5));

        assert!(matches!(
            parse_balance(&json!("not-a-number")),
            Err(ScannerError::Malformed { .. })
        ));
    }

    #[test]
    fn test_no_transactions_is_empty() {
        let result = unwrap_envelope(envelope(json!({
            "status": "0",
            "message": "No transactions found",
            "result": []
        })))
        .unwrap();
        assert!(parse_transfers(result, &wallet(), 30).unwrap().is_empty());
    }

    #[test]
    fn test_error_envelope() {
        let err = unwrap_envelope(envelope(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        })))
        .unwrap_err();
        assert!(matches!(
            &err,
            ScannerError::Upstream { reason, .. } if reason == "Invalid API Key"
        ));
        assert!(!err.is_retryable());

        let err = unwrap_envelope(envelope(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Max rate limit reached"
        })))
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_parse_transfers_direction_and_amounts() {
        let result = json!([
            {
                "timeStamp": "1717000000",
                "contractAddress": "0x532F27101965DD16442E59D40670FAF5EBB142E4",
                "from": "0x9999999999999999999999999999999999999999",
                "to": "0x1234567890123456789012345678901234567890",
                "value": "2500000000000000000000",
                "tokenSymbol": "BRETT",
                "tokenDecimal": "18"
            },
            {
                "timeStamp": "1716999000",
                "contractAddress": "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
                "from": "0x1234567890123456789012345678901234567890",
                "to": "0x9999999999999999999999999999999999999999",
                "value": "1000000",
                "tokenSymbol": "USDC",
                "tokenDecimal": "6"
            }
        ]);

        let transfers = parse_transfers(result, &wallet(), 30).unwrap();
        assert_eq!(transfers.len(), 2);

        assert_eq!(transfers[0].symbol, "BRETT");
        assert_eq!(transfers[0].direction, Direction::In);
        assert_eq!(transfers[0].amount, dec!(2500));
        assert_eq!(
            transfers[0].contract_address,
            "0x532f27101965dd16442e59d40670faf5ebb142e4"
        );
        assert_eq!(transfers[0].timestamp.timestamp(), 1_717_000_000);

        assert_eq!(transfers[1].direction, Direction::Out);
        assert_eq!(transfers[1].amount, dec!(1));
    }

    #[test]
    fn test_parse_transfers_respects_limit_and_defaults() {
        let item = json!({
            "to": "0x1234567890123456789012345678901234567890",
            "value": "1",
            "tokenSymbol": "",
            "tokenDecimal": ""
        });
        let result = Value::Array(vec![item.clone(), item.clone(), item]);

        let transfers = parse_transfers(result, &wallet(), 2).unwrap();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].symbol, "???");
        assert_eq!(transfers[0].timestamp.timestamp(), 0);
    }

    #[test]
    fn test_parse_transfers_rejects_non_list() {
        assert!(matches!(
            parse_transfers(json!({"oops": true}), &wallet(), 5),
            Err(ScannerError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_limit_is_invalid_argument() {
        let client = EtherscanClient::new(&ScannerConfig::with_credentials("t", "k")).unwrap();
        let result = client.get_recent_transfers(&wallet(), 0).await;
        assert!(matches!(result, Err(ScannerError::InvalidArgument(_))));
    }
}
