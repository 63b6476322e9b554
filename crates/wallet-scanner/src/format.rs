//! Reply Rendering
//!
//! Pure functions from fetched data to Telegram HTML. Anything that came from
//! an upstream API goes through [`escape_html`] before it is interpolated.

use std::fmt::Write;

use num_format::{Locale, ToFormattedString};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::address::WalletAddress;
use crate::config::ChainProfile;
use crate::error::ScannerError;
use crate::model::{BalanceInfo, TokenActivity, TokenInfo, TrendingToken};

/// Example address shown in help and error replies
pub const EXAMPLE_ADDRESS: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

/// Everything gathered for one wallet, possibly partial
#[derive(Clone, Debug)]
pub struct WalletReport {
    pub address: WalletAddress,

    /// `None` when the balance lookup failed
    pub balance: Option<BalanceInfo>,

    /// Ranked activity, `None` when the transfer lookup failed
    pub activities: Option<Vec<TokenActivity>>,

    /// Market data for the most traded token
    pub top_token: Option<TokenInfo>,

    /// Labels of the data that could not be loaded
    pub missing: Vec<&'static str>,
}

impl WalletReport {
    pub fn is_degraded(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Neutralize characters Telegram's HTML parse mode treats as markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Round to `dp` places and group the integer part: `1234567.891` → `1,234,567.89`
pub fn group_thousands(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp(dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let whole = abs.trunc().to_u128().unwrap_or(u128::MAX);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&whole.to_formatted_string(&Locale::en));

    if dp > 0 {
        let scale = Decimal::from(10u64.pow(dp));
        let frac = (abs.fract() * scale).round().to_u64().unwrap_or(0);
        let _ = write!(out, ".{:0width$}", frac, width = dp as usize);
    }
    out
}

pub fn welcome_text(chain: &ChainProfile) -> String {
    let network = chain.display_name();
    format!(
        "🔵 <b>{network} Wallet Tracker Bot</b>\n\n\
         Send me any {network} wallet address and I'll show you:\n\
         • 💰 {native} balance\n\
         • 🪙 What tokens they're buying/selling\n\
         • 📊 Recent activity\n\n\
         <b>Commands:</b>\n\
         /trending - Top tokens on {network}\n\
         /help - Show this message\n\n\
         <b>Example:</b>\n\
         Just paste a wallet address like:\n\
         <code>0x1234...abcd</code>",
        network = escape_html(&network),
        native = escape_html(&chain.native_symbol),
    )
}

pub fn invalid_address_text(chain: &ChainProfile) -> String {
    format!(
        "❌ That doesn't look like a valid wallet address.\n\n\
         Send me a {} wallet address (starts with 0x, 42 characters).\n\n\
         Example: <code>{}</code>",
        escape_html(&chain.display_name()),
        EXAMPLE_ADDRESS
    )
}

/// Reply for a request that failed as a whole
pub fn error_text(err: &ScannerError) -> String {
    format!("⚠️ {}", escape_html(&err.user_message()))
}

pub fn trending_unavailable_text() -> String {
    "❌ Couldn't fetch trending tokens. Try again later.".to_string()
}

pub fn no_trending_text(chain: &ChainProfile) -> String {
    format!(
        "🔥 No trending tokens found on {} right now.",
        escape_html(&chain.display_name())
    )
}

pub fn no_activity_text(chain: &ChainProfile) -> String {
    let network = escape_html(&chain.display_name());
    format!(
        "❌ No activity found for this wallet on {network}.\n\n\
         Make sure it's a valid {network} wallet address."
    )
}

pub fn format_wallet_report(report: &WalletReport, chain: &ChainProfile) -> String {
    let mut msg = String::new();
    let native = escape_html(&chain.native_symbol);

    msg.push_str("🔍 <b>WALLET ANALYSIS</b>\n\n");
    let _ = writeln!(msg, "📍 <code>{}</code>", report.address.short());
    let _ = writeln!(
        msg,
        "🔗 <a href=\"{}/address/{}\">View on {}</a>\n",
        escape_html(&chain.explorer_url),
        report.address,
        escape_html(&chain.explorer_name)
    );

    match &report.balance {
        Some(balance) => {
            let usd = match balance.usd_value {
                Some(value) => format!("${}", group_thousands(value, 2)),
                None => "USD value unavailable".to_string(),
            };
            let _ = writeln!(
                msg,
                "💰 <b>{native} Balance:</b> {:.4} {native} ({usd})\n",
                balance.amount.round_dp(4)
            );
        }
        None => {
            let _ = writeln!(msg, "💰 <b>{native} Balance:</b> unavailable\n");
        }
    }

    match &report.activities {
        Some(activities) if !activities.is_empty() => {
            msg.push_str("📊 <b>RECENT TOKEN ACTIVITY</b>\n\n");
            for activity in activities {
                write_activity(&mut msg, activity, chain);
            }
        }
        Some(_) => msg.push_str("📊 No recent token activity found.\n\n"),
        None => msg.push_str("📊 Token activity unavailable.\n\n"),
    }

    if let Some(token) = &report.top_token {
        let _ = writeln!(msg, "🎯 <b>TOP TRADED: {}</b>", escape_html(&token.symbol));
        let _ = writeln!(msg, "   💵 Price: ${:.6}", token.price_usd.round_dp(6));
        let _ = writeln!(msg, "   📈 24h: {:+.1}%", token.price_change_24h.round_dp(1));
        let _ = writeln!(msg, "   💧 Liquidity: ${}", group_thousands(token.liquidity_usd, 0));
        msg.push('\n');
    }

    if report.is_degraded() {
        let _ = writeln!(
            msg,
            "⚠️ <i>Some data could not be loaded: {}. Try again later for a full report.</i>",
            report.missing.join(", ")
        );
    }

    msg.trim_end().to_string()
}

fn write_activity(msg: &mut String, activity: &TokenActivity, chain: &ChainProfile) {
    let classification = activity.classification();
    let _ = writeln!(
        msg,
        "{} <b>{}</b> - {}",
        classification.emoji(),
        escape_html(&activity.symbol),
        classification.label()
    );
    let _ = writeln!(msg, "   Buys: {} | Sells: {}", activity.buys, activity.sells);
    let _ = writeln!(
        msg,
        "   <a href=\"{}/{}\">Chart</a>\n",
        escape_html(&chain.dex_url),
        escape_html(&activity.contract_address)
    );
}

pub fn format_trending(tokens: &[TrendingToken], chain: &ChainProfile) -> String {
    if tokens.is_empty() {
        return no_trending_text(chain);
    }

    let mut msg = format!(
        "🔥 <b>TOP TOKENS ON {} (by 24h volume)</b>\n\n",
        escape_html(&chain.display_name().to_uppercase())
    );

    for (i, token) in tokens.iter().enumerate() {
        let change = match token.price_change_24h {
            Some(change) if change > Decimal::ZERO => format!("🟢 {:+.1}%", change.round_dp(1)),
            Some(change) => format!("🔴 {:+.1}%", change.round_dp(1)),
            None => "⚪ n/a".to_string(),
        };
        let price = match token.price_usd {
            Some(price) => format!("${:.6}", price.round_dp(6)),
            None => "$?".to_string(),
        };

        let _ = writeln!(msg, "{}. <b>{}</b> {}", i + 1, escape_html(&token.symbol), change);
        let _ = writeln!(msg, "   💵 {} | Vol: ${}", price, group_thousands(token.volume_24h, 0));
        let _ = writeln!(
            msg,
            "   <a href=\"{}/{}\">Chart</a>\n",
            escape_html(&chain.dex_url),
            escape_html(&token.address)
        );
    }

    msg.trim_end().to_string()
}
