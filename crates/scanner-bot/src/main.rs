//! scanner-bot
//!
//! Telegram long-polling front end for `wallet-scanner`. Send it a Base
//! wallet address and it answers with balance and token activity; `/trending`
//! lists the top tokens by 24h volume.

mod handlers;
mod state;

use std::sync::Arc;

use teloxide::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wallet_scanner::{live_handler, ScannerConfig};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wallet_scanner=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing credentials are fatal here, never per request
    let config = Arc::new(ScannerConfig::from_env()?);
    tracing::debug!(?config, "configuration loaded");

    let handler = Arc::new(live_handler(config.clone())?);
    let state = AppState {
        handler,
        config: config.clone(),
    };

    let bot = Bot::new(&config.telegram_token);
    let me = bot.get_me().await?;
    tracing::info!(
        "✓ Connected to Telegram as @{}",
        me.username.as_deref().unwrap_or("unknown")
    );

    if let Err(e) = bot.set_my_commands(handlers::bot_commands()).await {
        tracing::warn!("⚠ Could not register bot commands: {}", e);
    }

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!(
        "🔵 {} wallet bot running (chain id {})",
        state.config.chain.display_name(),
        state.config.chain.chain_id
    );
    tracing::info!("══════════════════════════════════════════════════");

    let schema = Update::filter_message().endpoint(handlers::on_message);

    Dispatcher::builder(bot, schema)
        .dependencies(teloxide::dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Bot stopped");
    Ok(())
}
