//! Application State

use std::sync::Arc;

use wallet_scanner::{ConversationHandler, ScannerConfig};

/// Shared, read-only state handed to every update
#[derive(Clone)]
pub struct AppState {
    /// Wallet/trending pipeline
    pub handler: Arc<ConversationHandler>,

    /// Loaded once at startup
    pub config: Arc<ScannerConfig>,
}
