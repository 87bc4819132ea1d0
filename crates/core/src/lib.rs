pub mod errors;
pub mod models;
pub mod network;
pub mod services;
pub mod storage;

use models::{
    analytics::{CategoryAllocation, TradeSummary},
    asset::PortfolioAsset,
    journal::Journal,
    settings::JournalSettings,
    trade::{Trade, TradeRecord, TradeSource, TradeStatus},
};
use services::{journal_service::JournalService, metrics_service::MetricsService};
use storage::manager::StorageManager;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Trading Journal core library.
/// Holds the journal state and the services that operate on it.
///
/// The offline cache (`services::cache_manager`) is independent of the
/// journal and is wired up by the host separately.
#[must_use]
pub struct TradingJournal {
    journal: Journal,
    journal_service: JournalService,
    metrics_service: MetricsService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for TradingJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingJournal")
            .field("trades", &self.journal.trades.len())
            .field("assets", &self.journal.assets.len())
            .field("settings", &self.journal.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl TradingJournal {
    /// Create a brand new empty journal with default settings.
    pub fn create_new() -> Self {
        Self::build(Journal::default())
    }

    pub fn load_from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let journal = StorageManager::load_from_bytes(data)?;
        tracing::info!(trades = journal.trades.len(), assets = journal.assets.len(), "journal loaded");
        Ok(Self::build(journal))
    }

    /// Serialize the journal. Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.journal)?;
        self.dirty = false;
        Ok(bytes)
    }

    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let journal = StorageManager::load_from_file(path)?;
        Ok(Self::build(journal))
    }

    /// Save to a file on disk. Clears the unsaved-changes flag on success.
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.journal, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Trades ──────────────────────────────────────────────────────

    /// Log a trade. Returns its id.
    pub fn add_trade(&mut self, trade: Trade) -> Result<Uuid, CoreError> {
        let id = trade.id;
        self.journal_service.add_trade(&mut self.journal, trade)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn update_trade(&mut self, trade: Trade) -> Result<(), CoreError> {
        self.journal_service.update_trade(&mut self.journal, trade)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_trade(&mut self, trade_id: Uuid) -> Result<Trade, CoreError> {
        let removed = self.journal_service.remove_trade(&mut self.journal, trade_id)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Close an open trade with its realized P&L.
    pub fn close_trade(&mut self, trade_id: Uuid, pnl: f64) -> Result<(), CoreError> {
        self.journal_service
            .close_trade(&mut self.journal, trade_id, pnl)?;
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn get_trade(&self, trade_id: Uuid) -> Option<&Trade> {
        self.journal_service.get_trade(&self.journal, trade_id)
    }

    /// All trades, newest first.
    #[must_use]
    pub fn get_trades(&self) -> Vec<&Trade> {
        self.journal_service.list_trades(&self.journal, None, None)
    }

    /// Trades narrowed by source and/or status, newest first.
    #[must_use]
    pub fn get_trades_filtered(
        &self,
        source: Option<TradeSource>,
        status: Option<TradeStatus>,
    ) -> Vec<&Trade> {
        self.journal_service
            .list_trades(&self.journal, source, status)
    }

    // ── Assets ──────────────────────────────────────────────────────

    pub fn add_asset(&mut self, asset: PortfolioAsset) -> Result<Uuid, CoreError> {
        let id = asset.id;
        self.journal_service.add_asset(&mut self.journal, asset)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn update_asset_value(&mut self, asset_id: Uuid, value: f64) -> Result<(), CoreError> {
        self.journal_service
            .update_asset_value(&mut self.journal, asset_id, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_asset(&mut self, asset_id: Uuid) -> Result<PortfolioAsset, CoreError> {
        let removed = self.journal_service.remove_asset(&mut self.journal, asset_id)?;
        self.dirty = true;
        Ok(removed)
    }

    #[must_use]
    pub fn get_assets(&self) -> &[PortfolioAsset] {
        &self.journal.assets
    }

    // ── Statistics ──────────────────────────────────────────────────

    /// Summary over every trade in the journal.
    #[must_use]
    pub fn get_summary(&self) -> TradeSummary {
        self.metrics_service.summarize(&self.journal.trades)
    }

    /// Summary over trades from one source only (live vs backtest).
    #[must_use]
    pub fn get_summary_for(&self, source: TradeSource) -> TradeSummary {
        self.metrics_service
            .summarize(self.journal.trades.iter().filter(|t| t.source == source))
    }

    /// Mean risk:reward across all trades, 0 when no trade has one.
    #[must_use]
    pub fn get_average_rr(&self) -> f64 {
        services::metrics_service::calculate_average_rr(&self.journal.trades)
    }

    #[must_use]
    pub fn get_net_worth(&self) -> f64 {
        self.metrics_service.net_worth(&self.journal.assets)
    }

    #[must_use]
    pub fn get_allocation(&self) -> Vec<CategoryAllocation> {
        self.metrics_service.allocation(&self.journal.assets)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &JournalSettings {
        &self.journal.settings
    }

    pub fn set_default_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let currency = currency.trim().to_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Currency must be a 3-letter code, got {currency:?}"
            )));
        }
        self.journal.settings.default_currency = currency;
        self.dirty = true;
        Ok(())
    }

    /// Whether there are changes since the last save/load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all trades as a JSON string.
    pub fn export_trades_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.journal.trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trades to JSON: {e}")))
    }

    /// Export all trades as a CSV string.
    /// Columns: id, symbol, direction, entry, stop_loss, take_profit, rrr, quantity, pnl, status, source, opened_at, notes
    #[must_use]
    pub fn export_trades_to_csv(&self) -> String {
        let mut csv = String::from(
            "id,symbol,direction,entry,stop_loss,take_profit,rrr,quantity,pnl,status,source,opened_at,notes\n",
        );
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        for trade in &self.journal.trades {
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
                trade.id,
                csv_field(&trade.symbol),
                trade.direction.map(|d| d.to_string()).unwrap_or_default(),
                opt(trade.entry_price),
                opt(trade.sl_price),
                opt(trade.tp_price),
                opt(services::metrics_service::trade_rrr(trade)),
                trade.quantity,
                opt(trade.pnl),
                trade.status,
                trade.source,
                trade.opened_at,
                csv_field(trade.notes.as_deref().unwrap_or("")),
            ));
        }
        csv
    }

    /// Import trades from a JSON array of trade records. Records are decoded
    /// leniently (see `TradeRecord`) but still validated as a batch.
    /// Returns the number of trades imported.
    pub fn import_trades_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let records: Vec<TradeRecord> = serde_json::from_str(json)?;
        let today = chrono::Utc::now().date_naive();
        let trades: Vec<Trade> = records.into_iter().map(|r| r.into_trade(today)).collect();
        let count = trades.len();
        self.journal_service.add_trades(&mut self.journal, trades)?;
        self.dirty = true;
        tracing::info!(count, "imported trades");
        Ok(count)
    }

    /// Full journal as JSON (unencrypted snapshot for debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.journal)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(journal: Journal) -> Self {
        Self {
            journal,
            journal_service: JournalService::new(),
            metrics_service: MetricsService::new(),
            dirty: false,
        }
    }
}

/// Quote a CSV field if it contains a comma, quote or line break.
fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}
