use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::PortfolioAsset;
use crate::models::journal::Journal;
use crate::models::trade::{Trade, TradeSource, TradeStatus};

/// Manages journal trades and portfolio assets.
///
/// Pure business logic: no I/O, no network.
pub struct JournalService;

impl JournalService {
    pub fn new() -> Self {
        Self
    }

    // ── Trades ──────────────────────────────────────────────────────

    /// Add a trade, keeping `journal.trades` sorted by `opened_at`.
    pub fn add_trade(&self, journal: &mut Journal, trade: Trade) -> Result<(), CoreError> {
        self.validate_trade(&trade)?;
        if journal.trades.iter().any(|t| t.id == trade.id) {
            return Err(CoreError::ValidationError(format!(
                "Duplicate trade id: {}",
                trade.id
            )));
        }
        Self::sorted_insert(&mut journal.trades, trade);
        Ok(())
    }

    /// Add many trades atomically: either all are valid and inserted, or none.
    pub fn add_trades(&self, journal: &mut Journal, trades: Vec<Trade>) -> Result<(), CoreError> {
        for (i, trade) in trades.iter().enumerate() {
            self.validate_trade(trade)
                .map_err(|e| CoreError::ValidationError(format!("Trade #{i}: {e}")))?;
            let duplicate = journal.trades.iter().any(|t| t.id == trade.id)
                || trades[..i].iter().any(|t| t.id == trade.id);
            if duplicate {
                return Err(CoreError::ValidationError(format!(
                    "Trade #{i}: duplicate id {}",
                    trade.id
                )));
            }
        }
        for trade in trades {
            Self::sorted_insert(&mut journal.trades, trade);
        }
        Ok(())
    }

    /// Replace the trade with the same id. The old trade stays in place if
    /// the new one fails validation.
    pub fn update_trade(&self, journal: &mut Journal, trade: Trade) -> Result<(), CoreError> {
        self.validate_trade(&trade)?;
        let idx = Self::trade_index(journal, trade.id)?;
        journal.trades.remove(idx);
        Self::sorted_insert(&mut journal.trades, trade);
        Ok(())
    }

    pub fn remove_trade(&self, journal: &mut Journal, trade_id: Uuid) -> Result<Trade, CoreError> {
        let idx = Self::trade_index(journal, trade_id)?;
        Ok(journal.trades.remove(idx))
    }

    /// Close an open trade with its realized P&L.
    pub fn close_trade(&self, journal: &mut Journal, trade_id: Uuid, pnl: f64) -> Result<(), CoreError> {
        if !pnl.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "P&L must be finite, got {pnl}"
            )));
        }
        let idx = Self::trade_index(journal, trade_id)?;
        let trade = &mut journal.trades[idx];
        if trade.status != TradeStatus::Open {
            return Err(CoreError::ValidationError(format!(
                "Trade {trade_id} is already {}",
                trade.status
            )));
        }
        trade.close(pnl);
        Ok(())
    }

    pub fn get_trade<'a>(&self, journal: &'a Journal, trade_id: Uuid) -> Option<&'a Trade> {
        journal.trades.iter().find(|t| t.id == trade_id)
    }

    /// Trades newest first, optionally narrowed by source and status.
    pub fn list_trades<'a>(
        &self,
        journal: &'a Journal,
        source: Option<TradeSource>,
        status: Option<TradeStatus>,
    ) -> Vec<&'a Trade> {
        let mut trades: Vec<&Trade> = journal
            .trades
            .iter()
            .filter(|t| source.map_or(true, |s| t.source == s))
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect();
        trades.sort_by(|a, b| b.opened_at.cmp(&a.opened_at));
        trades
    }

    /// Validate a trade's payload fields.
    ///
    /// Price levels are not checked here: incomplete or
    /// inconsistent levels are allowed in the journal and simply produce no
    /// risk:reward ratio.
    pub fn validate_trade(&self, trade: &Trade) -> Result<(), CoreError> {
        if trade.symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if !trade.quantity.is_finite() || trade.quantity <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Quantity must be positive and finite, got {}",
                trade.quantity
            )));
        }
        if let Some(pnl) = trade.pnl {
            if !pnl.is_finite() {
                return Err(CoreError::ValidationError(format!(
                    "P&L must be finite, got {pnl}"
                )));
            }
        }
        Ok(())
    }

    // ── Assets ──────────────────────────────────────────────────────

    pub fn add_asset(&self, journal: &mut Journal, asset: PortfolioAsset) -> Result<(), CoreError> {
        self.validate_asset(&asset)?;
        journal.assets.push(asset);
        Ok(())
    }

    /// Set the current value of an asset.
    pub fn update_asset_value(
        &self,
        journal: &mut Journal,
        asset_id: Uuid,
        value: f64,
    ) -> Result<(), CoreError> {
        if !value.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Asset value must be finite, got {value}"
            )));
        }
        let asset = journal
            .assets
            .iter_mut()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;
        asset.value = value;
        Ok(())
    }

    pub fn remove_asset(&self, journal: &mut Journal, asset_id: Uuid) -> Result<PortfolioAsset, CoreError> {
        let idx = journal
            .assets
            .iter()
            .position(|a| a.id == asset_id)
            .ok_or_else(|| CoreError::AssetNotFound(asset_id.to_string()))?;
        Ok(journal.assets.remove(idx))
    }

    pub fn validate_asset(&self, asset: &PortfolioAsset) -> Result<(), CoreError> {
        if asset.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Asset name must not be empty".into()));
        }
        if !asset.value.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Asset value must be finite, got {}",
                asset.value
            )));
        }
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn trade_index(journal: &Journal, trade_id: Uuid) -> Result<usize, CoreError> {
        journal
            .trades
            .iter()
            .position(|t| t.id == trade_id)
            .ok_or_else(|| CoreError::TradeNotFound(trade_id.to_string()))
    }

    /// Insert after any trades opened on the same date (stable order).
    fn sorted_insert(trades: &mut Vec<Trade>, trade: Trade) {
        let pos = trades.partition_point(|t| t.opened_at <= trade.opened_at);
        trades.insert(pos, trade);
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}
