use serde::{Deserialize, Serialize};

use super::asset::AssetCategory;

/// Aggregate statistics over a set of trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    /// Number of trades considered
    pub total_trades: usize,

    /// Trades that produced a valid risk:reward ratio.
    /// `average_rr == 0.0` with `rated_trades == 0` means "no data".
    pub rated_trades: usize,

    /// Mean risk:reward over rated trades, 0 when none
    pub average_rr: f64,

    /// Closed trades with a realized P&L
    pub closed_trades: usize,

    /// Closed trades with P&L > 0
    pub wins: usize,

    /// Closed trades with P&L < 0
    pub losses: usize,

    /// wins / closed_trades × 100, 0 when nothing is closed
    pub win_rate_pct: f64,

    /// Sum of realized P&L over closed trades
    pub total_pnl: f64,
}

/// Share of net worth held in one asset category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: AssetCategory,

    /// Sum of asset values in this category
    pub value: f64,

    /// value / net worth × 100, 0 when net worth is not positive
    pub allocation_pct: f64,
}
