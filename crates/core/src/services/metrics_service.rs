use std::collections::HashMap;

use crate::models::analytics::{CategoryAllocation, TradeSummary};
use crate::models::asset::{AssetCategory, PortfolioAsset};
use crate::models::trade::{Direction, Trade, TradeStatus};

/// Risk:reward ratio of a planned trade: reward distance over risk distance
/// from the entry price.
///
/// Returns `None` when the trade is incomplete or inconsistent:
/// - a price is missing, zero, or not finite;
/// - `Long` without `stop_loss < entry < take_profit`;
/// - `Short` without `take_profit < entry < stop_loss`;
/// - the stop sits exactly on the entry (zero risk).
///
/// With no direction the levels are not checked against each other and the
/// ratio is taken from absolute distances.
pub fn calculate_rrr(
    entry: Option<f64>,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
    direction: Option<Direction>,
) -> Option<f64> {
    let entry = present(entry)?;
    let stop_loss = present(stop_loss)?;
    let take_profit = present(take_profit)?;

    match direction {
        Some(Direction::Long) if !(stop_loss < entry && take_profit > entry) => return None,
        Some(Direction::Short) if !(stop_loss > entry && take_profit < entry) => return None,
        _ => {}
    }

    let risk = (entry - stop_loss).abs();
    let reward = (take_profit - entry).abs();
    if risk == 0.0 {
        return None;
    }

    Some(reward / risk)
}

/// Risk:reward ratio of a journal trade.
pub fn trade_rrr(trade: &Trade) -> Option<f64> {
    calculate_rrr(
        trade.entry_price,
        trade.sl_price,
        trade.tp_price,
        trade.direction,
    )
}

/// Mean risk:reward over the trades that have one. Trades without a valid
/// ratio count in neither the sum nor the divisor. Returns 0.0 when no
/// trade qualifies; check the input (or `TradeSummary::rated_trades`) to
/// tell that apart from a genuine zero.
pub fn calculate_average_rr<'a, I>(trades: I) -> f64
where
    I: IntoIterator<Item = &'a Trade>,
{
    let (sum, count) = trades
        .into_iter()
        .filter_map(trade_rrr)
        .fold((0.0, 0usize), |(sum, count), rr| (sum + rr, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Zero counts as missing, same as an absent value.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

/// Aggregate statistics for the dashboard: risk:reward, P&L, win rate,
/// net worth.
///
/// Pure business logic over slices; never fails.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a set of trades.
    ///
    /// Only `Closed` trades with a recorded P&L count towards wins, losses
    /// and total P&L. A P&L of exactly zero is neither a win nor a loss.
    pub fn summarize<'a, I>(&self, trades: I) -> TradeSummary
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let trades: Vec<&Trade> = trades.into_iter().collect();

        let ratios: Vec<f64> = trades.iter().filter_map(|t| trade_rrr(t)).collect();
        let average_rr = calculate_average_rr(trades.iter().copied());

        let realized: Vec<f64> = trades
            .iter()
            .filter(|t| t.status == TradeStatus::Closed)
            .filter_map(|t| t.pnl)
            .collect();
        let wins = realized.iter().filter(|p| **p > 0.0).count();
        let losses = realized.iter().filter(|p| **p < 0.0).count();
        let total_pnl: f64 = realized.iter().sum();
        let win_rate_pct = if realized.is_empty() {
            0.0
        } else {
            (wins as f64 / realized.len() as f64) * 100.0
        };

        TradeSummary {
            total_trades: trades.len(),
            rated_trades: ratios.len(),
            average_rr,
            closed_trades: realized.len(),
            wins,
            losses,
            win_rate_pct,
            total_pnl,
        }
    }

    /// Sum of all asset values. Non-finite values are skipped.
    pub fn net_worth(&self, assets: &[PortfolioAsset]) -> f64 {
        assets
            .iter()
            .map(|a| a.value)
            .filter(|v| v.is_finite())
            .sum()
    }

    /// Net worth broken down by category, largest first.
    pub fn allocation(&self, assets: &[PortfolioAsset]) -> Vec<CategoryAllocation> {
        let net_worth = self.net_worth(assets);

        let mut by_category: HashMap<AssetCategory, f64> = HashMap::new();
        for asset in assets.iter().filter(|a| a.value.is_finite()) {
            *by_category.entry(asset.category).or_insert(0.0) += asset.value;
        }

        let mut allocations: Vec<CategoryAllocation> = by_category
            .into_iter()
            .map(|(category, value)| CategoryAllocation {
                category,
                value,
                allocation_pct: if net_worth > 0.0 {
                    (value / net_worth) * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        allocations.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        allocations
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
