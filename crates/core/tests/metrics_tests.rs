// ═══════════════════════════════════════════════════════════════════
// Metrics Tests — risk:reward ratio, averages, summaries, net worth
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use trading_journal_core::models::asset::{AssetCategory, PortfolioAsset};
use trading_journal_core::models::trade::{Direction, Trade, TradeSource};
use trading_journal_core::services::metrics_service::{
    calculate_average_rr, calculate_rrr, trade_rrr, MetricsService,
};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn planned(direction: Direction, entry: f64, sl: f64, tp: f64) -> Trade {
    Trade::new("EURUSD", direction, 1.0, date()).with_levels(entry, sl, tp)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ═══════════════════════════════════════════════════════════════════
// calculate_rrr
// ═══════════════════════════════════════════════════════════════════

mod rrr {
    use super::*;

    #[test]
    fn long_two_to_one() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(90.0), Some(120.0), Some(Direction::Long)),
            Some(2.0)
        );
    }

    #[test]
    fn short_three_to_one() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(105.0), Some(85.0), Some(Direction::Short)),
            Some(3.0)
        );
    }

    #[test]
    fn long_with_stop_above_entry_is_invalid() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(110.0), Some(80.0), Some(Direction::Long)),
            None
        );
    }

    #[test]
    fn long_with_target_below_entry_is_invalid() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(90.0), Some(95.0), Some(Direction::Long)),
            None
        );
    }

    #[test]
    fn short_with_long_levels_is_invalid() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(90.0), Some(120.0), Some(Direction::Short)),
            None
        );
    }

    #[test]
    fn zero_risk_is_invalid() {
        assert_eq!(
            calculate_rrr(Some(100.0), Some(100.0), Some(120.0), Some(Direction::Long)),
            None
        );
    }

    #[test]
    fn zero_risk_without_direction_is_invalid() {
        assert_eq!(calculate_rrr(Some(100.0), Some(100.0), Some(120.0), None), None);
    }

    #[test]
    fn missing_level_is_invalid() {
        assert_eq!(calculate_rrr(None, Some(90.0), Some(120.0), Some(Direction::Long)), None);
        assert_eq!(calculate_rrr(Some(100.0), None, Some(120.0), Some(Direction::Long)), None);
        assert_eq!(calculate_rrr(Some(100.0), Some(90.0), None, Some(Direction::Long)), None);
    }

    #[test]
    fn zero_price_counts_as_missing() {
        assert_eq!(calculate_rrr(Some(0.0), Some(-10.0), Some(20.0), None), None);
        assert_eq!(calculate_rrr(Some(100.0), Some(0.0), Some(120.0), Some(Direction::Long)), None);
    }

    #[test]
    fn non_finite_price_is_invalid() {
        assert_eq!(calculate_rrr(Some(f64::NAN), Some(90.0), Some(120.0), None), None);
        assert_eq!(calculate_rrr(Some(100.0), Some(f64::INFINITY), Some(120.0), None), None);
        assert_eq!(
            calculate_rrr(Some(100.0), Some(90.0), Some(f64::NEG_INFINITY), Some(Direction::Long)),
            None
        );
    }

    #[test]
    fn no_direction_uses_absolute_distances() {
        // Levels that would be rejected for a long are accepted without a direction.
        assert_eq!(calculate_rrr(Some(100.0), Some(110.0), Some(80.0), None), Some(2.0));
    }

    #[test]
    fn fractional_ratio() {
        let rr = calculate_rrr(Some(1.1000), Some(1.0950), Some(1.1025), Some(Direction::Long)).unwrap();
        assert!(approx(rr, 0.5));
    }

    #[test]
    fn trade_rrr_reads_trade_fields() {
        assert_eq!(trade_rrr(&planned(Direction::Long, 100.0, 90.0, 120.0)), Some(2.0));
        let unplanned = Trade::new("BTCUSDT", Direction::Long, 0.1, date());
        assert_eq!(trade_rrr(&unplanned), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// calculate_average_rr
// ═══════════════════════════════════════════════════════════════════

mod average {
    use super::*;

    #[test]
    fn empty_is_zero() {
        let trades: Vec<Trade> = vec![];
        assert_eq!(calculate_average_rr(&trades), 0.0);
    }

    #[test]
    fn invalid_trades_are_excluded_from_count() {
        let trades = vec![
            planned(Direction::Long, 100.0, 90.0, 120.0),
            planned(Direction::Long, 100.0, 110.0, 80.0),
        ];
        assert_eq!(calculate_average_rr(&trades), 2.0);
    }

    #[test]
    fn all_invalid_is_zero() {
        let trades = vec![
            planned(Direction::Long, 100.0, 100.0, 120.0),
            Trade::new("ETHUSDT", Direction::Short, 1.0, date()),
        ];
        assert_eq!(calculate_average_rr(&trades), 0.0);
    }

    #[test]
    fn mean_of_valid_ratios() {
        let trades = vec![
            planned(Direction::Long, 100.0, 90.0, 120.0),  // 2
            planned(Direction::Short, 100.0, 105.0, 85.0), // 3
            planned(Direction::Long, 50.0, 40.0, 60.0),    // 1
        ];
        assert!(approx(calculate_average_rr(&trades), 2.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// MetricsService — summaries
// ═══════════════════════════════════════════════════════════════════

mod summary {
    use super::*;

    #[test]
    fn empty_summary() {
        let s = MetricsService::new().summarize(&Vec::<Trade>::new());
        assert_eq!(s.total_trades, 0);
        assert_eq!(s.rated_trades, 0);
        assert_eq!(s.average_rr, 0.0);
        assert_eq!(s.closed_trades, 0);
        assert_eq!(s.win_rate_pct, 0.0);
        assert_eq!(s.total_pnl, 0.0);
    }

    #[test]
    fn counts_wins_losses_and_pnl() {
        let mut win = planned(Direction::Long, 100.0, 90.0, 120.0);
        win.close(200.0);
        let mut loss = planned(Direction::Short, 100.0, 105.0, 85.0);
        loss.close(-50.0);
        let mut flat = Trade::new("SPY", Direction::Long, 10.0, date());
        flat.close(0.0);
        let open = planned(Direction::Long, 10.0, 10.0, 12.0);

        let s = MetricsService::new().summarize(&vec![win, loss, flat, open]);

        assert_eq!(s.total_trades, 4);
        assert_eq!(s.rated_trades, 2);
        assert!(approx(s.average_rr, 2.5));
        assert_eq!(s.closed_trades, 3);
        assert_eq!(s.wins, 1);
        assert_eq!(s.losses, 1);
        assert!(approx(s.win_rate_pct, 100.0 / 3.0));
        assert!(approx(s.total_pnl, 150.0));
    }

    #[test]
    fn open_trade_pnl_is_ignored() {
        let mut open = Trade::new("AAPL", Direction::Long, 5.0, date());
        open.pnl = Some(999.0);
        let s = MetricsService::new().summarize(&vec![open]);
        assert_eq!(s.closed_trades, 0);
        assert_eq!(s.total_pnl, 0.0);
    }

    #[test]
    fn summarize_filtered_iterator() {
        let live = planned(Direction::Long, 100.0, 90.0, 120.0);
        let backtest = planned(Direction::Long, 100.0, 95.0, 120.0).with_source(TradeSource::Backtest);
        let trades = vec![live, backtest];

        let s = MetricsService::new()
            .summarize(trades.iter().filter(|t| t.source == TradeSource::Backtest));
        assert_eq!(s.total_trades, 1);
        assert!(approx(s.average_rr, 4.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// MetricsService — net worth
// ═══════════════════════════════════════════════════════════════════

mod net_worth {
    use super::*;

    #[test]
    fn sums_values_including_liabilities() {
        let assets = vec![
            PortfolioAsset::new("Checking", AssetCategory::Cash, 5_000.0),
            PortfolioAsset::new("Broker", AssetCategory::Brokerage, 20_000.0),
            PortfolioAsset::new("Car loan", AssetCategory::Other, -3_000.0),
        ];
        assert_eq!(MetricsService::new().net_worth(&assets), 22_000.0);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(MetricsService::new().net_worth(&[]), 0.0);
    }

    #[test]
    fn allocation_groups_by_category_largest_first() {
        let assets = vec![
            PortfolioAsset::new("Checking", AssetCategory::Cash, 2_500.0),
            PortfolioAsset::new("Savings", AssetCategory::Cash, 2_500.0),
            PortfolioAsset::new("BTC", AssetCategory::Crypto, 15_000.0),
        ];
        let alloc = MetricsService::new().allocation(&assets);
        assert_eq!(alloc.len(), 2);
        assert_eq!(alloc[0].category, AssetCategory::Crypto);
        assert!(approx(alloc[0].allocation_pct, 75.0));
        assert_eq!(alloc[1].category, AssetCategory::Cash);
        assert!(approx(alloc[1].value, 5_000.0));
        assert!(approx(alloc[1].allocation_pct, 25.0));
    }

    #[test]
    fn allocation_pct_zero_when_net_worth_not_positive() {
        let assets = vec![
            PortfolioAsset::new("Cash", AssetCategory::Cash, 1_000.0),
            PortfolioAsset::new("Loan", AssetCategory::Other, -1_000.0),
        ];
        let alloc = MetricsService::new().allocation(&assets);
        assert!(alloc.iter().all(|a| a.allocation_pct == 0.0));
    }
}
