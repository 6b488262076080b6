//! 자산 곡선 → 기간 필터 → 성과 지표 전체 흐름 테스트.

use chrono::{DateTime, Duration, TimeZone, Utc};
use journal_analytics::{
    build_aggregate_curve, build_equity_curve, count_trades_in_window, filter_curve,
    ledger_breakdown, max_drawdown, EquityCurve, EquityCurveBuilder, EquityPoint, LookbackWindow,
    PerformanceMetrics, ProfitFactor,
};
use journal_core::{Direction, Ledger, TradeRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn ts(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

fn pnl_trade(ledger: Uuid, pnl: Decimal, at: DateTime<Utc>) -> TradeRecord {
    TradeRecord::with_pnl(ledger, "ES", Direction::Long, pnl, at)
}

#[test]
fn test_curve_from_unsorted_trades() {
    let ledger = Uuid::new_v4();
    let trades = vec![
        pnl_trade(ledger, dec!(500), ts(2025, 1, 10, 0)),
        pnl_trade(ledger, dec!(-200), ts(2025, 1, 5, 0)),
    ];

    let curve = build_equity_curve(dec!(10000), &trades);
    let points = curve.points();

    assert_eq!(points.len(), 3);
    assert_eq!(points[0].timestamp, ts(2025, 1, 5, 0));
    assert_eq!(points[0].equity, dec!(10000));
    assert_eq!(points[0].pnl, Decimal::ZERO);
    assert_eq!(points[1].equity, dec!(9800));
    assert_eq!(points[1].pnl, dec!(-200));
    assert_eq!(points[2].timestamp, ts(2025, 1, 10, 0));
    assert_eq!(points[2].equity, dec!(10300));
    assert_eq!(points[2].pnl, dec!(500));
}

#[test]
fn test_all_winners_report() {
    let ledger = Uuid::new_v4();
    let trades: Vec<TradeRecord> = (0..3)
        .map(|i| pnl_trade(ledger, dec!(100), ts(2025, 2, 1, 9) + Duration::hours(i)))
        .collect();

    let metrics = PerformanceMetrics::from_trades(&trades, dec!(10000));

    assert_eq!(metrics.win_rate_pct, dec!(100));
    assert_eq!(metrics.profit_factor, ProfitFactor::Infinite);
    assert_eq!(metrics.avg_loss, Decimal::ZERO);
    assert_eq!(metrics.streaks.max_consecutive_wins, 3);
    assert_eq!(metrics.ending_balance, dec!(10300));
    assert!(metrics.is_profitable());
}

#[test]
fn test_loss_streak_through_metrics() {
    let ledger = Uuid::new_v4();
    let pnls = [dec!(100), dec!(-50), dec!(-30), dec!(20), dec!(-10)];
    let mut trades: Vec<TradeRecord> = pnls
        .iter()
        .enumerate()
        .map(|(i, pnl)| pnl_trade(ledger, *pnl, ts(2025, 3, 1, 9) + Duration::hours(i as i64)))
        .collect();
    trades.reverse();

    let metrics = PerformanceMetrics::from_trades(&trades, dec!(10000));

    assert_eq!(metrics.streaks.max_consecutive_losses, 2);
    assert_eq!(metrics.streaks.max_consecutive_loss_amount, dec!(-80));
}

#[test]
fn test_drawdown_on_equity_sequence() {
    let mut builder = EquityCurveBuilder::new(dec!(10000));
    builder
        .seed(ts(2025, 4, 1, 0))
        .add_pnl(ts(2025, 4, 1, 10), dec!(500))
        .add_pnl(ts(2025, 4, 2, 10), dec!(-700))
        .add_pnl(ts(2025, 4, 3, 10), dec!(400));
    let curve = builder.build();

    let equities: Vec<Decimal> = curve.points().iter().map(|p| p.equity).collect();
    assert_eq!(equities, vec![dec!(10000), dec!(10500), dec!(9800), dec!(10200)]);

    let dd = max_drawdown(&curve);
    assert_eq!(dd.peak_equity, dec!(10500));
    assert_eq!(dd.peak_at, Some(ts(2025, 4, 1, 10)));
    assert_eq!(dd.trough_at, Some(ts(2025, 4, 2, 10)));
    assert_eq!(dd.max_drawdown, dec!(700));
    assert_eq!(dd.max_drawdown_pct.round_dp(2), dec!(6.67));
}

#[test]
fn test_one_day_window_on_stale_curve() {
    let now = ts(2025, 5, 20, 15);
    let old = now - Duration::days(3);
    let curve = EquityCurve::from_points(
        dec!(10000),
        vec![EquityPoint::synthetic(old, dec!(10750))],
    );

    let filtered = filter_curve(&curve, LookbackWindow::OneDay, now);

    assert_eq!(filtered.len(), 1);
    let point = &filtered.points()[0];
    assert_eq!(point.timestamp, ts(2025, 5, 20, 0));
    assert_eq!(point.equity, dec!(10750));
    assert!(point.is_synthetic());
}

#[test]
fn test_dashboard_flow_across_ledgers() {
    let stocks = Ledger::new("Stocks").with_initial_balance(dec!(20000));
    let crypto = Ledger::new("Crypto").with_initial_balance(dec!(5000));
    let ignored = Ledger::new("Paper");
    let now = ts(2025, 6, 30, 12);

    let trades = vec![
        pnl_trade(stocks.id, dec!(400), ts(2025, 6, 1, 15)),
        pnl_trade(crypto.id, dec!(-150), ts(2025, 6, 20, 3)),
        pnl_trade(ignored.id, dec!(9999), ts(2025, 6, 25, 3)),
        pnl_trade(stocks.id, dec!(250), ts(2025, 6, 29, 15)),
    ];

    let selected = [stocks.clone(), crypto.clone()];
    let curve = build_aggregate_curve(&selected, &trades);
    assert_eq!(curve.starting_balance(), dec!(25000));
    assert_eq!(curve.current_equity(), dec!(25500));

    let week = filter_curve(&curve, LookbackWindow::OneWeek, now);
    assert_eq!(week.points()[0].timestamp, now - Duration::days(7));
    assert_eq!(week.points()[0].equity, dec!(25250));
    assert_eq!(week.current_equity(), dec!(25500));

    assert_eq!(count_trades_in_window(&trades, LookbackWindow::OneWeek, now), 2);
    assert_eq!(count_trades_in_window(&trades, LookbackWindow::All, now), 4);

    let groups = ledger_breakdown(&selected, &trades);
    assert_eq!(groups[0].metrics.net_pnl, dec!(650));
    assert_eq!(groups[1].metrics.net_pnl, dec!(-150));
}

#[test]
fn test_metrics_serialize_flat() {
    let ledger = Uuid::new_v4();
    let trades = vec![pnl_trade(ledger, dec!(100), ts(2025, 1, 2, 10))];
    let metrics = PerformanceMetrics::from_trades(&trades, dec!(10000));

    let json = serde_json::to_value(&metrics).unwrap();
    assert!(json.get("max_drawdown").is_some());
    assert!(json.get("max_consecutive_wins").is_some());
    assert_eq!(json["profit_factor"], serde_json::json!("infinite"));
}

fn trades_strategy() -> impl Strategy<Value = Vec<TradeRecord>> {
    prop::collection::vec((0i64..10_000, -10_000i64..10_000), 0..40).prop_map(|rows| {
        let ledger = Uuid::new_v4();
        let base = ts(2024, 1, 1, 0);
        rows.into_iter()
            .map(|(minutes, cents)| {
                pnl_trade(ledger, Decimal::new(cents, 2), base + Duration::minutes(minutes * 37))
            })
            .collect()
    })
}

fn distinct_trades_strategy() -> impl Strategy<Value = Vec<TradeRecord>> {
    prop::collection::vec(-10_000i64..10_000, 1..40).prop_map(|cents| {
        let ledger = Uuid::new_v4();
        let base = ts(2024, 1, 1, 0);
        cents
            .into_iter()
            .enumerate()
            .map(|(i, c)| {
                // 홀짝 교차로 입력 순서와 시간 순서를 다르게 만든다
                let offset = if i % 2 == 0 { i as i64 } else { 1_000 - i as i64 };
                pnl_trade(ledger, Decimal::new(c, 2), base + Duration::hours(offset))
            })
            .collect()
    })
}

fn window_strategy() -> impl Strategy<Value = LookbackWindow> {
    prop::sample::select(LookbackWindow::ALL_WINDOWS.to_vec())
}

proptest! {
    #[test]
    fn prop_curve_is_ordered_and_accumulates(trades in trades_strategy()) {
        let curve = build_equity_curve(dec!(10000), &trades);
        let points = curve.points();

        for pair in points.windows(2) {
            prop_assert!(pair[0].timestamp <= pair[1].timestamp);
            prop_assert_eq!(pair[1].equity - pair[0].equity, pair[1].pnl);
        }
        prop_assert_eq!(points.len(), if trades.is_empty() { 0 } else { trades.len() + 1 });
    }

    #[test]
    fn prop_curve_starts_at_balance(trades in distinct_trades_strategy(), balance in 0i64..1_000_000) {
        let balance = Decimal::from(balance);
        let curve = build_equity_curve(balance, &trades);
        prop_assert_eq!(curve.first().map(|p| p.equity), Some(balance));
    }

    #[test]
    fn prop_curve_ignores_input_order(trades in distinct_trades_strategy()) {
        let mut reversed = trades.clone();
        reversed.reverse();

        let a = build_equity_curve(dec!(10000), &trades);
        let b = build_equity_curve(dec!(10000), &reversed);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, build_equity_curve(dec!(10000), &trades));
    }

    #[test]
    fn prop_drawdown_bounds(trades in trades_strategy()) {
        // 최대 손실 100 × 40건 < 시작 잔고이므로 잔고는 음수가 되지 않는다
        let curve = build_equity_curve(dec!(10000), &trades);
        let dd = max_drawdown(&curve);

        prop_assert!(dd.max_drawdown >= Decimal::ZERO);
        prop_assert!(dd.max_drawdown_pct >= Decimal::ZERO);
        prop_assert!(dd.max_drawdown_pct <= dec!(100));
    }

    #[test]
    fn prop_filter_never_empties(
        trades in distinct_trades_strategy(),
        window in window_strategy(),
        days_after in -30i64..800,
    ) {
        let curve = build_equity_curve(dec!(10000), &trades);
        let now = ts(2024, 1, 1, 0) + Duration::days(days_after);

        let filtered = filter_curve(&curve, window, now);
        prop_assert!(!filtered.is_empty());
        if let Some(cutoff) = window.cutoff(now) {
            prop_assert!(filtered.points().iter().all(|p| p.timestamp >= cutoff));
        }
    }
}
