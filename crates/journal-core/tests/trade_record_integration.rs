//! TradeRecord 통합 테스트
//!
//! 가격 기반 손익 계산과 저장 포맷 호환성을 검증합니다.

use chrono::{TimeZone, Utc};
use journal_core::{analyzable, Direction, Ledger, TradeRecord};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_mixed_records_for_one_ledger() {
    let ledger = Ledger::new("Main").with_initial_balance(dec!(5000));
    let day = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();

    let trades = vec![
        TradeRecord::from_prices(
            ledger.id,
            "AAPL",
            Direction::Long,
            dec!(180),
            dec!(185),
            dec!(10),
            day,
        )
        .with_commission(dec!(1)),
        TradeRecord::with_pnl(ledger.id, "TSLA", Direction::Short, dec!(-120), day),
    ];

    let kept = analyzable(&trades);
    assert_eq!(kept.len(), 2);

    let total: Decimal = kept.iter().filter_map(|t| t.pnl).sum();
    // 49 - 120
    assert_eq!(total, dec!(-71));
}

#[test]
fn test_json_round_trip_keeps_canonical_fields() {
    let ledger = Ledger::new("Main");
    let closed_at = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
    let trade = TradeRecord::with_pnl(ledger.id, "NQ", Direction::Short, dec!(300), closed_at)
        .with_notes("news fade");

    let json = serde_json::to_string(&trade).unwrap();
    assert!(json.contains("\"symbol\":\"NQ\""));
    assert!(json.contains("\"direction\":\"short\""));

    let decoded: TradeRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, trade);
}

proptest! {
    /// 롱과 숏의 손익은 같은 가격에서 부호만 반대입니다.
    #[test]
    fn prop_long_short_symmetry(
        entry in 1i64..1_000_000,
        exit in 1i64..1_000_000,
        qty in 1i64..1_000,
    ) {
        let closed_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let ledger = uuid::Uuid::new_v4();

        let long = TradeRecord::from_prices(
            ledger, "X", Direction::Long,
            Decimal::from(entry), Decimal::from(exit), Decimal::from(qty), closed_at,
        );
        let short = TradeRecord::from_prices(
            ledger, "X", Direction::Short,
            Decimal::from(entry), Decimal::from(exit), Decimal::from(qty), closed_at,
        );

        let long_pnl = long.pnl.unwrap();
        let short_pnl = short.pnl.unwrap();
        prop_assert_eq!(long_pnl, -short_pnl);
        prop_assert_eq!(long_pnl, Decimal::from((exit - entry) * qty));
    }

    /// 수수료는 가격 기반 손익에서 그대로 차감됩니다.
    #[test]
    fn prop_commission_is_subtracted(
        entry in 1i64..100_000,
        exit in 1i64..100_000,
        commission in 0i64..1_000,
    ) {
        let closed_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let base = TradeRecord::from_prices(
            uuid::Uuid::new_v4(), "X", Direction::Long,
            Decimal::from(entry), Decimal::from(exit), Decimal::ONE, closed_at,
        );
        let with_fee = base.clone().with_commission(Decimal::from(commission));

        prop_assert_eq!(base.pnl.unwrap() - with_fee.pnl.unwrap(), Decimal::from(commission));
    }
}
