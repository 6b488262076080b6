//! 연속 승/패 통계.

use journal_core::TradeRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 연속 승/패 요약.
///
/// 손익이 정확히 0인 거래는 승도 패도 아니며 진행 중인 연속 기록을 끊습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// 최대 연속 수익 거래 수
    pub max_consecutive_wins: usize,
    /// 최대 연속 수익 구간의 손익 합계
    pub max_consecutive_win_amount: Decimal,
    /// 최대 연속 손실 거래 수
    pub max_consecutive_losses: usize,
    /// 최대 연속 손실 구간의 손익 합계 (음수)
    pub max_consecutive_loss_amount: Decimal,
    /// 마지막 거래 기준 현재 연속 기록 (양수 = 연승, 음수 = 연패)
    pub current_streak: i64,
}

#[derive(Default)]
struct Run {
    count: usize,
    amount: Decimal,
}

/// 청산 시각 순서로 연속 승/패를 계산합니다.
///
/// 입력 순서에 의존하지 않도록 복사본을 안정 정렬합니다.
/// 길이가 같은 연속 기록이 여러 개면 먼저 나온 기록을 유지합니다.
pub fn streak_summary(trades: &[TradeRecord]) -> StreakSummary {
    let mut ordered: Vec<(&TradeRecord, Decimal)> = trades
        .iter()
        .filter_map(|t| t.resolved_pnl().map(|pnl| (t, pnl)))
        .collect();
    ordered.sort_by_key(|(t, _)| t.closed_at);

    let mut summary = StreakSummary::default();
    let mut wins = Run::default();
    let mut losses = Run::default();

    for (_, pnl) in ordered {
        if pnl > Decimal::ZERO {
            losses = Run::default();
            wins.count += 1;
            wins.amount += pnl;
            if wins.count > summary.max_consecutive_wins {
                summary.max_consecutive_wins = wins.count;
                summary.max_consecutive_win_amount = wins.amount;
            }
        } else if pnl < Decimal::ZERO {
            wins = Run::default();
            losses.count += 1;
            losses.amount += pnl;
            if losses.count > summary.max_consecutive_losses {
                summary.max_consecutive_losses = losses.count;
                summary.max_consecutive_loss_amount = losses.amount;
            }
        } else {
            wins = Run::default();
            losses = Run::default();
        }
    }

    summary.current_streak = if wins.count > 0 {
        wins.count as i64
    } else {
        -(losses.count as i64)
    };

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use journal_core::Direction;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn sequence(pnls: &[Decimal]) -> Vec<TradeRecord> {
        let ledger = Uuid::new_v4();
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        pnls.iter()
            .enumerate()
            .map(|(i, pnl)| {
                TradeRecord::with_pnl(
                    ledger,
                    "X",
                    Direction::Long,
                    *pnl,
                    start + Duration::hours(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_loss_streak() {
        let trades = sequence(&[dec!(100), dec!(-50), dec!(-30), dec!(20), dec!(-10)]);
        let summary = streak_summary(&trades);

        assert_eq!(summary.max_consecutive_losses, 2);
        assert_eq!(summary.max_consecutive_loss_amount, dec!(-80));
        assert_eq!(summary.max_consecutive_wins, 1);
        assert_eq!(summary.max_consecutive_win_amount, dec!(100));
        assert_eq!(summary.current_streak, -1);
    }

    #[test]
    fn test_zero_breaks_streaks() {
        let trades = sequence(&[dec!(-5), dec!(-5), dec!(0), dec!(-5), dec!(10), dec!(0), dec!(10)]);
        let summary = streak_summary(&trades);

        assert_eq!(summary.max_consecutive_losses, 2);
        assert_eq!(summary.max_consecutive_loss_amount, dec!(-10));
        assert_eq!(summary.max_consecutive_wins, 1);
        assert_eq!(summary.current_streak, 1);
    }

    #[test]
    fn test_first_longest_run_kept() {
        let trades = sequence(&[dec!(10), dec!(10), dec!(-1), dec!(50), dec!(50)]);
        let summary = streak_summary(&trades);

        assert_eq!(summary.max_consecutive_wins, 2);
        assert_eq!(summary.max_consecutive_win_amount, dec!(20));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let mut trades = sequence(&[dec!(100), dec!(-50), dec!(-30), dec!(20), dec!(-10)]);
        trades.reverse();

        let summary = streak_summary(&trades);
        assert_eq!(summary.max_consecutive_losses, 2);
        assert_eq!(summary.max_consecutive_loss_amount, dec!(-80));
    }

    #[test]
    fn test_empty() {
        assert_eq!(streak_summary(&[]), StreakSummary::default());
    }
}
