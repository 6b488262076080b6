//! 계좌별 / 전략별 성과 분해.
//!
//! 같은 지표 함수를 거래 부분집합마다 다시 적용합니다.

use journal_core::{Ledger, Money, Strategy, TradeRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::PerformanceMetrics;
use crate::portfolio::build_equity_curve;

/// 전략이 없는 거래 그룹의 이름.
pub const UNASSIGNED_GROUP: &str = "unassigned";

/// 그룹 하나의 성과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    /// 계좌 또는 전략 ID (미지정 그룹은 없음)
    pub id: Option<Uuid>,
    /// 표시 이름
    pub name: String,
    /// 그룹 성과
    pub metrics: PerformanceMetrics,
}

fn group_metrics(
    id: Option<Uuid>,
    name: &str,
    starting_balance: Money,
    trades: &[TradeRecord],
) -> GroupMetrics {
    let curve = build_equity_curve(starting_balance, trades);
    GroupMetrics {
        id,
        name: name.to_string(),
        metrics: PerformanceMetrics::compute(trades, &curve),
    }
}

/// 계좌별 성과를 계산합니다.
///
/// 계좌마다 자신의 시작 잔고와 거래로 곡선을 만듭니다. 결과는 입력 계좌 순서입니다.
pub fn ledger_breakdown(ledgers: &[Ledger], trades: &[TradeRecord]) -> Vec<GroupMetrics> {
    ledgers
        .iter()
        .map(|ledger| {
            let subset: Vec<TradeRecord> = trades
                .iter()
                .filter(|t| t.ledger_id == ledger.id)
                .cloned()
                .collect();
            group_metrics(
                Some(ledger.id),
                &ledger.name,
                ledger.starting_balance(),
                &subset,
            )
        })
        .collect()
}

/// 전략별 성과를 계산합니다.
///
/// 각 전략 그룹은 같은 시작 잔고를 사용합니다. 전략이 없거나 목록에 없는
/// 전략을 가진 거래는 `unassigned` 그룹으로 모이며, 해당 거래가 있을 때만
/// 마지막에 추가됩니다.
pub fn strategy_breakdown(
    strategies: &[Strategy],
    trades: &[TradeRecord],
    starting_balance: Money,
) -> Vec<GroupMetrics> {
    let mut groups: Vec<GroupMetrics> = strategies
        .iter()
        .map(|strategy| {
            let subset: Vec<TradeRecord> = trades
                .iter()
                .filter(|t| t.strategy_id == Some(strategy.id))
                .cloned()
                .collect();
            group_metrics(Some(strategy.id), &strategy.name, starting_balance, &subset)
        })
        .collect();

    let unassigned: Vec<TradeRecord> = trades
        .iter()
        .filter(|t| match t.strategy_id {
            Some(id) => !strategies.iter().any(|s| s.id == id),
            None => true,
        })
        .cloned()
        .collect();

    if !unassigned.is_empty() {
        groups.push(group_metrics(
            None,
            UNASSIGNED_GROUP,
            starting_balance,
            &unassigned,
        ));
    }

    groups
}
