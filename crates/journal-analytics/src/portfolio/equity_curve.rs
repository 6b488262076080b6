//! 자산 곡선(Equity Curve) 데이터 모듈
//!
//! 거래 기록의 실현 손익을 시간순으로 누적하여 잔고 시계열을 만듭니다.
//!
//! # 주요 기능
//!
//! - 거래일 자정에 시작 잔고 기준점 생성
//! - 손익 누적 (`equity[i] = equity[i-1] + pnl[i]`)
//! - 여러 계좌의 거래를 하나의 곡선으로 합산
//! - 구간 수익률 / 낙폭 시계열

use std::collections::HashSet;

use chrono::{DateTime, NaiveTime, Utc};
use journal_core::{Direction, Ledger, Money, Quantity, TradeRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// 툴팁 표시용 거래 정보. 계산에는 사용되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTrade {
    /// 종목
    pub symbol: String,
    /// 방향
    pub direction: Direction,
    /// 수량
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
}

impl From<&TradeRecord> for PointTrade {
    fn from(trade: &TradeRecord) -> Self {
        Self {
            symbol: trade.symbol.clone(),
            direction: trade.direction,
            quantity: trade.quantity,
        }
    }
}

/// 단일 자산 곡선 데이터 포인트
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// 타임스탬프 (UTC)
    pub timestamp: DateTime<Utc>,

    /// 이 시점까지의 누적 잔고
    pub equity: Money,

    /// 이 포인트의 손익 기여분 (합성 포인트는 0)
    pub pnl: Decimal,

    /// 거래 정보 (합성 포인트는 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<PointTrade>,
}

impl EquityPoint {
    /// 손익 0의 합성 기준점을 생성합니다.
    pub fn synthetic(timestamp: DateTime<Utc>, equity: Money) -> Self {
        Self {
            timestamp,
            equity,
            pnl: Decimal::ZERO,
            trade: None,
        }
    }

    /// 거래에서 생성된 포인트가 아닌지 확인합니다.
    pub fn is_synthetic(&self) -> bool {
        self.trade.is_none()
    }
}

/// 자산 곡선 데이터
///
/// 포인트는 항상 시간순(비내림차순)입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityCurve {
    /// 시작 잔고
    starting_balance: Money,

    /// 시계열 데이터 포인트 (시간순 정렬)
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// 빈 자산 곡선을 생성합니다.
    pub fn new(starting_balance: Money) -> Self {
        Self {
            starting_balance,
            points: Vec::new(),
        }
    }

    /// 이미 시간순으로 정렬된 포인트로 곡선을 생성합니다.
    pub fn from_points(starting_balance: Money, points: Vec<EquityPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        Self {
            starting_balance,
            points,
        }
    }

    /// 시작 잔고를 반환합니다.
    pub fn starting_balance(&self) -> Money {
        self.starting_balance
    }

    /// 모든 데이터 포인트를 반환합니다.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// 첫 포인트.
    pub fn first(&self) -> Option<&EquityPoint> {
        self.points.first()
    }

    /// 마지막 포인트.
    pub fn last(&self) -> Option<&EquityPoint> {
        self.points.last()
    }

    /// 현재 잔고를 반환합니다.
    pub fn current_equity(&self) -> Money {
        self.points
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.starting_balance)
    }

    /// 데이터 포인트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 데이터가 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 연속한 포인트 사이의 구간 수익률(비율)을 반환합니다.
    ///
    /// 이전 잔고가 0인 구간은 제외합니다.
    pub fn period_returns(&self) -> Vec<Decimal> {
        self.points
            .windows(2)
            .filter(|w| !w[0].equity.is_zero())
            .map(|w| (w[1].equity - w[0].equity) / w[0].equity)
            .collect()
    }
}

/// 자산 곡선 빌더
///
/// 시간순으로 정렬된 거래를 순차적으로 추가하여 자산 곡선을 구축합니다.
#[derive(Debug, Clone)]
pub struct EquityCurveBuilder {
    curve: EquityCurve,
}

impl EquityCurveBuilder {
    /// 새로운 빌더를 생성합니다.
    pub fn new(starting_balance: Money) -> Self {
        Self {
            curve: EquityCurve::new(starting_balance),
        }
    }

    /// 현재 잔고로 손익 0의 기준점을 추가합니다.
    pub fn seed(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        let equity = self.curve.current_equity();
        self.curve
            .points
            .push(EquityPoint::synthetic(timestamp, equity));
        self
    }

    /// PnL로 자산 가치를 업데이트합니다.
    ///
    /// # 매개변수
    ///
    /// * `timestamp` - 거래 시각
    /// * `pnl` - 손익 (양수 = 수익, 음수 = 손실)
    pub fn add_pnl(&mut self, timestamp: DateTime<Utc>, pnl: Decimal) -> &mut Self {
        self.push(timestamp, pnl, None)
    }

    /// 거래의 손익과 표시 정보를 추가합니다.
    pub fn add_trade(&mut self, trade: &TradeRecord, pnl: Decimal) -> &mut Self {
        self.push(trade.closed_at, pnl, Some(PointTrade::from(trade)))
    }

    fn push(
        &mut self,
        timestamp: DateTime<Utc>,
        pnl: Decimal,
        trade: Option<PointTrade>,
    ) -> &mut Self {
        let equity = self.curve.current_equity() + pnl;
        self.curve.points.push(EquityPoint {
            timestamp,
            equity,
            pnl,
            trade,
        });
        self
    }

    /// 자산 곡선을 빌드합니다.
    pub fn build(self) -> EquityCurve {
        self.curve
    }
}

/// UTC 기준 해당 날짜의 자정.
pub fn start_of_day(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// 거래 목록에서 자산 곡선을 생성합니다.
///
/// 거래는 청산 시각 오름차순으로 정렬되며, 같은 시각이면 입력 순서를 유지합니다.
/// 첫 포인트는 가장 이른 거래일 자정의 시작 잔고 기준점입니다.
/// 손익이 없는 거래는 제외됩니다. 거래가 없으면 빈 곡선을 반환합니다.
///
/// # 예시
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use journal_analytics::build_equity_curve;
/// use journal_core::{Direction, TradeRecord};
/// use rust_decimal_macros::dec;
/// use uuid::Uuid;
///
/// let ledger = Uuid::new_v4();
/// let at = Utc.with_ymd_and_hms(2025, 1, 10, 15, 0, 0).unwrap();
/// let trades = vec![TradeRecord::with_pnl(ledger, "BTC", Direction::Long, dec!(500), at)];
///
/// let curve = build_equity_curve(dec!(10000), &trades);
/// assert_eq!(curve.len(), 2);
/// assert_eq!(curve.current_equity(), dec!(10500));
/// ```
pub fn build_equity_curve(starting_balance: Money, trades: &[TradeRecord]) -> EquityCurve {
    let mut ordered: Vec<(&TradeRecord, Decimal)> = trades
        .iter()
        .filter_map(|trade| match trade.resolved_pnl() {
            Some(pnl) => Some((trade, pnl)),
            None => {
                warn!(trade_id = %trade.id, symbol = %trade.symbol, "Trade without P&L excluded from equity curve");
                None
            }
        })
        .collect();

    // 안정 정렬: 같은 시각은 입력 순서 유지
    ordered.sort_by_key(|(trade, _)| trade.closed_at);

    let Some((first, _)) = ordered.first() else {
        return EquityCurve::new(starting_balance);
    };

    let mut builder = EquityCurveBuilder::new(starting_balance);
    builder.seed(start_of_day(first.closed_at));
    for (trade, pnl) in &ordered {
        builder.add_trade(trade, *pnl);
    }

    let curve = builder.build();
    debug!(
        trades = ordered.len(),
        points = curve.len(),
        final_equity = %curve.current_equity(),
        "Equity curve built"
    );
    curve
}

/// 여러 계좌의 거래를 하나의 자산 곡선으로 합산합니다.
///
/// 주어진 계좌에 속한 거래만 사용하며, 시작 잔고는 각 계좌 시작 잔고의 합입니다.
pub fn build_aggregate_curve(ledgers: &[Ledger], trades: &[TradeRecord]) -> EquityCurve {
    let ids: HashSet<Uuid> = ledgers.iter().map(|l| l.id).collect();
    let starting_balance: Money = ledgers.iter().map(Ledger::starting_balance).sum();

    let pooled: Vec<TradeRecord> = trades
        .iter()
        .filter(|t| ids.contains(&t.ledger_id))
        .cloned()
        .collect();

    debug!(
        ledgers = ledgers.len(),
        trades = pooled.len(),
        "Aggregating ledger curves"
    );

    build_equity_curve(starting_balance, &pooled)
}
