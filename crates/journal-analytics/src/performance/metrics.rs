//! 성과 지표 계산 모듈
//!
//! 거래 목록과 자산 곡선에서 성과 지표를 계산합니다:
//! - 승률 (Win Rate): 수익 거래 비율
//! - 프로핏 팩터 (Profit Factor): 총 수익 / 총 손실 비율
//! - 평균 수익/손실, 기대값 (Expectancy)
//! - 샤프 비율 (Sharpe Ratio): 자산 곡선 구간 수익률 기준
//! - 최대 낙폭 (Maximum Drawdown): 고점 대비 최대 하락폭
//! - 연속 승/패 (streaks 모듈)
//!
//! 모든 함수는 실패하지 않습니다. 빈 입력이나 0으로 나누는 경우에는
//! 정의된 대체값(0 또는 무한대)을 반환합니다.
//!
//! # 사용 예시
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use journal_analytics::{build_equity_curve, PerformanceMetrics, ProfitFactor};
//! use journal_core::{Direction, TradeRecord};
//! use rust_decimal_macros::dec;
//! use uuid::Uuid;
//!
//! let ledger = Uuid::new_v4();
//! let at = Utc.with_ymd_and_hms(2025, 1, 10, 15, 0, 0).unwrap();
//! let trades = vec![
//!     TradeRecord::with_pnl(ledger, "AAPL", Direction::Long, dec!(300), at),
//!     TradeRecord::with_pnl(ledger, "TSLA", Direction::Short, dec!(-100), at),
//! ];
//!
//! let curve = build_equity_curve(dec!(10000), &trades);
//! let metrics = PerformanceMetrics::compute(&trades, &curve);
//!
//! assert_eq!(metrics.win_rate_pct, dec!(50));
//! assert_eq!(metrics.profit_factor, ProfitFactor::Value(dec!(3)));
//! ```

use chrono::{DateTime, Utc};
use journal_core::{return_pct, Money, TradeRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::streaks::{streak_summary, StreakSummary};
use crate::portfolio::EquityCurve;

/// 연간 거래일 수 (샤프 비율 연율화에 사용)
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 프로핏 팩터.
///
/// 손실 합계가 0이고 수익이 있으면 무한대입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitFactor {
    /// 유한한 값
    Value(Decimal),
    /// 손실 없이 수익만 있음
    Infinite,
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Value(Decimal::ZERO)
    }
}

impl ProfitFactor {
    /// 유한한 값이면 반환합니다.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            ProfitFactor::Value(v) => Some(*v),
            ProfitFactor::Infinite => None,
        }
    }
}

impl std::fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitFactor::Value(v) => write!(f, "{:.2}", v),
            ProfitFactor::Infinite => write!(f, "∞"),
        }
    }
}

/// 최대 낙폭 정보.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawdownSummary {
    /// 최대 낙폭 금액 (고점 - 저점, 0 이상)
    pub max_drawdown: Decimal,
    /// 최대 낙폭 시점의 고점 대비 비율 (%)
    pub max_drawdown_pct: Decimal,
    /// 최대 낙폭 직전 고점 잔고
    pub peak_equity: Decimal,
    /// 고점 시각
    pub peak_at: Option<DateTime<Utc>>,
    /// 저점 시각
    pub trough_at: Option<DateTime<Utc>>,
}

fn pnls(trades: &[TradeRecord]) -> impl Iterator<Item = Decimal> + '_ {
    trades.iter().filter_map(TradeRecord::resolved_pnl)
}

fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(count)
    }
}

/// 승률 (%): 수익 거래 수 / 전체 거래 수 × 100. 거래가 없으면 0.
pub fn win_rate(trades: &[TradeRecord]) -> Decimal {
    let (wins, total) = pnls(trades).fold((0usize, 0usize), |(w, n), pnl| {
        (w + usize::from(pnl > Decimal::ZERO), n + 1)
    });
    mean(Decimal::from(wins), total) * dec!(100)
}

/// 프로핏 팩터: 수익 합계 / |손실 합계|.
///
/// 손실 합계가 0이면 수익이 있을 때 무한대, 없으면 0입니다.
pub fn profit_factor(trades: &[TradeRecord]) -> ProfitFactor {
    let (gross_profit, gross_loss) = gross_totals(trades);

    if gross_loss.is_zero() {
        if gross_profit > Decimal::ZERO {
            ProfitFactor::Infinite
        } else {
            ProfitFactor::Value(Decimal::ZERO)
        }
    } else {
        ProfitFactor::Value(gross_profit / gross_loss)
    }
}

/// (수익 합계, 손실 합계의 절댓값)
fn gross_totals(trades: &[TradeRecord]) -> (Decimal, Decimal) {
    pnls(trades).fold((Decimal::ZERO, Decimal::ZERO), |(profit, loss), pnl| {
        if pnl > Decimal::ZERO {
            (profit + pnl, loss)
        } else {
            (profit, loss + pnl.abs())
        }
    })
}

/// 수익 거래의 평균 손익. 없으면 0.
pub fn average_win(trades: &[TradeRecord]) -> Decimal {
    let (sum, count) = pnls(trades)
        .filter(|pnl| *pnl > Decimal::ZERO)
        .fold((Decimal::ZERO, 0), |(s, n), pnl| (s + pnl, n + 1));
    mean(sum, count)
}

/// 손실 거래의 평균 손익 (음수). 없으면 0.
pub fn average_loss(trades: &[TradeRecord]) -> Decimal {
    let (sum, count) = pnls(trades)
        .filter(|pnl| *pnl < Decimal::ZERO)
        .fold((Decimal::ZERO, 0), |(s, n), pnl| (s + pnl, n + 1));
    mean(sum, count)
}

/// 전체 거래의 평균 손익. 없으면 0.
pub fn average_trade(trades: &[TradeRecord]) -> Decimal {
    let (sum, count) = pnls(trades).fold((Decimal::ZERO, 0), |(s, n), pnl| (s + pnl, n + 1));
    mean(sum, count)
}

/// 기대값: 승률 × 평균 수익 + (1 − 승률) × 평균 손실.
///
/// 여기서 승률은 0~1 비율입니다. 평균 손실이 음수이므로 두 번째 항은 음수입니다.
pub fn expectancy(trades: &[TradeRecord]) -> Decimal {
    let win_fraction = win_rate(trades) / dec!(100);
    win_fraction * average_win(trades) + (Decimal::ONE - win_fraction) * average_loss(trades)
}

/// 최대 단일 수익. 수익 거래가 없으면 0.
pub fn largest_win(trades: &[TradeRecord]) -> Decimal {
    pnls(trades)
        .filter(|pnl| *pnl > Decimal::ZERO)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// 최대 단일 손실 (음수). 손실 거래가 없으면 0.
pub fn largest_loss(trades: &[TradeRecord]) -> Decimal {
    pnls(trades)
        .filter(|pnl| *pnl < Decimal::ZERO)
        .min()
        .unwrap_or(Decimal::ZERO)
}

/// 샤프 비율을 계산합니다.
///
/// # 계산 공식
///
/// Sharpe = 평균(구간 수익률) / 표준편차(구간 수익률) × √252
///
/// 구간 수익률은 자산 곡선의 연속한 포인트 사이에서 계산합니다
/// (`(equity[i] - equity[i-1]) / equity[i-1]`). 표준편차는 모표준편차입니다.
/// 포인트가 2개 미만이거나 표준편차가 0이면 0을 반환합니다.
pub fn sharpe_ratio(curve: &EquityCurve) -> Decimal {
    if curve.len() < 2 {
        return Decimal::ZERO;
    }

    let returns = curve.period_returns();
    if returns.is_empty() {
        return Decimal::ZERO;
    }

    let n = Decimal::from(returns.len());
    let mean_return = returns.iter().copied().sum::<Decimal>() / n;

    // 분산 계산: Σ(ri - mean)² / n
    let variance = returns
        .iter()
        .map(|r| {
            let diff = *r - mean_return;
            diff * diff
        })
        .sum::<Decimal>()
        / n;

    let std_dev = decimal_sqrt(variance);
    if std_dev.is_zero() {
        return Decimal::ZERO;
    }

    let annualization = decimal_sqrt(Decimal::from(TRADING_DAYS_PER_YEAR));
    (mean_return / std_dev) * annualization
}

/// 자산 곡선에서 최대 낙폭을 계산합니다.
///
/// 고점은 새로운 최고 잔고가 나올 때마다 갱신되며, 낙폭 금액이 가장 컸던
/// 시점의 고점/저점 정보를 기록합니다.
///
/// # 예시
///
/// 잔고 10000 → 10500(고점) → 9800(저점) → 10200
/// 최대 낙폭 = 700, 비율 = 700 / 10500 × 100 ≈ 6.67%
pub fn max_drawdown(curve: &EquityCurve) -> DrawdownSummary {
    let Some(first) = curve.first() else {
        return DrawdownSummary::default();
    };

    let mut summary = DrawdownSummary {
        peak_equity: first.equity,
        ..Default::default()
    };
    let mut peak = first.equity;
    let mut peak_at = first.timestamp;

    for point in curve.points() {
        // 새로운 고점 갱신
        if point.equity > peak {
            peak = point.equity;
            peak_at = point.timestamp;
        }

        let drawdown = peak - point.equity;
        if drawdown > summary.max_drawdown {
            summary.max_drawdown = drawdown;
            summary.max_drawdown_pct = if peak > Decimal::ZERO {
                drawdown / peak * dec!(100)
            } else {
                Decimal::ZERO
            };
            summary.peak_equity = peak;
            summary.peak_at = Some(peak_at);
            summary.trough_at = Some(point.timestamp);
        }
    }

    summary
}

/// Decimal 타입의 제곱근을 뉴턴 방법으로 계산합니다.
///
/// 1. 초기 추정값 = value / 2
/// 2. 반복: next = (guess + value/guess) / 2
/// 3. 변화량이 추정값의 10^-12 배 이하가 될 때까지 반복 (최대 100회)
fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut guess = value / Decimal::TWO;
    let tolerance = Decimal::new(1, 12);

    for _ in 0..100 {
        let next_guess = (guess + value / guess) / Decimal::TWO;
        if (next_guess - guess).abs() <= next_guess * tolerance {
            return next_guess;
        }
        guess = next_guess;
    }

    guess
}

/// 성과 지표 모음.
///
/// 거래 목록과 해당 자산 곡선에서 한 번에 계산한 값입니다.
/// 연속 기록과 낙폭 정보는 직렬화 시 평탄하게 펼쳐집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// 총 거래 횟수 (손익이 있는 거래)
    pub total_trades: usize,
    /// 수익 거래 횟수
    pub winning_trades: usize,
    /// 손실 거래 횟수
    pub losing_trades: usize,
    /// 손익 0 거래 횟수
    pub break_even_trades: usize,

    /// 승률 (%)
    pub win_rate_pct: Decimal,
    /// 프로핏 팩터
    pub profit_factor: ProfitFactor,

    /// 평균 수익 (수익 거래만)
    pub avg_win: Decimal,
    /// 평균 손실 (손실 거래만, 음수)
    pub avg_loss: Decimal,
    /// 거래당 평균 손익
    pub avg_trade: Decimal,
    /// 기대값
    pub expectancy: Decimal,

    /// 최대 수익 거래
    pub largest_win: Decimal,
    /// 최대 손실 거래 (음수)
    pub largest_loss: Decimal,

    /// 총 수익 (수익 거래 합계)
    pub gross_profit: Decimal,
    /// 총 손실 (손실 거래 합계, 양수로 표시)
    pub gross_loss: Decimal,
    /// 순손익
    pub net_pnl: Decimal,
    /// 총 수수료
    pub total_commission: Decimal,

    /// 시작 잔고
    pub starting_balance: Money,
    /// 최종 잔고
    pub ending_balance: Money,
    /// 시작 잔고 대비 수익률 (%)
    pub return_pct: Decimal,

    /// 샤프 비율
    pub sharpe_ratio: Decimal,

    /// 최대 낙폭
    #[serde(flatten)]
    pub drawdown: DrawdownSummary,

    /// 연속 승/패
    #[serde(flatten)]
    pub streaks: StreakSummary,
}

impl PerformanceMetrics {
    /// 거래 목록과 자산 곡선에서 모든 지표를 계산합니다.
    ///
    /// 곡선은 같은 거래 목록으로 만든 것이어야 합니다.
    /// 시작 잔고는 곡선에서 가져옵니다.
    pub fn compute(trades: &[TradeRecord], curve: &EquityCurve) -> Self {
        let (gross_profit, gross_loss) = gross_totals(trades);
        let net_pnl = gross_profit - gross_loss;

        let mut metrics = Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            break_even_trades: 0,
            win_rate_pct: win_rate(trades),
            profit_factor: profit_factor(trades),
            avg_win: average_win(trades),
            avg_loss: average_loss(trades),
            avg_trade: average_trade(trades),
            expectancy: expectancy(trades),
            largest_win: largest_win(trades),
            largest_loss: largest_loss(trades),
            gross_profit,
            gross_loss,
            net_pnl,
            total_commission: trades
                .iter()
                .filter(|t| t.resolved_pnl().is_some())
                .map(|t| t.commission)
                .sum(),
            starting_balance: curve.starting_balance(),
            ending_balance: curve.starting_balance() + net_pnl,
            return_pct: return_pct(net_pnl, curve.starting_balance()),
            sharpe_ratio: sharpe_ratio(curve),
            drawdown: max_drawdown(curve),
            streaks: streak_summary(trades),
        };

        for pnl in pnls(trades) {
            metrics.total_trades += 1;
            if pnl > Decimal::ZERO {
                metrics.winning_trades += 1;
            } else if pnl < Decimal::ZERO {
                metrics.losing_trades += 1;
            } else {
                metrics.break_even_trades += 1;
            }
        }

        debug!(
            trades = metrics.total_trades,
            win_rate = %metrics.win_rate_pct,
            net_pnl = %metrics.net_pnl,
            "Performance metrics computed"
        );

        metrics
    }

    /// 거래 목록에서 자산 곡선을 만들고 지표를 계산합니다.
    pub fn from_trades(trades: &[TradeRecord], starting_balance: Money) -> Self {
        let curve = crate::portfolio::build_equity_curve(starting_balance, trades);
        Self::compute(trades, &curve)
    }

    /// 표시할 거래가 있는지 확인합니다.
    pub fn has_trades(&self) -> bool {
        self.total_trades > 0
    }

    /// 순손익이 양수이고 프로핏 팩터가 1보다 큰지 확인합니다.
    pub fn is_profitable(&self) -> bool {
        let factor_ok = match self.profit_factor {
            ProfitFactor::Value(v) => v > Decimal::ONE,
            ProfitFactor::Infinite => true,
        };
        self.net_pnl > Decimal::ZERO && factor_ok
    }

    /// 성과 요약을 문자열로 반환합니다.
    ///
    /// 대시보드나 로그 출력용 한 줄 요약입니다.
    pub fn summary(&self) -> String {
        format!(
            "거래: {} | 승률: {:.1}% | PF: {} | 샤프: {:.2} | MDD: {:.1}% | 순익: {:.2}",
            self.total_trades,
            self.win_rate_pct,
            self.profit_factor,
            self.sharpe_ratio,
            self.drawdown.max_drawdown_pct,
            self.net_pnl
        )
    }
}
