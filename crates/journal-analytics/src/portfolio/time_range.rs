//! 조회 기간(lookback window) 필터.
//!
//! 현재 시각은 항상 호출자가 전달합니다. 같은 곡선, 같은 기간, 같은 `now`이면
//! 결과도 같습니다.

use chrono::{DateTime, Duration, Months, Utc};
use journal_core::{JournalError, TradeRecord};
use serde::{Deserialize, Serialize};

use super::equity_curve::{start_of_day, EquityCurve, EquityPoint};

/// 조회 기간.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackWindow {
    /// 오늘 (UTC 자정부터)
    #[serde(rename = "1D")]
    OneDay,
    /// 최근 7일
    #[serde(rename = "1W")]
    OneWeek,
    /// 최근 1개월
    #[serde(rename = "1M")]
    OneMonth,
    /// 최근 3개월
    #[serde(rename = "3M")]
    ThreeMonths,
    /// 최근 1년
    #[serde(rename = "1Y")]
    OneYear,
    /// 전체
    #[default]
    #[serde(rename = "ALL")]
    All,
}

impl LookbackWindow {
    /// 지원하는 모든 기간.
    pub const ALL_WINDOWS: [LookbackWindow; 6] = [
        LookbackWindow::OneDay,
        LookbackWindow::OneWeek,
        LookbackWindow::OneMonth,
        LookbackWindow::ThreeMonths,
        LookbackWindow::OneYear,
        LookbackWindow::All,
    ];

    /// 표시 코드 (`1D`, `1W`, `1M`, `3M`, `1Y`, `ALL`).
    pub fn code(&self) -> &'static str {
        match self {
            LookbackWindow::OneDay => "1D",
            LookbackWindow::OneWeek => "1W",
            LookbackWindow::OneMonth => "1M",
            LookbackWindow::ThreeMonths => "3M",
            LookbackWindow::OneYear => "1Y",
            LookbackWindow::All => "ALL",
        }
    }

    /// 기간의 시작 시각. 전체 기간이면 `None`.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let months_back = |n: u32| {
            now.checked_sub_months(Months::new(n))
                .unwrap_or(DateTime::<Utc>::MIN_UTC)
        };

        match self {
            LookbackWindow::OneDay => Some(start_of_day(now)),
            LookbackWindow::OneWeek => Some(now - Duration::days(7)),
            LookbackWindow::OneMonth => Some(months_back(1)),
            LookbackWindow::ThreeMonths => Some(months_back(3)),
            LookbackWindow::OneYear => Some(months_back(12)),
            LookbackWindow::All => None,
        }
    }

    /// 시각이 기간 안에 있는지 확인합니다.
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.cutoff(now).map_or(true, |cutoff| timestamp >= cutoff)
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for LookbackWindow {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL_WINDOWS
            .into_iter()
            .find(|w| w.code() == upper)
            .ok_or_else(|| {
                JournalError::InvalidInput(format!(
                    "unknown window '{}', expected one of 1D, 1W, 1M, 3M, 1Y, ALL",
                    s
                ))
            })
    }
}

/// 자산 곡선을 조회 기간으로 자릅니다.
///
/// - 전체 기간이거나 곡선이 비어 있으면 그대로 반환합니다.
/// - 기간 안의 포인트가 없으면 기간 시작 시각에 마지막 잔고를 가진 합성 포인트 하나를 반환합니다.
/// - 첫 포인트가 기간 시작보다 늦고 그 이전 포인트가 있으면, 기간 시작 시각에
///   직전 잔고를 이어받는 합성 포인트를 앞에 추가합니다.
///
/// 비어 있지 않은 곡선은 항상 하나 이상의 포인트를 가진 결과를 반환합니다.
pub fn filter_curve(curve: &EquityCurve, window: LookbackWindow, now: DateTime<Utc>) -> EquityCurve {
    let Some(cutoff) = window.cutoff(now) else {
        return curve.clone();
    };
    if curve.is_empty() {
        return curve.clone();
    }

    let points = curve.points();
    let split = points.partition_point(|p| p.timestamp < cutoff);
    let (before, visible) = points.split_at(split);
    let carried = before.last().map(|p| p.equity);
    let baseline = carried.unwrap_or(curve.starting_balance());

    let Some(first_visible) = visible.first() else {
        // 기간 안에 거래 없음: 마지막 잔고를 평탄하게 표시
        let equity = carried.unwrap_or(curve.current_equity());
        return EquityCurve::from_points(baseline, vec![EquityPoint::synthetic(cutoff, equity)]);
    };

    let mut filtered = Vec::with_capacity(visible.len() + 1);
    if let Some(equity) = carried {
        if first_visible.timestamp > cutoff {
            filtered.push(EquityPoint::synthetic(cutoff, equity));
        }
    }
    filtered.extend_from_slice(visible);

    EquityCurve::from_points(baseline, filtered)
}

/// 조회 기간에 청산된 거래 수.
pub fn count_trades_in_window(
    trades: &[TradeRecord],
    window: LookbackWindow,
    now: DateTime<Utc>,
) -> usize {
    trades
        .iter()
        .filter(|t| window.contains(t.closed_at, now))
        .count()
}

/// 조회 기간에 청산된 거래만 복사합니다.
pub fn trades_in_window(
    trades: &[TradeRecord],
    window: LookbackWindow,
    now: DateTime<Utc>,
) -> Vec<TradeRecord> {
    trades
        .iter()
        .filter(|t| window.contains(t.closed_at, now))
        .cloned()
        .collect()
}
