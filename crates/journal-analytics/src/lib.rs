//! 매매일지 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 자산 곡선 생성 (단일 계좌 / 여러 계좌 합산)
//! - 조회 기간 필터
//! - 성과 지표 계산 (승률, 프로핏 팩터, 샤프 비율, 최대 낙폭, 연속 승/패)
//! - 계좌별 / 전략별 성과 분해
//!
//! 모든 함수는 순수 함수입니다. 입력을 변경하지 않으며 I/O나 전역 상태가 없고,
//! 현재 시각도 인자로 받습니다.

pub mod performance;
pub mod portfolio;

// Performance 모듈 re-exports
pub use performance::breakdown::{
    ledger_breakdown, strategy_breakdown, GroupMetrics, UNASSIGNED_GROUP,
};
pub use performance::metrics::{
    average_loss, average_trade, average_win, expectancy, largest_loss, largest_win,
    max_drawdown, profit_factor, sharpe_ratio, win_rate, DrawdownSummary, PerformanceMetrics,
    ProfitFactor, TRADING_DAYS_PER_YEAR,
};
pub use performance::streaks::{streak_summary, StreakSummary};

// Portfolio 모듈 re-exports
pub use portfolio::equity_curve::{
    build_aggregate_curve, build_equity_curve, start_of_day, EquityCurve, EquityCurveBuilder,
    EquityPoint, PointTrade,
};
pub use portfolio::time_range::{
    count_trades_in_window, filter_curve, trades_in_window, LookbackWindow,
};
