//! 성과 분석 모듈
//!
//! # 모듈 구성
//!
//! - [`metrics`]: 성과 지표 계산 (승률, 프로핏 팩터, 샤프 비율, 최대 낙폭 등)
//! - [`streaks`]: 연속 승/패 통계
//! - [`breakdown`]: 계좌별 / 전략별 성과 분해

pub mod breakdown;
pub mod metrics;
pub mod streaks;

pub use breakdown::*;
pub use metrics::*;
pub use streaks::*;
