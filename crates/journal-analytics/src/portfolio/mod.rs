//! 포트폴리오 분석 모듈
//!
//! 거래 기록에서 자산 곡선을 만들고 조회 기간에 맞게 자릅니다.
//!
//! # 모듈 구성
//!
//! - [`equity_curve`]: 자산 곡선 생성 (단일 계좌 / 여러 계좌 합산)
//! - [`time_range`]: 조회 기간 필터 및 기간별 거래 수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use journal_analytics::portfolio::{build_equity_curve, filter_curve, LookbackWindow};
//! use rust_decimal_macros::dec;
//!
//! let curve = build_equity_curve(dec!(10000), &trades);
//! let month = filter_curve(&curve, LookbackWindow::OneMonth, Utc::now());
//! ```

pub mod equity_curve;
pub mod time_range;

pub use equity_curve::*;
pub use time_range::*;
