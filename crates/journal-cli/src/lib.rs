//! 매매일지 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - CSV 거래 내역 가져오기
//! - 자산 곡선 출력
//! - 성과 리포트 (전체 / 계좌별 / 전략별)

pub mod commands;

pub use commands::*;
