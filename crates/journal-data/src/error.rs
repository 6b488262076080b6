//! 가져오기 모듈 오류 타입.

use thiserror::Error;

/// 거래 가져오기 관련 오류.
///
/// 행 단위 문제(날짜 파싱 실패 등)는 오류가 아니라 건너뛴 행으로 집계됩니다.
#[derive(Debug, Error)]
pub enum ImportError {
    /// 필수 컬럼(날짜, 손익)이 매핑되지 않음
    #[error("Required column not mapped: {0}")]
    MissingColumn(&'static str),

    /// 입력에 데이터가 없음
    #[error("Empty input")]
    EmptyInput,

    /// 잘못된 컬럼 매핑
    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),

    /// CSV 리더 오류
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// 가져오기 작업을 위한 Result 타입.
pub type Result<T> = std::result::Result<T, ImportError>;
