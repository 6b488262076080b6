//! 매매일지 시스템의 에러 타입.
//!
//! 분석 함수는 에러를 반환하지 않습니다. 이 타입은 입력 경계
//! (설정 로드, 레코드 생성, 직렬화)에서만 사용됩니다.

use thiserror::Error;

/// 핵심 매매일지 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 손익 값이 없는 거래 기록
    #[error("손익이 정의되지 않은 거래: {0}")]
    MissingPnl(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 매매일지 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}
