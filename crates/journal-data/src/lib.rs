//! 거래 기록 가져오기.
//!
//! 이 crate는 다음을 제공합니다:
//! - 구분자 자동 감지를 포함한 CSV 파서
//! - 다국어 헤더 기반 컬럼 자동 매핑
//! - 날짜 파싱, 숫자 보정, HTML 제거
//! - 행 단위 변환으로 `TradeRecord` 생성

pub mod csv;
pub mod error;

pub use error::{ImportError, Result};

pub use crate::csv::{
    coerce_decimal, detect_delimiter, parse_date, sanitize_text, ColumnMapping, CsvNormalizer,
    CsvTable, ImportOutcome, NormalizeOptions,
};
