//! 구분자 텍스트를 거래 기록으로 정규화.
//!
//! 처리 흐름: 텍스트 → `CsvTable` (parser) → `ColumnMapping` (mapping)
//! → 행 단위 변환 (normalizer) → `ImportOutcome`.

mod date;
mod mapping;
mod normalizer;
mod parser;
mod sanitize;

pub use date::parse_date;
pub use mapping::ColumnMapping;
pub use normalizer::{coerce_decimal, CsvNormalizer, ImportOutcome, NormalizeOptions};
pub use parser::{detect_delimiter, CsvTable};
pub use sanitize::sanitize_text;
