//! 구분자 텍스트 파서.

use ::csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{ImportError, Result};

/// 자동 감지 대상 구분자 (동률이면 앞쪽 우선).
const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// 파싱된 표 형태의 입력.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// 헤더 행 (헤더 없는 입력이면 비어 있음)
    pub headers: Vec<String>,
    /// 데이터 행 (빈 행 제외)
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// 텍스트를 파싱합니다.
    ///
    /// 따옴표로 감싼 필드 안의 구분자는 필드의 일부로 취급합니다.
    /// 행마다 컬럼 수가 달라도 허용합니다.
    pub fn parse(text: &str, delimiter: char, has_headers: bool) -> Result<Self> {
        if !delimiter.is_ascii() {
            return Err(ImportError::InvalidMapping(format!(
                "delimiter must be a single ASCII character: {:?}",
                delimiter
            )));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(delimiter as u8)
            .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            records.push(row);
        }

        if records.is_empty() {
            return Err(ImportError::EmptyInput);
        }

        let headers = if has_headers {
            records.remove(0)
        } else {
            Vec::new()
        };

        debug!(
            delimiter = ?delimiter,
            columns = headers.len(),
            rows = records.len(),
            "CSV parsed"
        );

        Ok(Self {
            headers,
            rows: records,
        })
    }

    /// 표의 최대 컬럼 수.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// 첫 번째 비어 있지 않은 줄에서 구분자를 추정합니다.
///
/// 따옴표 밖에서 가장 많이 등장한 후보를 선택하고, 없으면 쉼표를 사용합니다.
pub fn detect_delimiter(text: &str) -> char {
    let Some(first_line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return ',';
    };

    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    for ch in first_line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(idx) = DELIMITER_CANDIDATES.iter().position(|&c| c == ch) {
            counts[idx] += 1;
        }
    }

    let mut best = (',', 0usize);
    for (candidate, count) in DELIMITER_CANDIDATES.iter().zip(counts) {
        if count > best.1 {
            best = (*candidate, count);
        }
    }
    best.0
}
