//! 행 단위 거래 기록 변환.

use std::str::FromStr;

use journal_core::{DateOrder, Direction, ImportConfig, TradeRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::date::parse_date;
use super::mapping::ColumnMapping;
use super::parser::{detect_delimiter, CsvTable};
use super::sanitize::sanitize_text;
use crate::error::Result;

/// 정규화 옵션.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// 구분자 (없으면 자동 감지)
    pub delimiter: Option<char>,
    /// 첫 행이 헤더인지 여부
    pub has_headers: bool,
    /// 모호한 날짜 해석 순서
    pub date_order: DateOrder,
    /// 가져온 거래에 붙일 전략
    pub strategy_id: Option<Uuid>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: true,
            date_order: DateOrder::default(),
            strategy_id: None,
        }
    }
}

impl NormalizeOptions {
    /// 가져오기 설정으로부터 옵션을 생성합니다.
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            delimiter: config.delimiter,
            date_order: config.date_order,
            ..Default::default()
        }
    }
}

/// 정규화 결과.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportOutcome {
    /// 변환된 거래 (입력 행 순서 유지)
    pub trades: Vec<TradeRecord>,
    /// 변환에 성공한 행 수
    pub parsed_rows: usize,
    /// 건너뛴 행 수
    pub skipped_rows: usize,
}

impl ImportOutcome {
    /// 처리한 전체 데이터 행 수.
    pub fn total_rows(&self) -> usize {
        self.parsed_rows + self.skipped_rows
    }
}

/// 구분자 텍스트를 거래 기록으로 변환하는 정규화기.
#[derive(Debug, Clone, Default)]
pub struct CsvNormalizer {
    options: NormalizeOptions,
}

impl CsvNormalizer {
    /// 새 정규화기를 생성합니다.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// 현재 옵션.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// 텍스트를 표로 파싱합니다.
    pub fn parse(&self, text: &str) -> Result<CsvTable> {
        let delimiter = self
            .options
            .delimiter
            .unwrap_or_else(|| detect_delimiter(text));
        CsvTable::parse(text, delimiter, self.options.has_headers)
    }

    /// 파싱, 컬럼 자동 감지, 변환을 한 번에 수행합니다.
    pub fn import(&self, text: &str, ledger_id: Uuid) -> Result<ImportOutcome> {
        let table = self.parse(text)?;
        let mapping = ColumnMapping::auto_detect(&table.headers, table.column_count());
        debug!(?mapping, "Column mapping detected");
        self.normalize(&table, &mapping, ledger_id)
    }

    /// 주어진 매핑으로 표의 각 행을 거래 기록으로 변환합니다.
    ///
    /// 날짜를 해석할 수 없는 행은 건너뛰고 집계만 합니다.
    /// 숫자 셀은 실패하지 않고 0으로 보정됩니다.
    pub fn normalize(
        &self,
        table: &CsvTable,
        mapping: &ColumnMapping,
        ledger_id: Uuid,
    ) -> Result<ImportOutcome> {
        mapping.validate()?;

        let mut outcome = ImportOutcome::default();
        let header_offset = usize::from(self.options.has_headers);

        for (idx, row) in table.rows.iter().enumerate() {
            match self.convert_row(row, mapping, ledger_id) {
                Some(trade) => {
                    outcome.trades.push(trade);
                    outcome.parsed_rows += 1;
                }
                None => {
                    warn!(
                        row = idx + 1 + header_offset,
                        date = ?mapping.date.and_then(|i| row.get(i)).map(String::as_str),
                        "Skipping row with unparseable date"
                    );
                    outcome.skipped_rows += 1;
                }
            }
        }

        debug!(
            parsed = outcome.parsed_rows,
            skipped = outcome.skipped_rows,
            "CSV rows normalized"
        );

        Ok(outcome)
    }

    fn convert_row(
        &self,
        row: &[String],
        mapping: &ColumnMapping,
        ledger_id: Uuid,
    ) -> Option<TradeRecord> {
        let cell = |column: Option<usize>| column.and_then(|i| row.get(i)).map(String::as_str);

        let closed_at = parse_date(cell(mapping.date)?, self.options.date_order)?;

        let symbol = sanitize_text(cell(mapping.symbol).unwrap_or_default());
        let direction = match cell(mapping.direction).map(sanitize_text) {
            Some(raw) => Direction::from_alias(&raw).unwrap_or_else(|| {
                debug!(value = %raw, "Unknown direction, defaulting to long");
                Direction::Long
            }),
            None => Direction::Long,
        };

        let magnitude = |column: Option<usize>| cell(column).map(|v| coerce_decimal(v).abs());

        let mut trade = TradeRecord {
            id: Uuid::new_v4(),
            ledger_id,
            strategy_id: self.options.strategy_id,
            direction,
            symbol,
            quantity: magnitude(mapping.quantity),
            entry_price: magnitude(mapping.entry_price),
            exit_price: magnitude(mapping.exit_price),
            point_value: Decimal::ONE,
            commission: magnitude(mapping.commission).unwrap_or(Decimal::ZERO),
            pnl: None,
            closed_at,
            notes: cell(mapping.notes)
                .map(sanitize_text)
                .filter(|notes| !notes.is_empty()),
        };

        // 손익 셀이 비어 있으면 가격으로 계산
        let raw_pnl = cell(mapping.pnl).unwrap_or_default();
        let pnl = if raw_pnl.trim().is_empty() {
            trade.derived_pnl().unwrap_or(Decimal::ZERO)
        } else {
            coerce_decimal(raw_pnl)
        };
        trade.pnl = Some(pnl);

        Some(trade)
    }
}

/// 숫자 셀을 Decimal로 보정합니다.
///
/// 숫자, `.`, `-` 이외의 문자를 제거한 뒤 파싱하며, 실패하면 0입니다.
///
/// ```
/// use journal_data::coerce_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(coerce_decimal("$1,234.50"), dec!(1234.50));
/// assert_eq!(coerce_decimal("n/a"), dec!(0));
/// ```
pub fn coerce_decimal(value: &str) -> Decimal {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}
