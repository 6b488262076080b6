//! CSV 거래 내역 가져오기 명령어.
//!
//! 증권사/거래소에서 내보낸 CSV를 매매일지 JSON으로 변환합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 자동 감지 (구분자, 컬럼)
//! journal import -i trades.csv -o journal.json
//!
//! # 유럽식 날짜, 세미콜론 구분자
//! journal import -i trades.csv --delimiter ';' --date-order day_first
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use journal_core::{DateOrder, ImportConfig, Ledger};
use journal_data::{CsvNormalizer, ImportOutcome, NormalizeOptions};
use tracing::{info, warn};
use uuid::Uuid;

use super::input::JournalFile;

/// 가져오기 명령 설정
#[derive(Debug, Clone, Default)]
pub struct ImportCliConfig {
    /// CSV 파일 경로
    pub input: PathBuf,
    /// 출력 JSON 경로 (없으면 stdout)
    pub output: Option<PathBuf>,
    /// 거래를 넣을 계좌 (없으면 새 계좌 생성)
    pub ledger_id: Option<Uuid>,
    /// 새 계좌 이름
    pub ledger_name: Option<String>,
    /// 가져온 거래에 붙일 전략
    pub strategy_id: Option<Uuid>,
    /// 구분자 (설정보다 우선)
    pub delimiter: Option<char>,
    /// 날짜 해석 순서 (설정보다 우선)
    pub date_order: Option<DateOrder>,
    /// 첫 행이 데이터인 경우
    pub no_headers: bool,
}

/// CSV 텍스트를 매매일지 파일로 변환합니다.
///
/// 계좌 ID를 지정하지 않으면 CSV 파일 이름으로 새 계좌를 만들어 함께 기록합니다.
pub fn convert_csv(
    text: &str,
    config: &ImportCliConfig,
    defaults: &ImportConfig,
) -> Result<(JournalFile, ImportOutcome)> {
    let mut options = NormalizeOptions::from_config(defaults);
    if config.delimiter.is_some() {
        options.delimiter = config.delimiter;
    }
    if let Some(order) = config.date_order {
        options.date_order = order;
    }
    options.has_headers = !config.no_headers;
    options.strategy_id = config.strategy_id;

    let mut ledgers = Vec::new();
    let ledger_id = match config.ledger_id {
        Some(id) => id,
        None => {
            let name = config
                .ledger_name
                .clone()
                .or_else(|| {
                    config
                        .input
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| "Imported".to_string());
            let ledger = Ledger::new(name);
            let id = ledger.id;
            ledgers.push(ledger);
            id
        }
    };

    let outcome = CsvNormalizer::new(options)
        .import(text, ledger_id)
        .context("Failed to normalize CSV")?;

    let file = JournalFile {
        ledgers,
        strategies: Vec::new(),
        trades: outcome.trades.clone(),
    };
    Ok((file, outcome))
}

/// 가져오기 명령을 실행합니다. 변환된 거래 수를 반환합니다.
pub fn import_csv(config: ImportCliConfig, defaults: &ImportConfig) -> Result<usize> {
    let text = std::fs::read_to_string(&config.input)
        .with_context(|| format!("Failed to read CSV file: {}", config.input.display()))?;

    let (file, outcome) = convert_csv(&text, &config, defaults)?;
    if outcome.skipped_rows > 0 {
        warn!(
            skipped = outcome.skipped_rows,
            total = outcome.total_rows(),
            "Some rows could not be imported"
        );
    }

    let json = serde_json::to_string_pretty(&file)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "Journal written");
            println!("\n가져오기 완료: {} 거래", outcome.parsed_rows);
            println!("건너뛴 행: {}", outcome.skipped_rows);
            println!("저장 위치: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(outcome.parsed_rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_convert_creates_ledger() {
        let config = ImportCliConfig {
            input: PathBuf::from("data/futures_march.csv"),
            ..Default::default()
        };
        let csv = "Date,Symbol,Side,P&L\n2025-03-01,ES,Long,250\nbad,ES,Long,10\n";

        let (file, outcome) = convert_csv(csv, &config, &ImportConfig::default()).unwrap();

        assert_eq!(file.ledgers.len(), 1);
        assert_eq!(file.ledgers[0].name, "futures_march");
        assert_eq!(file.trades.len(), 1);
        assert_eq!(file.trades[0].ledger_id, file.ledgers[0].id);
        assert_eq!(file.trades[0].pnl, Some(dec!(250)));
        assert_eq!(outcome.skipped_rows, 1);
    }

    #[test]
    fn test_convert_into_existing_ledger() {
        let ledger = Uuid::new_v4();
        let strategy = Uuid::new_v4();
        let config = ImportCliConfig {
            ledger_id: Some(ledger),
            strategy_id: Some(strategy),
            delimiter: Some(';'),
            date_order: Some(DateOrder::DayFirst),
            ..Default::default()
        };
        let csv = "Date;Symbol;P&L\n05/03/2025;BTC;-40\n";

        let (file, _) = convert_csv(csv, &config, &ImportConfig::default()).unwrap();

        assert!(file.ledgers.is_empty());
        let trade = &file.trades[0];
        assert_eq!(trade.ledger_id, ledger);
        assert_eq!(trade.strategy_id, Some(strategy));
        assert_eq!(trade.closed_at.format("%Y-%m-%d").to_string(), "2025-03-05");
    }
}
