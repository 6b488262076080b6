//! 자산 곡선 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 기간 자산 곡선 (JSON)
//! journal curve -i journal.json
//!
//! # 최근 1개월, 특정 계좌만
//! journal curve -i journal.json -w 1M --ledger 0b8e1f3c-2a4d-4e6f-8a1b-3c5d7e9f1a2b
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use journal_analytics::{
    build_aggregate_curve, build_equity_curve, filter_curve, EquityCurve, LookbackWindow,
};
use journal_core::Money;
use tracing::{debug, info};
use uuid::Uuid;

use super::input::JournalFile;

/// 곡선 명령 설정
#[derive(Debug, Clone)]
pub struct CurveCliConfig {
    /// 매매일지 JSON 경로
    pub input: PathBuf,
    /// 출력 경로 (없으면 stdout)
    pub output: Option<PathBuf>,
    /// 조회 기간
    pub window: LookbackWindow,
    /// 기준 시각
    pub now: DateTime<Utc>,
    /// 계좌 정보가 없을 때의 시작 잔고
    pub starting_balance: Money,
    /// 합산할 계좌 (비어 있으면 전체)
    pub ledgers: Vec<Uuid>,
}

/// 매매일지에서 전체 기간 자산 곡선을 만듭니다.
///
/// 파일에 계좌 정보가 있으면 선택한 계좌들을 합산하고, 없으면
/// 주어진 시작 잔고로 모든 거래를 사용합니다.
pub fn journal_curve(file: &JournalFile, ledger_ids: &[Uuid], fallback: Money) -> EquityCurve {
    let trades = file.analyzable_trades();

    if file.ledgers.is_empty() {
        let selected: Vec<_> = trades
            .into_iter()
            .filter(|t| ledger_ids.is_empty() || ledger_ids.contains(&t.ledger_id))
            .collect();
        return build_equity_curve(fallback, &selected);
    }

    let ledgers = file.select_ledgers(ledger_ids);
    debug!(ledgers = ledgers.len(), "Building aggregate curve");
    build_aggregate_curve(&ledgers, &trades)
}

/// 곡선 명령을 실행합니다. 출력한 포인트 수를 반환합니다.
pub fn print_curve(config: CurveCliConfig) -> Result<usize> {
    let file = JournalFile::load(&config.input)?;
    let full = journal_curve(&file, &config.ledgers, config.starting_balance);
    let curve = filter_curve(&full, config.window, config.now);

    info!(
        window = %config.window,
        points = curve.len(),
        equity = %curve.current_equity(),
        "Equity curve ready"
    );

    let json = serde_json::to_string_pretty(&curve)?;
    match &config.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            println!("\n자산 곡선 저장 완료: {} 포인트", curve.len());
            println!("저장 위치: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(curve.len())
}
