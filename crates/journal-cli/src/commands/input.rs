//! 매매일지 JSON 입력 파일.
//!
//! 거래 배열만 있는 파일과 계좌/전략 목록을 포함한 파일을 모두 받습니다.
//!
//! ```json
//! { "ledgers": [...], "strategies": [...], "trades": [...] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use journal_core::{analyzable, Ledger, Strategy, TradeRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// 매매일지 파일 내용.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalFile {
    /// 계좌 목록
    #[serde(default)]
    pub ledgers: Vec<Ledger>,
    /// 전략 목록
    #[serde(default)]
    pub strategies: Vec<Strategy>,
    /// 거래 목록
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JournalDocument {
    Trades(Vec<TradeRecord>),
    Journal(JournalFile),
}

impl JournalFile {
    /// JSON 문자열을 파싱합니다.
    ///
    /// 음수 수량/가격/수수료를 가진 거래가 있으면 에러를 반환합니다.
    pub fn from_json(text: &str) -> Result<Self> {
        let document: JournalDocument =
            serde_json::from_str(text).context("Failed to parse journal JSON")?;

        let file = match document {
            JournalDocument::Trades(trades) => Self {
                trades,
                ..Default::default()
            },
            JournalDocument::Journal(file) => file,
        };

        for trade in &file.trades {
            trade
                .validate()
                .with_context(|| format!("Invalid trade {}", trade.id))?;
        }
        Ok(file)
    }

    /// 파일에서 로드합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read journal file: {}", path.display()))?;
        let file = Self::from_json(&text)
            .with_context(|| format!("Invalid journal file: {}", path.display()))?;

        debug!(
            ledgers = file.ledgers.len(),
            strategies = file.strategies.len(),
            trades = file.trades.len(),
            "Journal loaded"
        );
        Ok(file)
    }

    /// 손익이 정해진 거래만 반환합니다.
    pub fn analyzable_trades(&self) -> Vec<TradeRecord> {
        let trades = analyzable(&self.trades);
        let dropped = self.trades.len() - trades.len();
        if dropped > 0 {
            warn!(dropped, "Trades without P&L excluded from analysis");
        }
        trades
    }

    /// 선택한 계좌만 반환합니다. 선택이 비어 있으면 전체 계좌.
    pub fn select_ledgers(&self, ids: &[Uuid]) -> Vec<Ledger> {
        if ids.is_empty() {
            return self.ledgers.clone();
        }
        self.ledgers
            .iter()
            .filter(|l| ids.contains(&l.id))
            .cloned()
            .collect()
    }
}
