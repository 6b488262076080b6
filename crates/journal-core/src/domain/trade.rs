//! 거래 기록.
//!
//! 이 모듈은 청산 완료된 거래 관련 타입을 정의합니다:
//! - `Direction` - 포지션 방향 (롱/숏)
//! - `TradeRecord` - 분석의 입력 단위인 개별 거래 기록

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calculations::{net_pnl, realized_pnl};
use crate::error::{JournalError, JournalResult};
use crate::types::{Price, Quantity};

/// 포지션 방향.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 롱 (가격 상승 시 수익)
    #[default]
    Long,
    /// 숏 (가격 하락 시 수익)
    Short,
}

impl Direction {
    /// 다양한 표기(영문, 한글, 중문, 일문)를 방향으로 해석합니다.
    ///
    /// 가져오기 경계에서 한 번만 사용되며, 알 수 없는 표기는 `None`을 반환합니다.
    pub fn from_alias(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        match normalized.as_str() {
            "long" | "l" | "buy" | "b" | "bto" | "多" | "做多" | "买" | "买入" | "매수"
            | "롱" | "買い" | "ロング" => Some(Self::Long),
            "short" | "s" | "sell" | "sto" | "空" | "做空" | "卖" | "卖出" | "매도" | "숏"
            | "売り" | "ショート" => Some(Self::Short),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_alias(s)
            .ok_or_else(|| JournalError::InvalidInput(format!("unknown direction: {}", s)))
    }
}

fn default_point_value() -> Decimal {
    Decimal::ONE
}

/// 청산 완료된 하나의 포지션.
///
/// 저장소 포맷의 별칭 필드(`ticker`, `type`, `date`)는 역직렬화 시점에
/// 정규 필드로 해석됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 거래 ID
    pub id: Uuid,
    /// 소속 계좌 ID
    pub ledger_id: Uuid,
    /// 전략 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<Uuid>,
    /// 포지션 방향
    #[serde(alias = "type")]
    pub direction: Direction,
    /// 종목 식별자
    #[serde(alias = "ticker")]
    pub symbol: String,
    /// 수량 (손익만 입력한 기록은 없음)
    #[serde(default)]
    pub quantity: Option<Quantity>,
    /// 진입 가격
    #[serde(default)]
    pub entry_price: Option<Price>,
    /// 청산 가격
    #[serde(default)]
    pub exit_price: Option<Price>,
    /// 포인트 가치 (가격 차이 승수)
    #[serde(default = "default_point_value")]
    pub point_value: Decimal,
    /// 수수료
    #[serde(default)]
    pub commission: Decimal,
    /// 실현 손익 (수수료 차감 후)
    #[serde(default)]
    pub pnl: Option<Decimal>,
    /// 청산 시각 (유일한 정렬 키)
    #[serde(alias = "date")]
    pub closed_at: DateTime<Utc>,
    /// 메모
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TradeRecord {
    /// 손익만 입력한 거래 기록을 생성합니다.
    pub fn with_pnl(
        ledger_id: Uuid,
        symbol: impl Into<String>,
        direction: Direction,
        pnl: Decimal,
        closed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ledger_id,
            strategy_id: None,
            direction,
            symbol: symbol.into(),
            quantity: None,
            entry_price: None,
            exit_price: None,
            point_value: Decimal::ONE,
            commission: Decimal::ZERO,
            pnl: Some(pnl),
            closed_at,
            notes: None,
        }
    }

    /// 진입/청산 가격으로 거래 기록을 생성하고 손익을 계산합니다.
    pub fn from_prices(
        ledger_id: Uuid,
        symbol: impl Into<String>,
        direction: Direction,
        entry_price: Price,
        exit_price: Price,
        quantity: Quantity,
        closed_at: DateTime<Utc>,
    ) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            ledger_id,
            strategy_id: None,
            direction,
            symbol: symbol.into(),
            quantity: Some(quantity),
            entry_price: Some(entry_price),
            exit_price: Some(exit_price),
            point_value: Decimal::ONE,
            commission: Decimal::ZERO,
            pnl: None,
            closed_at,
            notes: None,
        };
        record.pnl = record.derived_pnl();
        record
    }

    /// 전략을 설정합니다.
    pub fn with_strategy(mut self, strategy_id: Uuid) -> Self {
        self.strategy_id = Some(strategy_id);
        self
    }

    /// 수수료를 설정합니다. 가격 기반 기록이면 손익을 다시 계산합니다.
    pub fn with_commission(mut self, commission: Decimal) -> Self {
        self.commission = commission;
        if let Some(pnl) = self.derived_pnl() {
            self.pnl = Some(pnl);
        }
        self
    }

    /// 포인트 가치를 설정합니다. 가격 기반 기록이면 손익을 다시 계산합니다.
    pub fn with_point_value(mut self, point_value: Decimal) -> Self {
        self.point_value = point_value;
        if let Some(pnl) = self.derived_pnl() {
            self.pnl = Some(pnl);
        }
        self
    }

    /// 메모를 설정합니다.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 가격과 수량으로부터 손익을 계산합니다.
    ///
    /// 진입가, 청산가, 수량 중 하나라도 없으면 `None`.
    pub fn derived_pnl(&self) -> Option<Decimal> {
        let entry = self.entry_price?;
        let exit = self.exit_price?;
        let quantity = self.quantity?;

        let gross = realized_pnl(self.direction, entry, exit, quantity, self.point_value);
        Some(net_pnl(gross, self.commission))
    }

    /// 분석에 사용할 손익.
    ///
    /// 저장된 손익이 우선이며, 없으면 가격 기반 계산 값을 사용합니다.
    pub fn resolved_pnl(&self) -> Option<Decimal> {
        self.pnl.or_else(|| self.derived_pnl())
    }

    /// 편집 후 손익을 가격 기반으로 다시 계산합니다.
    pub fn recompute_pnl(&mut self) -> JournalResult<Decimal> {
        let pnl = self.derived_pnl().ok_or_else(|| {
            JournalError::MissingPnl(format!(
                "{} ({}): entry/exit price and quantity are required",
                self.id, self.symbol
            ))
        })?;
        self.pnl = Some(pnl);
        Ok(pnl)
    }

    /// 크기 값(수량, 가격, 수수료)이 음수가 아닌지 검증합니다.
    pub fn validate(&self) -> JournalResult<()> {
        let magnitudes = [
            ("quantity", self.quantity),
            ("entry_price", self.entry_price),
            ("exit_price", self.exit_price),
            ("commission", Some(self.commission)),
        ];

        for (field, value) in magnitudes {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    return Err(JournalError::InvalidInput(format!(
                        "{} must be non-negative, got {}",
                        field, v
                    )));
                }
            }
        }

        Ok(())
    }
}

/// 손익이 정의된 거래만 남깁니다.
///
/// 분석 파이프라인에 들어가는 모든 거래는 숫자 손익을 가져야 합니다.
/// 저장된 손익이 없으면 가격 기반 값으로 채웁니다.
pub fn analyzable(trades: &[TradeRecord]) -> Vec<TradeRecord> {
    trades
        .iter()
        .filter_map(|trade| {
            let pnl = trade.resolved_pnl()?;
            let mut trade = trade.clone();
            trade.pnl = Some(pnl);
            Some(trade)
        })
        .collect()
}
