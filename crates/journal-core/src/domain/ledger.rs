//! 계좌(장부) 및 전략 태그.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Money;

/// 초기 잔고가 지정되지 않은 계좌의 시작 잔고.
pub const DEFAULT_STARTING_BALANCE: Money = dec!(10000);

/// 계좌 자산 유형.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// 주식
    Stock,
    /// 선물
    Futures,
    /// 암호화폐
    Crypto,
    /// 외환
    Forex,
    /// 기타
    #[default]
    Other,
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetType::Stock => "stock",
            AssetType::Futures => "futures",
            AssetType::Crypto => "crypto",
            AssetType::Forex => "forex",
            AssetType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// 거래 기록이 속하는 계좌.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// 계좌 ID
    pub id: Uuid,
    /// 계좌 이름
    pub name: String,
    /// 초기 잔고
    #[serde(default)]
    pub initial_balance: Option<Money>,
    /// 자산 유형
    #[serde(default)]
    pub asset_type: AssetType,
}

impl Ledger {
    /// 새 계좌를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_balance: None,
            asset_type: AssetType::default(),
        }
    }

    /// 초기 잔고를 설정합니다.
    pub fn with_initial_balance(mut self, balance: Money) -> Self {
        self.initial_balance = Some(balance);
        self
    }

    /// 자산 유형을 설정합니다.
    pub fn with_asset_type(mut self, asset_type: AssetType) -> Self {
        self.asset_type = asset_type;
        self
    }

    /// 자산 곡선의 시작 잔고.
    ///
    /// 초기 잔고가 없으면 `DEFAULT_STARTING_BALANCE`를 사용합니다.
    pub fn starting_balance(&self) -> Money {
        self.initial_balance.unwrap_or(DEFAULT_STARTING_BALANCE)
    }
}

/// 거래에 붙이는 전략 태그.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    /// 전략 ID
    pub id: Uuid,
    /// 전략 이름
    pub name: String,
    /// 설명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Strategy {
    /// 새 전략 태그를 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
        }
    }

    /// 설명을 설정합니다.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
