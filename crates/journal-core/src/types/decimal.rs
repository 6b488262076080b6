//! 금액/가격/수량 타입 별칭.
//!
//! 모든 금액 계산은 부동소수점 오차를 피하기 위해 `Decimal`을 사용합니다.

use rust_decimal::Decimal;

/// 금융 정밀도를 위한 가격 타입.
pub type Price = Decimal;

/// 거래 수량을 위한 타입.
pub type Quantity = Decimal;

/// 금액(잔고, 손익) 타입.
pub type Money = Decimal;
