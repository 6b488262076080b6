//! 매매 손익 계산 공통 로직.
//!
//! 거래 기록과 CSV 가져오기에서 공유하는 P&L 계산 함수를 제공합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::trade::Direction;
use crate::types::{Price, Quantity};

/// 실현 손익 계산 (수수료 차감 전).
///
/// # Arguments
///
/// * `direction` - 포지션 방향
/// * `entry_price` - 진입 가격
/// * `exit_price` - 청산 가격
/// * `quantity` - 거래 수량
/// * `point_value` - 가격 차이에 곱하는 승수 (선물 계약용, 기본 1)
///
/// # Examples
///
/// ```
/// use journal_core::{realized_pnl, Direction};
/// use rust_decimal_macros::dec;
///
/// // 롱: (110 - 100) × 2 × 1 = 20
/// assert_eq!(realized_pnl(Direction::Long, dec!(100), dec!(110), dec!(2), dec!(1)), dec!(20));
/// // 숏: (100 - 110) × 2 × 50 = -1000
/// assert_eq!(realized_pnl(Direction::Short, dec!(100), dec!(110), dec!(2), dec!(50)), dec!(-1000));
/// ```
pub fn realized_pnl(
    direction: Direction,
    entry_price: Price,
    exit_price: Price,
    quantity: Quantity,
    point_value: Decimal,
) -> Decimal {
    let price_diff = match direction {
        // 롱 포지션: 청산가 - 진입가
        Direction::Long => exit_price - entry_price,
        // 숏 포지션: 진입가 - 청산가
        Direction::Short => entry_price - exit_price,
    };

    price_diff * quantity * point_value
}

/// 순손익 계산 (수수료 차감 후).
pub fn net_pnl(gross_pnl: Decimal, commission: Decimal) -> Decimal {
    gross_pnl - commission
}

/// 수익률 계산 (백분율).
///
/// 기준 금액이 0 이하이면 0을 반환합니다.
pub fn return_pct(pnl: Decimal, base: Decimal) -> Decimal {
    if base > Decimal::ZERO {
        (pnl / base) * dec!(100)
    } else {
        Decimal::ZERO
    }
}
