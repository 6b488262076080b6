//! 매매일지 도메인 모델.

mod calculations;
mod ledger;
mod trade;

pub use calculations::*;
pub use ledger::*;
pub use trade::*;
