//! 컬럼 매핑 및 헤더 자동 감지.

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

// 필드별 헤더 키워드 (영문, 중문, 한글, 일문). 소문자 부분 일치.
const DATE_KEYWORDS: &[&str] = &[
    "date", "time", "日期", "时间", "時間", "날짜", "일자", "일시", "日付", "日時",
];
const SYMBOL_KEYWORDS: &[&str] = &[
    "symbol", "ticker", "instrument", "asset", "pair", "品种", "代码", "标的", "종목", "티커",
    "銘柄",
];
const DIRECTION_KEYWORDS: &[&str] = &[
    "direction", "side", "type", "方向", "买卖", "방향", "구분", "포지션", "売買",
];
const ENTRY_KEYWORDS: &[&str] = &[
    "entry", "open", "buy price", "开仓", "进场", "入场", "진입", "매수가", "建値", "エントリー",
];
const EXIT_KEYWORDS: &[&str] = &[
    "exit", "close", "sell price", "平仓", "出场", "청산", "매도가", "決済", "エグジット",
];
const QUANTITY_KEYWORDS: &[&str] = &[
    "qty", "quantity", "size", "volume", "shares", "contracts", "lots", "数量", "手数", "수량",
    "数量",
];
const PNL_KEYWORDS: &[&str] = &[
    "pnl", "p&l", "p/l", "profit", "gain", "net", "result", "盈亏", "收益", "손익", "수익",
    "損益",
];
const COMMISSION_KEYWORDS: &[&str] = &[
    "commission", "fee", "cost", "手续费", "佣金", "수수료", "手数料",
];
const NOTES_KEYWORDS: &[&str] = &[
    "note", "memo", "comment", "备注", "메모", "비고", "メモ",
];

/// 필드별 컬럼 인덱스.
///
/// `None`은 해당 필드를 사용하지 않음을 의미합니다.
/// 날짜와 손익은 필수입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub date: Option<usize>,
    pub symbol: Option<usize>,
    pub direction: Option<usize>,
    pub entry_price: Option<usize>,
    pub exit_price: Option<usize>,
    pub quantity: Option<usize>,
    pub pnl: Option<usize>,
    pub commission: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnMapping {
    /// 헤더 이름으로 매핑을 추정합니다.
    ///
    /// 날짜 키워드가 들어간 헤더는 날짜 후보로만 쓰입니다. 청산 시각이
    /// 기준이므로 `Exit Date`, `Close Time` 같은 헤더가 `Entry Date`보다
    /// 우선하고, 없으면 첫 날짜 헤더를 사용합니다.
    ///
    /// 나머지 필드는 키워드에 처음 일치하는 헤더를 사용하며, 이미 다른 필드가
    /// 차지한 컬럼은 건너뜁니다. 날짜, 종목, 손익이 일치하지 않으면
    /// 위치 기본값(0, 1, 마지막 컬럼)을 사용합니다.
    pub fn auto_detect(headers: &[String], column_count: usize) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let is_date: Vec<bool> = normalized
            .iter()
            .map(|h| matches_any(h, DATE_KEYWORDS))
            .collect();

        let date = normalized
            .iter()
            .enumerate()
            .position(|(idx, h)| is_date[idx] && matches_any(h, EXIT_KEYWORDS))
            .or_else(|| is_date.iter().position(|&d| d));

        let mut claimed = vec![false; normalized.len()];
        if let Some(idx) = date {
            claimed[idx] = true;
        }

        let mut claim = |keywords: &[&str]| -> Option<usize> {
            let idx = normalized.iter().enumerate().position(|(idx, header)| {
                !claimed[idx] && !is_date[idx] && matches_any(header, keywords)
            })?;
            claimed[idx] = true;
            Some(idx)
        };

        let mut mapping = Self {
            date,
            symbol: claim(SYMBOL_KEYWORDS),
            direction: claim(DIRECTION_KEYWORDS),
            entry_price: claim(ENTRY_KEYWORDS),
            exit_price: claim(EXIT_KEYWORDS),
            quantity: claim(QUANTITY_KEYWORDS),
            pnl: claim(PNL_KEYWORDS),
            commission: claim(COMMISSION_KEYWORDS),
            notes: claim(NOTES_KEYWORDS),
        };

        if column_count > 0 {
            if mapping.date.is_none() && !mapping.uses(0) {
                mapping.date = Some(0);
            }
            if mapping.symbol.is_none() && column_count > 1 && !mapping.uses(1) {
                mapping.symbol = Some(1);
            }
            let last = column_count - 1;
            let last_is_date = is_date.get(last).copied().unwrap_or(false);
            if mapping.pnl.is_none() && !mapping.uses(last) && !last_is_date {
                mapping.pnl = Some(last);
            }
        }

        mapping
    }

    /// 필수 필드(날짜, 손익)가 매핑되었는지 검증합니다.
    pub fn validate(&self) -> Result<()> {
        if self.date.is_none() {
            return Err(ImportError::MissingColumn("date"));
        }
        if self.pnl.is_none() {
            return Err(ImportError::MissingColumn("pnl"));
        }
        Ok(())
    }

    /// 해당 컬럼이 이미 어떤 필드에 매핑되었는지 확인합니다.
    pub fn uses(&self, column: usize) -> bool {
        self.columns().any(|idx| idx == column)
    }

    fn columns(&self) -> impl Iterator<Item = usize> {
        [
            self.date,
            self.symbol,
            self.direction,
            self.entry_price,
            self.exit_price,
            self.quantity,
            self.pnl,
            self.commission,
            self.notes,
        ]
        .into_iter()
        .flatten()
    }
}

fn matches_any(header: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| header.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_english_headers() {
        let h = headers(&["Date", "Symbol", "Direction", "Entry", "Exit", "PnL"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.symbol, Some(1));
        assert_eq!(mapping.direction, Some(2));
        assert_eq!(mapping.entry_price, Some(3));
        assert_eq!(mapping.exit_price, Some(4));
        assert_eq!(mapping.quantity, None);
        assert_eq!(mapping.pnl, Some(5));
        assert!(mapping.validate().is_ok());
    }

    #[test]
    fn test_localized_headers() {
        let h = headers(&["종목", "날짜", "방향", "수량", "손익", "수수료"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.symbol, Some(0));
        assert_eq!(mapping.date, Some(1));
        assert_eq!(mapping.direction, Some(2));
        assert_eq!(mapping.quantity, Some(3));
        assert_eq!(mapping.pnl, Some(4));
        assert_eq!(mapping.commission, Some(5));
    }

    #[test]
    fn test_chinese_headers() {
        let h = headers(&["日期", "品种", "方向", "盈亏"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.symbol, Some(1));
        assert_eq!(mapping.direction, Some(2));
        assert_eq!(mapping.pnl, Some(3));
    }

    #[test]
    fn test_first_match_wins() {
        let h = headers(&["Trade Date", "Settle Date", "Ticker", "Net"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.symbol, Some(2));
        assert_eq!(mapping.pnl, Some(3));
    }

    #[test]
    fn test_exit_date_is_not_a_price() {
        let h = headers(&[
            "Entry Date",
            "Exit Date",
            "Symbol",
            "Side",
            "Entry Price",
            "Exit Price",
            "Qty",
            "P&L",
        ]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(1));
        assert_eq!(mapping.symbol, Some(2));
        assert_eq!(mapping.direction, Some(3));
        assert_eq!(mapping.entry_price, Some(4));
        assert_eq!(mapping.exit_price, Some(5));
        assert_eq!(mapping.quantity, Some(6));
        assert_eq!(mapping.pnl, Some(7));
    }

    #[test]
    fn test_close_time_preferred_over_open_time() {
        let h = headers(&["Open Time", "Close Time", "Ticker", "Open", "Close", "Profit"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(1));
        assert_eq!(mapping.entry_price, Some(3));
        assert_eq!(mapping.exit_price, Some(4));
        assert_eq!(mapping.pnl, Some(5));
    }

    #[test]
    fn test_positional_fallback() {
        let h = headers(&["a", "b", "c", "d"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.symbol, Some(1));
        assert_eq!(mapping.pnl, Some(3));
    }

    #[test]
    fn test_fallback_skips_claimed_columns() {
        let h = headers(&["Profit", "Symbol"]);
        let mapping = ColumnMapping::auto_detect(&h, h.len());

        assert_eq!(mapping.pnl, Some(0));
        assert_eq!(mapping.symbol, Some(1));
        assert_eq!(mapping.date, None);
        assert!(matches!(
            mapping.validate(),
            Err(ImportError::MissingColumn("date"))
        ));
    }

    #[test]
    fn test_validate_requires_pnl() {
        let mapping = ColumnMapping {
            date: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            mapping.validate(),
            Err(ImportError::MissingColumn("pnl"))
        ));
    }
}
