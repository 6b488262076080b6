//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정 값은 CLI의 기본값으로만 사용되며, 분석 함수는 설정을 직접 읽지 않고
//! 모든 값을 명시적인 인자로 받습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::DEFAULT_STARTING_BALANCE;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 매매일지 기본값
    #[serde(default)]
    pub journal: JournalConfig,
    /// CSV 가져오기 설정
    #[serde(default)]
    pub import: ImportConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 소스 파일/줄 번호 출력
    #[serde(default)]
    pub with_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
            with_file: false,
        }
    }
}

/// 매매일지 기본값 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JournalConfig {
    /// 계좌 초기 잔고가 없을 때 사용할 시작 잔고
    pub default_starting_balance: Decimal,
    /// 기본 조회 기간 (1D, 1W, 1M, 3M, 1Y, ALL)
    pub default_window: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            default_starting_balance: DEFAULT_STARTING_BALANCE,
            default_window: "ALL".to_string(),
        }
    }
}

/// 모호한 `A/B/YYYY` 날짜의 해석 순서.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// 월/일/연 (미국식)
    #[default]
    MonthFirst,
    /// 일/월/연 (유럽식)
    DayFirst,
}

impl std::str::FromStr for DateOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "month_first" | "mdy" | "us" => Ok(Self::MonthFirst),
            "day_first" | "dmy" | "eu" => Ok(Self::DayFirst),
            _ => Err(format!("Unknown date order: {}", s)),
        }
    }
}

/// CSV 가져오기 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImportConfig {
    /// 구분자 (없으면 첫 줄에서 자동 감지)
    #[serde(default)]
    pub delimiter: Option<char>,
    /// 모호한 날짜 해석 순서
    #[serde(default)]
    pub date_order: DateOrder,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 기본값과 환경 변수(`JOURNAL__` 접두사)로 로드됩니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "compact")?
            .set_default(
                "journal.default_starting_balance",
                DEFAULT_STARTING_BALANCE.to_string(),
            )?
            .set_default("journal.default_window", "ALL")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("JOURNAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.journal.default_starting_balance, dec!(10000));
        assert_eq!(config.journal.default_window, "ALL");
        assert_eq!(config.import.date_order, DateOrder::MonthFirst);
        assert!(config.import.delimiter.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.journal.default_starting_balance, dec!(10000));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_date_order_from_str() {
        assert_eq!("month-first".parse::<DateOrder>().unwrap(), DateOrder::MonthFirst);
        assert_eq!("DMY".parse::<DateOrder>().unwrap(), DateOrder::DayFirst);
        assert!("ymd".parse::<DateOrder>().is_err());
    }
}
