//! 가져오기용 날짜 파싱.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use journal_core::DateOrder;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("ISO-like date pattern is valid")
});

static AMBIGUOUS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{4})(?:[ T](\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("ambiguous date pattern is valid")
});

/// 순서와 무관한 날짜+시각 형식 (소수 초, 12시간제, 월 이름).
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %I:%M %p",
    "%Y-%m-%d %I:%M:%S %p",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %I:%M %p",
    "%d %B %Y %H:%M:%S",
];

const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m-%d-%Y %I:%M %p",
];

const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%Y %I:%M %p",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d-%m-%Y %I:%M %p",
];

/// 월 이름을 쓰는 날짜 전용 형식.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%B %d %Y", "%d %B %Y", "%d-%B-%Y"];

/// 날짜 문자열을 UTC 시각으로 파싱합니다.
///
/// 시도 순서:
/// 1. RFC 3339 / RFC 2822
/// 2. `YYYY-MM-DD` (구분자 `-`, `/`, `.`, 선택적 시각)
/// 3. `A/B/YYYY` - `order`에 따라 월/일 또는 일/월로 해석
/// 4. 소수 초, `AM`/`PM`, 월 이름(`Mar 1, 2025`)을 포함한 형식.
///    숫자 월/일 형식은 3과 마찬가지로 `order` 한쪽만 시도
///
/// 모두 실패하면 `None`.
pub fn parse_date(value: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(caps) = ISO_LIKE.captures(value) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return build(year, month, day, &caps);
    }

    if let Some(caps) = AMBIGUOUS.captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        let (month, day) = match order {
            DateOrder::MonthFirst => (first, second),
            DateOrder::DayFirst => (second, first),
        };
        return build(year, month, day, &caps);
    }

    parse_native(value, order)
}

fn parse_native(value: &str, order: DateOrder) -> Option<DateTime<Utc>> {
    let ordered = match order {
        DateOrder::MonthFirst => MONTH_FIRST_FORMATS,
        DateOrder::DayFirst => DAY_FIRST_FORMATS,
    };

    let datetime = DATETIME_FORMATS
        .iter()
        .chain(ordered)
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok());
    if let Some(dt) = datetime {
        return Some(dt.and_utc());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}

fn build(year: i32, month: u32, day: u32, caps: &regex::Captures<'_>) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match (caps.get(4), caps.get(5)) {
        (Some(hour), Some(minute)) => {
            let hour: u32 = hour.as_str().parse().ok()?;
            let minute: u32 = minute.as_str().parse().ok()?;
            let second = caps
                .get(6)
                .map_or(Some(0), |s| s.as_str().parse::<u32>().ok())?;
            NaiveTime::from_hms_opt(hour, minute, second)?
        }
        _ => NaiveTime::from_hms_opt(0, 0, 0)?,
    };

    Some(NaiveDateTime::new(date, time).and_utc())
}
