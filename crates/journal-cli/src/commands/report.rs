//! 성과 리포트 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 성과 요약
//! journal report -i journal.json
//!
//! # 최근 3개월, 전략별 분해, JSON 출력
//! journal report -i journal.json -w 3M --by strategy --json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use journal_analytics::{
    filter_curve, ledger_breakdown, strategy_breakdown, trades_in_window, GroupMetrics,
    LookbackWindow, PerformanceMetrics,
};
use journal_core::{JournalError, Money};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::curve::journal_curve;
use super::input::JournalFile;

/// 분해 기준
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// 계좌별
    Ledger,
    /// 전략별
    Strategy,
}

impl std::str::FromStr for GroupBy {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ledger" | "account" => Ok(Self::Ledger),
            "strategy" => Ok(Self::Strategy),
            _ => Err(JournalError::InvalidInput(format!(
                "unknown group '{}', expected ledger or strategy",
                s
            ))),
        }
    }
}

/// 리포트 명령 설정
#[derive(Debug, Clone)]
pub struct ReportCliConfig {
    /// 매매일지 JSON 경로
    pub input: PathBuf,
    /// 조회 기간
    pub window: LookbackWindow,
    /// 기준 시각
    pub now: DateTime<Utc>,
    /// 계좌 정보가 없을 때의 시작 잔고
    pub starting_balance: Money,
    /// 대상 계좌 (비어 있으면 전체)
    pub ledgers: Vec<Uuid>,
    /// 분해 기준
    pub group_by: Option<GroupBy>,
    /// JSON 출력 여부
    pub json: bool,
}

/// 리포트 결과
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// 조회 기간
    pub window: LookbackWindow,
    /// 기간 시작 잔고
    pub starting_balance: Money,
    /// 전체 성과
    pub overall: PerformanceMetrics,
    /// 그룹별 성과
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupMetrics>,
}

/// 매매일지에서 리포트를 계산합니다.
///
/// 기간 지표는 기간 안의 거래와, 기간 시작 시점의 잔고에서 출발하는 곡선으로
/// 계산합니다. 그룹별 지표는 기간 안의 거래를 각 그룹의 시작 잔고로 계산합니다.
pub fn build_report(
    file: &JournalFile,
    window: LookbackWindow,
    now: DateTime<Utc>,
    ledger_ids: &[Uuid],
    fallback: Money,
    group_by: Option<GroupBy>,
) -> Report {
    let full = journal_curve(file, ledger_ids, fallback);
    let windowed = filter_curve(&full, window, now);
    let starting_balance = windowed.starting_balance();

    let ledgers = file.select_ledgers(ledger_ids);
    let trades: Vec<_> = trades_in_window(&file.analyzable_trades(), window, now)
        .into_iter()
        .filter(|t| {
            if file.ledgers.is_empty() {
                ledger_ids.is_empty() || ledger_ids.contains(&t.ledger_id)
            } else {
                ledgers.iter().any(|l| l.id == t.ledger_id)
            }
        })
        .collect();

    let overall = PerformanceMetrics::from_trades(&trades, starting_balance);
    let groups = match group_by {
        Some(GroupBy::Ledger) => ledger_breakdown(&ledgers, &trades),
        Some(GroupBy::Strategy) => strategy_breakdown(&file.strategies, &trades, starting_balance),
        None => Vec::new(),
    };

    Report {
        window,
        starting_balance,
        overall,
        groups,
    }
}

/// 리포트 명령을 실행합니다. 기간 안의 거래 수를 반환합니다.
pub fn print_report(config: ReportCliConfig) -> Result<usize> {
    let file = JournalFile::load(&config.input)?;
    let report = build_report(
        &file,
        config.window,
        config.now,
        &config.ledgers,
        config.starting_balance,
        config.group_by,
    );

    info!(
        window = %report.window,
        trades = report.overall.total_trades,
        groups = report.groups.len(),
        "Report computed"
    );

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.overall.total_trades);
    }

    println!("\n📊 성과 리포트 ({})", report.window);
    if !report.overall.has_trades() {
        println!("기간 내 거래가 없습니다.");
        return Ok(0);
    }

    print_metrics(&report.overall);
    for group in &report.groups {
        println!("\n[{}]", group.name);
        if group.metrics.has_trades() {
            println!("  {}", group.metrics.summary());
        } else {
            println!("  거래 없음");
        }
    }

    Ok(report.overall.total_trades)
}

fn print_metrics(m: &PerformanceMetrics) {
    println!("시작 잔고: {:.2}", m.starting_balance);
    println!("최종 잔고: {:.2} ({:.2}%)", m.ending_balance, m.return_pct);
    println!(
        "거래: {} (수익 {} / 손실 {} / 본전 {})",
        m.total_trades, m.winning_trades, m.losing_trades, m.break_even_trades
    );
    println!("승률: {:.1}%", m.win_rate_pct);
    println!("프로핏 팩터: {}", m.profit_factor);
    println!(
        "평균 수익: {:.2} | 평균 손실: {:.2} | 기대값: {:.2}",
        m.avg_win, m.avg_loss, m.expectancy
    );
    println!("샤프 비율: {:.2}", m.sharpe_ratio);
    println!(
        "최대 낙폭: {:.2} ({:.2}%)",
        m.drawdown.max_drawdown, m.drawdown.max_drawdown_pct
    );
    println!(
        "최대 연승: {} ({:.2}) | 최대 연패: {} ({:.2})",
        m.streaks.max_consecutive_wins,
        m.streaks.max_consecutive_win_amount,
        m.streaks.max_consecutive_losses,
        m.streaks.max_consecutive_loss_amount
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use journal_core::{Direction, Ledger, Strategy, TradeRecord};
    use rust_decimal_macros::dec;

    fn sample() -> (JournalFile, DateTime<Utc>) {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 18, 0, 0).unwrap();
        let ledger = Ledger::new("Main").with_initial_balance(dec!(10000));
        let strategy = Strategy::new("Breakout");

        let trades = vec![
            TradeRecord::with_pnl(ledger.id, "ES", Direction::Long, dec!(1000), now - Duration::days(60)),
            TradeRecord::with_pnl(ledger.id, "ES", Direction::Long, dec!(200), now - Duration::days(5))
                .with_strategy(strategy.id),
            TradeRecord::with_pnl(ledger.id, "NQ", Direction::Short, dec!(-100), now - Duration::days(2)),
        ];

        let file = JournalFile {
            ledgers: vec![ledger],
            strategies: vec![strategy],
            trades,
        };
        (file, now)
    }

    #[test]
    fn test_group_by_parse() {
        assert_eq!("Ledger".parse::<GroupBy>().unwrap(), GroupBy::Ledger);
        assert_eq!("strategy".parse::<GroupBy>().unwrap(), GroupBy::Strategy);
        assert!("symbol".parse::<GroupBy>().is_err());
    }

    #[test]
    fn test_report_all_time() {
        let (file, now) = sample();
        let report = build_report(&file, LookbackWindow::All, now, &[], dec!(0), None);

        assert_eq!(report.starting_balance, dec!(10000));
        assert_eq!(report.overall.total_trades, 3);
        assert_eq!(report.overall.net_pnl, dec!(1100));
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_report_window_starts_from_carried_balance() {
        let (file, now) = sample();
        let report = build_report(&file, LookbackWindow::OneMonth, now, &[], dec!(0), None);

        assert_eq!(report.starting_balance, dec!(11000));
        assert_eq!(report.overall.total_trades, 2);
        assert_eq!(report.overall.ending_balance, dec!(11100));
    }

    #[test]
    fn test_report_by_strategy() {
        let (file, now) = sample();
        let report = build_report(
            &file,
            LookbackWindow::All,
            now,
            &[],
            dec!(0),
            Some(GroupBy::Strategy),
        );

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].name, "Breakout");
        assert_eq!(report.groups[0].metrics.total_trades, 1);
        assert_eq!(report.groups[1].name, "unassigned");
        assert_eq!(report.groups[1].metrics.total_trades, 2);
    }
}
