//! 매매일지 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 증권사 CSV를 매매일지 JSON으로 변환
//! journal import -i trades.csv -o journal.json
//!
//! # 최근 1개월 자산 곡선
//! journal curve -i journal.json -w 1M
//!
//! # 전략별 성과 리포트
//! journal report -i journal.json --by strategy
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{error, info};
use uuid::Uuid;

use journal_cli::commands::curve::{print_curve, CurveCliConfig};
use journal_cli::commands::import::{import_csv, ImportCliConfig};
use journal_cli::commands::report::{print_report, GroupBy, ReportCliConfig};
use journal_core::{init_logging, AppConfig, DateOrder, LogConfig};
use journal_analytics::LookbackWindow;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Trading journal CLI - 거래 기록, 자산 곡선, 성과 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// CSV 거래 내역을 매매일지 JSON으로 변환
    Import {
        /// CSV 파일 경로
        #[arg(short, long)]
        input: PathBuf,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 거래를 넣을 계좌 ID (지정하지 않으면 새 계좌 생성)
        #[arg(long)]
        ledger: Option<Uuid>,

        /// 새 계좌 이름 (기본: 파일 이름)
        #[arg(long)]
        ledger_name: Option<String>,

        /// 가져온 거래에 붙일 전략 ID
        #[arg(long)]
        strategy: Option<Uuid>,

        /// 구분자 (기본: 자동 감지)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// 모호한 날짜 해석 순서 (month_first, day_first)
        #[arg(long)]
        date_order: Option<String>,

        /// 첫 행부터 데이터인 경우
        #[arg(long, default_value = "false")]
        no_headers: bool,
    },

    /// 자산 곡선 출력 (JSON)
    Curve {
        /// 매매일지 JSON 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 조회 기간 (1D, 1W, 1M, 3M, 1Y, ALL)
        #[arg(short, long)]
        window: Option<String>,

        /// 기준 시각 (RFC 3339, 기본: 현재)
        #[arg(long)]
        now: Option<String>,

        /// 계좌 정보가 없을 때의 시작 잔고
        #[arg(long)]
        balance: Option<String>,

        /// 합산할 계좌 ID (반복 지정 가능)
        #[arg(long)]
        ledger: Vec<Uuid>,
    },

    /// 성과 리포트
    Report {
        /// 매매일지 JSON 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 조회 기간 (1D, 1W, 1M, 3M, 1Y, ALL)
        #[arg(short, long)]
        window: Option<String>,

        /// 기준 시각 (RFC 3339, 기본: 현재)
        #[arg(long)]
        now: Option<String>,

        /// 계좌 정보가 없을 때의 시작 잔고
        #[arg(long)]
        balance: Option<String>,

        /// 대상 계좌 ID (반복 지정 가능)
        #[arg(long)]
        ledger: Vec<Uuid>,

        /// 분해 기준 (ledger, strategy)
        #[arg(long)]
        by: Option<String>,

        /// JSON 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn parse_now(now: Option<String>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(&s)
            .with_context(|| format!("Invalid --now value: {}", s))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn parse_window(window: Option<String>, config: &AppConfig) -> Result<LookbackWindow> {
    let code = window.unwrap_or_else(|| config.journal.default_window.clone());
    Ok(LookbackWindow::from_str(&code)?)
}

fn parse_balance(balance: Option<String>, config: &AppConfig) -> Result<Decimal> {
    match balance {
        Some(s) => {
            Decimal::from_str(&s).with_context(|| format!("Invalid --balance value: {}", s))
        }
        None => Ok(config.journal.default_starting_balance),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;

    // 트레이싱 초기화
    init_logging(LogConfig::from_settings(&config.logging))
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    let result = match cli.command {
        Commands::Import {
            input,
            output,
            ledger,
            ledger_name,
            strategy,
            delimiter,
            date_order,
            no_headers,
        } => {
            let date_order = date_order
                .map(|s| DateOrder::from_str(&s))
                .transpose()
                .map_err(|e| anyhow!(e))?;

            let import_config = ImportCliConfig {
                input,
                output,
                ledger_id: ledger,
                ledger_name,
                strategy_id: strategy,
                delimiter,
                date_order,
                no_headers,
            };

            import_csv(import_config, &config.import).map(|count| {
                info!("✅ Imported {} trades", count);
            })
        }

        Commands::Curve {
            input,
            output,
            window,
            now,
            balance,
            ledger,
        } => {
            let curve_config = CurveCliConfig {
                input,
                output,
                window: parse_window(window, &config)?,
                now: parse_now(now)?,
                starting_balance: parse_balance(balance, &config)?,
                ledgers: ledger,
            };

            print_curve(curve_config).map(|points| {
                info!("✅ Printed {} curve points", points);
            })
        }

        Commands::Report {
            input,
            window,
            now,
            balance,
            ledger,
            by,
            json,
        } => {
            let group_by = by.map(|s| GroupBy::from_str(&s)).transpose()?;

            let report_config = ReportCliConfig {
                input,
                window: parse_window(window, &config)?,
                now: parse_now(now)?,
                starting_balance: parse_balance(balance, &config)?,
                ledgers: ledger,
                group_by,
                json,
            };

            print_report(report_config).map(|trades| {
                info!("✅ Report covers {} trades", trades);
            })
        }
    };

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
