use anyhow::{Context, Result, anyhow};

use restock_inventory::{CoverageDays, RatePolicy, WindowDays};
use restock_ledger::{LedgerLoader, LedgerSources, SourceFetcher};
use restock_reports::csv_export::{BALANCE_FILE_NAME, plan_file_name};
use restock_reports::{BalanceFilter, InventoryReports, ItemFilter, ReportSettings, SnapshotReports};

use crate::args::{BalanceArgs, Cli, Command, ItemArgs, OutputFormat, PlanArgs, PolicyArg, RankingArgs};
use crate::config::RestockConfig;
use crate::output::{deliver, render, resolve_target};

/// Rendered command output plus the file name used when `--output` is a directory.
#[derive(Debug)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub default_name: String,
}

pub fn run(cli: Cli, config: &RestockConfig) -> Result<()> {
    let sources = resolve_sources(&cli, config)?;

    let fetcher = SourceFetcher::new(config.http.timeout()).context("failed to build http client")?;
    let loader = LedgerLoader::with_ttl(fetcher, config.cache.ttl());
    let snapshot = loader
        .load(&sources)
        .with_context(|| format!("failed to load ledger from {} and {}", sources.items, sources.movements))?;

    if snapshot.report.skipped_count() > 0 {
        tracing::warn!(skipped = snapshot.report.skipped_count(), "some ledger rows were skipped");
    }

    let settings = ReportSettings {
        comparison_window: WindowDays::new(config.plan.comparison_window_days)
            .context("plan.comparison_window_days")?,
        ..ReportSettings::default()
    };
    let reports = SnapshotReports::new(snapshot).with_settings(settings);

    let rendered = execute(&reports, &cli.command, cli.format, config)?;
    let target = resolve_target(cli.output.as_deref(), &rendered.default_name);
    deliver(&rendered.bytes, target.as_deref())
}

fn resolve_sources(cli: &Cli, config: &RestockConfig) -> Result<LedgerSources> {
    let items = cli
        .items
        .clone()
        .or_else(|| config.sources.items.clone())
        .ok_or_else(|| anyhow!("no item table: pass --items or set sources.items"))?;
    let movements = cli
        .movements
        .clone()
        .or_else(|| config.sources.movements.clone())
        .ok_or_else(|| anyhow!("no movement table: pass --movements or set sources.movements"))?;
    Ok(LedgerSources::new(items.as_str(), movements.as_str()))
}

/// Runs `command` against `reports` and renders the result.
pub fn execute<R: InventoryReports>(
    reports: &R,
    command: &Command,
    format: OutputFormat,
    config: &RestockConfig,
) -> Result<Rendered> {
    let doc = &config.document;
    let ext = format.extension();

    let (bytes, default_name) = match command {
        Command::Plan(args) => {
            let coverage = CoverageDays::new(args.coverage.unwrap_or(config.plan.default_coverage_days))
                .context("--coverage")?;
            let policy = rate_policy(reports, args)?;
            let mut plan = reports
                .plan(coverage, &policy)
                .with_context(|| format!("cannot plan with {}", policy.label()))?;
            if args.ranked {
                plan.rows = plan.ranked();
            }
            tracing::info!(
                coverage = %coverage,
                items = plan.rows.len(),
                reorder = plan.reorder_needed().count(),
                "reorder plan computed"
            );
            let name = match format {
                OutputFormat::Csv => plan_file_name(coverage.get()),
                _ => format!("plan_{}d.{ext}", coverage.get()),
            };
            (render(&plan, format, doc)?, name)
        }
        Command::Balance(BalanceArgs { search, negative_only }) => {
            let filter = BalanceFilter {
                name_contains: search.clone(),
                negative_only: *negative_only,
            };
            let report = reports.balance_report(&filter)?;
            let name = match format {
                OutputFormat::Csv => BALANCE_FILE_NAME.to_string(),
                _ => format!("balance.{ext}"),
            };
            (render(&report, format, doc)?, name)
        }
        Command::Ranking(RankingArgs { window, items }) => {
            let window = WindowDays::new(*window).context("--window")?;
            let report = reports.consumption_ranking(window, &item_filter(items))?;
            (render(&report, format, doc)?, format!("ranking_{}d.{ext}", window.get()))
        }
        Command::Windows(items) => {
            let report = reports.window_summary(&item_filter(items))?;
            (render(&report, format, doc)?, format!("windows.{ext}"))
        }
        Command::Monthly => {
            let report = reports.monthly_movement()?;
            (render(&report, format, doc)?, format!("monthly.{ext}"))
        }
        Command::Stats => {
            let report = reports.statistics();
            (render(&report, format, doc)?, format!("stats.{ext}"))
        }
    };

    Ok(Rendered { bytes, default_name })
}

fn rate_policy<R: InventoryReports>(reports: &R, args: &PlanArgs) -> Result<RatePolicy> {
    Ok(match args.policy {
        PolicyArg::FullHistory => RatePolicy::FullHistory,
        PolicyArg::Window => reports.trailing_window_policy(WindowDays::new(args.window).context("--window")?),
    })
}

fn item_filter(items: &ItemArgs) -> ItemFilter {
    if items.names.is_empty() {
        ItemFilter::all()
    } else {
        ItemFilter::named(items.names.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use clap::Parser;
    use restock_ledger::{LedgerSnapshot, LoadReport, parse_items, parse_movements};
    use restock_reports::FixedClock;

    const ITEMS: &str = "Item ID,Name,Description,Image\nA,Gloves,Nitrile,\nB,Tape,,\n";
    const MOVEMENTS: &str = "\
Item ID,DateTime,Amount
A,2024-01-01,100
A,2024-01-06,-20
A,2024-01-11,-20
B,2024-01-02,10
B,2024-01-09,-12
";

    fn reports() -> SnapshotReports<FixedClock> {
        let mut report = LoadReport::default();
        let movements = parse_movements(MOVEMENTS, &mut report).unwrap();
        let items = parse_items(ITEMS, &mut report).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 1, 11)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        SnapshotReports::with_clock(
            Arc::new(LedgerSnapshot::new(items, movements, report)),
            FixedClock(now),
        )
    }

    fn run_args(args: &[&str]) -> Result<Rendered> {
        let cli = Cli::try_parse_from(std::iter::once("restock").chain(args.iter().copied()))?;
        execute(&reports(), &cli.command, cli.format, &RestockConfig::default())
    }

    #[test]
    fn plan_csv_uses_default_file_name() {
        let out = run_args(&["plan", "--coverage", "30", "--format", "csv"]).unwrap();
        assert_eq!(out.default_name, "plan_30d.csv");
        let text = String::from_utf8(out.bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Item ID,Name,Description,Image,Consumption Rate,Current Balance,Required Quantity,Shortfall,Status")
        );
        assert_eq!(lines.next(), Some("A,Gloves,Nitrile,,4,60,120,60,reorder_needed"));
    }

    #[test]
    fn plan_uses_configured_default_coverage() {
        let out = run_args(&["plan", "--format", "csv"]).unwrap();
        assert_eq!(out.default_name, "plan_30d.csv");
    }

    #[test]
    fn zero_coverage_is_rejected() {
        assert!(run_args(&["plan", "--coverage", "0"]).is_err());
    }

    #[test]
    fn balance_negative_only() {
        let out = run_args(&["balance", "--negative-only", "--format", "csv"]).unwrap();
        assert_eq!(out.default_name, "balance.csv");
        assert_eq!(
            String::from_utf8(out.bytes).unwrap(),
            "Item ID,Name,Current Balance,Status\nB,Tape,-2,negative\n"
        );
    }

    #[test]
    fn ranking_json_lists_items() {
        let out = run_args(&["ranking", "--window", "7", "--format", "json"]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out.bytes).unwrap();
        let rows = value["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["item_id"], "A");
        assert_eq!(out.default_name, "ranking_7d.json");
    }

    #[test]
    fn huge_window_arguments_are_accepted() {
        let ranking = run_args(&["ranking", "--window", "4294967295", "--format", "csv"]).unwrap();
        assert!(String::from_utf8(ranking.bytes).unwrap().contains("Gloves"));
        let plan = run_args(&["plan", "--policy", "window", "--window", "4294967295", "--format", "csv"]);
        assert!(plan.is_ok());
    }

    #[test]
    fn window_policy_plan_runs() {
        let out = run_args(&["plan", "--coverage", "7", "--policy", "window", "--window", "7"]).unwrap();
        assert_eq!(out.default_name, "plan_7d.txt");
        assert!(String::from_utf8(out.bytes).unwrap().contains("Gloves"));
    }
}
