use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "restock",
    about = "Stock balances, consumption rates and reorder plans from an inventory ledger",
    version
)]
pub struct Cli {
    /// Item catalog CSV (file path or http(s) URL). Overrides `sources.items`.
    #[arg(long, global = true)]
    pub items: Option<String>,

    /// Movement ledger CSV (file path or http(s) URL). Overrides `sources.movements`.
    #[arg(long, global = true)]
    pub movements: Option<String>,

    /// Configuration file (TOML). Defaults to `restock.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout. A directory gets the default file name.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Document,
    Json,
    #[cfg(feature = "pdf")]
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table | OutputFormat::Document => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            #[cfg(feature = "pdf")]
            OutputFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reorder recommendations for a coverage window.
    Plan(PlanArgs),
    /// Current balance per item.
    Balance(BalanceArgs),
    /// Items ranked by consumption over a trailing window.
    Ranking(RankingArgs),
    /// Consumption over the standard windows side by side.
    Windows(ItemArgs),
    /// Net movement per calendar month.
    Monthly,
    /// Ledger and catalog statistics.
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Total outflow divided by the whole ledger span.
    FullHistory,
    /// Outflow over a trailing window divided by its length.
    Window,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Days of stock to cover. Defaults to `plan.default_coverage_days`.
    #[arg(long)]
    pub coverage: Option<u32>,

    #[arg(long, value_enum, default_value_t = PolicyArg::FullHistory)]
    pub policy: PolicyArg,

    /// Trailing window length for `--policy window`.
    #[arg(long, default_value_t = 30)]
    pub window: u32,

    /// Order rows by consumption rate, highest first.
    #[arg(long, action = ArgAction::SetTrue)]
    pub ranked: bool,
}

#[derive(Debug, Args)]
pub struct BalanceArgs {
    /// Case-insensitive substring of the item name.
    #[arg(long)]
    pub search: Option<String>,

    #[arg(long, action = ArgAction::SetTrue)]
    pub negative_only: bool,
}

#[derive(Debug, Args)]
pub struct RankingArgs {
    #[arg(long, default_value_t = 30)]
    pub window: u32,

    #[command(flatten)]
    pub items: ItemArgs,
}

#[derive(Debug, Args)]
pub struct ItemArgs {
    /// Restrict to catalog items with this name (repeatable).
    #[arg(long = "item")]
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_with_window_policy() {
        let cli = Cli::try_parse_from([
            "restock",
            "--items",
            "items.csv",
            "plan",
            "--coverage",
            "15",
            "--policy",
            "window",
            "--window",
            "7",
            "--format",
            "csv",
        ])
        .unwrap();
        assert_eq!(cli.items.as_deref(), Some("items.csv"));
        assert_eq!(cli.format, OutputFormat::Csv);
        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.coverage, Some(15));
                assert_eq!(args.policy, PolicyArg::Window);
                assert_eq!(args.window, 7);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn repeatable_item_filter() {
        let cli = Cli::try_parse_from(["restock", "windows", "--item", "Gloves", "--item", "Tape"]).unwrap();
        match cli.command {
            Command::Windows(items) => assert_eq!(items.names, vec!["Gloves", "Tape"]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
