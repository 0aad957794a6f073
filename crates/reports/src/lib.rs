//! `restock-reports`
//!
//! **Responsibility:** the capability interface renderers call into.
//!
//! - [`InventoryReports`] exposes balance, plan, ranking, window summary, monthly
//!   movement and ledger statistics over a loaded snapshot. Renderers (CLI, web page,
//!   terminal UI) never touch the analytics functions directly.
//! - [`ReportTable`] is the column/row form every report converts to.
//! - [`csv_export`] and [`document`] serialize tables for download.

pub mod clock;
pub mod csv_export;
pub mod document;
pub mod error;
pub mod filter;
pub mod report;
pub mod service;
pub mod table;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ReportError;
pub use filter::{BalanceFilter, ItemFilter};
pub use report::{
    BalanceReport, BalanceReportRow, LedgerStats, MonthlyReport, PlanReport, RankingReport,
    RankingRow, WindowSummaryReport,
};
pub use service::{InventoryReports, ReportSettings, SnapshotReports};
pub use table::{ReportTable, ToTable};
