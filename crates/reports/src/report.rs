//! Report payloads handed to renderers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use restock_core::ItemId;
use restock_inventory::{
    BalanceStatus, CoverageDays, ItemDisplay, RatePolicy, ReorderRecommendation, ReorderStatus,
    WindowDays, WindowSummaryRow, YearMonth, rank_by,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReportRow {
    pub item_id: ItemId,
    pub display: ItemDisplay,
    pub in_catalog: bool,
    pub current_balance: Decimal,
    pub status: BalanceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    pub rows: Vec<BalanceReportRow>,
}

impl BalanceReport {
    pub fn negative_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.status == BalanceStatus::Negative)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub coverage: CoverageDays,
    pub policy: RatePolicy,
    pub rows: Vec<ReorderRecommendation>,
}

impl PlanReport {
    /// Rows ranked by consumption rate, highest first (stable).
    pub fn ranked(&self) -> Vec<ReorderRecommendation> {
        rank_by(self.rows.clone(), |r| r.consumption_rate)
    }

    pub fn reorder_needed(&self) -> impl Iterator<Item = &ReorderRecommendation> {
        self.rows
            .iter()
            .filter(|r| r.status == ReorderStatus::ReorderNeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRow {
    /// 1-based position.
    pub rank: usize,
    pub item_id: ItemId,
    pub display: ItemDisplay,
    /// Raw outflow over the window (not divided by its length).
    pub outflow: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingReport {
    pub window: WindowDays,
    pub reference_time: NaiveDateTime,
    pub rows: Vec<RankingRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSummaryReport {
    pub windows: Vec<WindowDays>,
    pub comparison: WindowDays,
    pub reference_time: NaiveDateTime,
    pub rows: Vec<WindowSummaryRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    pub months: Vec<(YearMonth, Decimal)>,
}

/// Snapshot-level counters (data-quality view of the load).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub movement_records: usize,
    pub skipped_rows: usize,
    pub duplicate_catalog_ids: usize,
    pub catalog_items: usize,
    pub ledger_items: usize,
    /// Ledger items with no catalog entry (rendered with empty display fields).
    pub ledger_items_missing_from_catalog: usize,
    pub catalog_items_without_movements: usize,
    pub first_movement: Option<NaiveDateTime>,
    pub last_movement: Option<NaiveDateTime>,
    pub elapsed_days: i64,
}
