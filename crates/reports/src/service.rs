use std::sync::Arc;

use chrono::NaiveDateTime;

use restock_core::DomainResult;
use restock_inventory::{
    CoverageDays, RatePolicy, ReorderPlanner, STANDARD_WINDOWS, WindowDays, balance_rows, balances,
    monthly_movement, rank_by, trailing_window_outflow, window_summary,
};
use restock_ledger::LedgerSnapshot;

use crate::clock::{Clock, SystemClock};
use crate::filter::{BalanceFilter, ItemFilter};
use crate::report::{
    BalanceReport, BalanceReportRow, LedgerStats, MonthlyReport, PlanReport, RankingReport,
    RankingRow, WindowSummaryReport,
};

/// Everything a renderer can ask of the computation core.
///
/// Implementations recompute from an immutable snapshot on every call and hold no
/// mutable state, so one instance can serve concurrent callers.
pub trait InventoryReports {
    /// Reference time used by trailing windows.
    fn reference_time(&self) -> NaiveDateTime;

    /// Current balance per ledger item, joined with catalog display fields.
    fn balance_report(&self, filter: &BalanceFilter) -> DomainResult<BalanceReport>;

    /// Reorder recommendations for `coverage` days. Fails with `InsufficientHistory`
    /// under the full-history policy when the ledger spans less than a day.
    fn plan(&self, coverage: CoverageDays, policy: &RatePolicy) -> DomainResult<PlanReport>;

    /// Items ranked by raw outflow over the trailing window, highest first.
    fn consumption_ranking(&self, window: WindowDays, filter: &ItemFilter) -> DomainResult<RankingReport>;

    /// Outflow over each configured window side by side, with a stock-vs-window flag.
    fn window_summary(&self, filter: &ItemFilter) -> DomainResult<WindowSummaryReport>;

    fn monthly_movement(&self) -> DomainResult<MonthlyReport>;

    fn statistics(&self) -> LedgerStats;

    /// Trailing-window policy anchored at `reference_time()`.
    fn trailing_window_policy(&self, window: WindowDays) -> RatePolicy {
        RatePolicy::TrailingWindow {
            window,
            reference_time: self.reference_time(),
        }
    }
}

/// Tunables for the window views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub summary_windows: Vec<WindowDays>,
    /// Window whose outflow the balance is compared against in the window summary.
    pub comparison_window: WindowDays,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            summary_windows: STANDARD_WINDOWS.to_vec(),
            comparison_window: STANDARD_WINDOWS[1],
        }
    }
}

/// [`InventoryReports`] over a loaded [`LedgerSnapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotReports<C = SystemClock> {
    snapshot: Arc<LedgerSnapshot>,
    clock: C,
    settings: ReportSettings,
}

impl SnapshotReports<SystemClock> {
    pub fn new(snapshot: Arc<LedgerSnapshot>) -> Self {
        Self::with_clock(snapshot, SystemClock)
    }
}

impl<C: Clock> SnapshotReports<C> {
    pub fn with_clock(snapshot: Arc<LedgerSnapshot>, clock: C) -> Self {
        Self {
            snapshot,
            clock,
            settings: ReportSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ReportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }
}

impl<C: Clock> InventoryReports for SnapshotReports<C> {
    fn reference_time(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn balance_report(&self, filter: &BalanceFilter) -> DomainResult<BalanceReport> {
        let catalog = &self.snapshot.items;
        let rows = balance_rows(&balances(&self.snapshot.movements)?)
            .into_iter()
            .map(|b| BalanceReportRow {
                display: catalog.display_for(&b.item_id),
                in_catalog: catalog.contains(&b.item_id),
                item_id: b.item_id,
                current_balance: b.current_balance,
                status: b.status,
            })
            .filter(|row| filter.matches(&row.display, row.current_balance))
            .collect();
        Ok(BalanceReport { rows })
    }

    fn plan(&self, coverage: CoverageDays, policy: &RatePolicy) -> DomainResult<PlanReport> {
        let rows = ReorderPlanner::new(coverage)
            .with_policy(policy.clone())
            .plan(&self.snapshot.items, &self.snapshot.movements)?;
        Ok(PlanReport {
            coverage,
            policy: policy.clone(),
            rows,
        })
    }

    fn consumption_ranking(&self, window: WindowDays, filter: &ItemFilter) -> DomainResult<RankingReport> {
        let catalog = &self.snapshot.items;
        let movements = filter.apply(catalog, &self.snapshot.movements);
        let reference_time = self.reference_time();
        let outflow = trailing_window_outflow(&movements, window, reference_time)?;

        let ranked = rank_by(
            outflow.totals().iter().map(|(id, total)| (id.clone(), *total)).collect(),
            |(_, total)| *total,
        );
        let rows = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (item_id, total))| RankingRow {
                rank: i + 1,
                display: catalog.display_for(&item_id),
                item_id,
                outflow: total,
            })
            .collect::<Vec<_>>();
        tracing::debug!(window = %window, items = rows.len(), "consumption ranking computed");

        Ok(RankingReport {
            window,
            reference_time,
            rows,
        })
    }

    fn window_summary(&self, filter: &ItemFilter) -> DomainResult<WindowSummaryReport> {
        let catalog = &self.snapshot.items;
        let movements = filter.apply(catalog, &self.snapshot.movements);
        let reference_time = self.reference_time();
        // Stock is always the full-ledger balance, whatever the item filter.
        let stock = balances(&self.snapshot.movements)?;

        let rows = window_summary(
            &movements,
            &stock,
            catalog,
            &self.settings.summary_windows,
            self.settings.comparison_window,
            reference_time,
        )?;
        tracing::debug!(items = rows.len(), comparison = %self.settings.comparison_window, "window summary computed");
        Ok(WindowSummaryReport {
            windows: self.settings.summary_windows.clone(),
            comparison: self.settings.comparison_window,
            reference_time,
            rows,
        })
    }

    fn monthly_movement(&self) -> DomainResult<MonthlyReport> {
        Ok(MonthlyReport {
            months: monthly_movement(&self.snapshot.movements)?.into_iter().collect(),
        })
    }

    fn statistics(&self) -> LedgerStats {
        let catalog = &self.snapshot.items;
        let movements = &self.snapshot.movements;
        let ledger_ids = movements.item_ids();
        let span = movements.span();

        LedgerStats {
            movement_records: movements.len(),
            skipped_rows: self.snapshot.report.skipped_count(),
            duplicate_catalog_ids: self.snapshot.report.duplicate_items.len(),
            catalog_items: catalog.len(),
            ledger_items: ledger_ids.len(),
            ledger_items_missing_from_catalog: ledger_ids.iter().filter(|id| !catalog.contains(id)).count(),
            catalog_items_without_movements: catalog
                .iter()
                .filter(|item| !ledger_ids.contains(&item.item_id))
                .count(),
            first_movement: span.map(|(lo, _)| lo),
            last_movement: span.map(|(_, hi)| hi),
            elapsed_days: movements.elapsed_days(),
        }
    }
}
