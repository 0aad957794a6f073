//! Multi-window consumption summary and monthly movement.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restock_core::{DomainResult, ItemId, ValueObject};

use crate::balance::{BalanceMap, add_to, balance_of};
use crate::consumption::{WindowOutflow, trailing_window_outflow};
use crate::days::WindowDays;
use crate::model::{ItemDisplay, ItemTable, MovementTable};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRecommendation {
    /// Stock on hand is below the outflow of the comparison window.
    OrderNeeded,
    Ok,
}

impl WindowRecommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowRecommendation::OrderNeeded => "order_needed",
            WindowRecommendation::Ok => "ok",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSummaryRow {
    pub item_id: ItemId,
    pub display: ItemDisplay,
    /// Raw outflow per requested window, in request order; zero when none.
    pub outflows: Vec<(WindowDays, Decimal)>,
    pub current_balance: Decimal,
    pub recommendation: WindowRecommendation,
}

impl ValueObject for WindowSummaryRow {}

impl WindowSummaryRow {
    pub fn outflow(&self, window: WindowDays) -> Option<Decimal> {
        self.outflows
            .iter()
            .find_map(|(w, total)| (*w == window).then_some(*total))
    }
}

/// Outflow totals for several trailing windows side by side.
///
/// Rows cover every item with outflow in at least one window, ascending by id. The
/// recommendation compares the balance against the `comparison` window's outflow,
/// which does not need to be one of `windows`.
pub fn window_summary(
    movements: &MovementTable,
    balances: &BalanceMap,
    catalog: &ItemTable,
    windows: &[WindowDays],
    comparison: WindowDays,
    reference_time: NaiveDateTime,
) -> DomainResult<Vec<WindowSummaryRow>> {
    let per_window = windows
        .iter()
        .map(|w| trailing_window_outflow(movements, *w, reference_time))
        .collect::<DomainResult<Vec<WindowOutflow>>>()?;
    let comparison_outflow = trailing_window_outflow(movements, comparison, reference_time)?;

    let item_ids: BTreeSet<&ItemId> = per_window.iter().flat_map(|o| o.totals().keys()).collect();

    Ok(item_ids
        .into_iter()
        .map(|item_id| {
            let current_balance = balance_of(balances, item_id);
            let recommendation = if current_balance < comparison_outflow.total_for(item_id) {
                WindowRecommendation::OrderNeeded
            } else {
                WindowRecommendation::Ok
            };
            WindowSummaryRow {
                item_id: item_id.clone(),
                display: catalog.display_for(item_id),
                outflows: per_window
                    .iter()
                    .map(|o| (o.window(), o.total_for(item_id)))
                    .collect(),
                current_balance,
                recommendation,
            }
        })
        .collect())
}

/// Calendar month bucket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(timestamp: NaiveDateTime) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }
}

impl core::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Net movement (all items) per calendar month, ascending.
pub fn monthly_movement(movements: &MovementTable) -> DomainResult<BTreeMap<YearMonth, Decimal>> {
    let mut out = BTreeMap::new();
    for record in movements.records() {
        add_to(&mut out, YearMonth::of(record.timestamp), record.amount)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::balances;
    use crate::days::STANDARD_WINDOWS;
    use crate::model::MovementRecord;
    use chrono::{Duration, NaiveDate};

    fn id(s: &str) -> ItemId {
        ItemId::parse(s).unwrap()
    }

    fn day(n: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::days(n)
    }

    fn record(item: &str, n: i64, amount: i64) -> MovementRecord {
        MovementRecord::new(id(item), day(n), Decimal::from(amount))
    }

    fn w(days: u32) -> WindowDays {
        WindowDays::new(days).unwrap()
    }

    #[test]
    fn summary_fills_missing_windows_with_zero() {
        let ledger = MovementTable::new(vec![
            record("A", 0, 100),
            record("A", 20, -30), // 40 days before reference: only in the 45-day window
            record("A", 55, -5),  // within all windows
            record("B", 58, 10),
        ]);
        let rows = window_summary(
            &ledger,
            &balances(&ledger).unwrap(),
            &ItemTable::default(),
            &STANDARD_WINDOWS,
            w(15),
            day(60),
        )
        .unwrap();

        assert_eq!(rows.len(), 1, "pure-inflow items have no outflow row");
        let a = &rows[0];
        assert_eq!(a.outflow(w(7)), Some(Decimal::from(5)));
        assert_eq!(a.outflow(w(30)), Some(Decimal::from(5)));
        assert_eq!(a.outflow(w(45)), Some(Decimal::from(35)));
        assert_eq!(a.current_balance, Decimal::from(65));
        assert_eq!(a.recommendation, WindowRecommendation::Ok);
    }

    #[test]
    fn summary_flags_balance_below_comparison_window() {
        let ledger = MovementTable::new(vec![record("A", 0, 10), record("A", 58, -8)]);
        let rows = window_summary(
            &ledger,
            &balances(&ledger).unwrap(),
            &ItemTable::default(),
            &[w(7)],
            w(15),
            day(60),
        )
        .unwrap();
        // balance 2 < 8 consumed in the last 15 days
        assert_eq!(rows[0].recommendation, WindowRecommendation::OrderNeeded);
        assert_eq!(rows[0].outflow(w(15)), None);
    }

    #[test]
    fn monthly_movement_nets_per_month() {
        let ledger = MovementTable::new(vec![
            record("A", 0, 100),  // Jan
            record("B", 10, -20), // Jan
            record("A", 40, -15), // Feb
        ]);
        let months = monthly_movement(&ledger).unwrap();
        let keys: Vec<String> = months.keys().map(|m| m.to_string()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-02"]);
        assert_eq!(months[&YearMonth { year: 2024, month: 1 }], Decimal::from(80));
        assert_eq!(months[&YearMonth { year: 2024, month: 2 }], Decimal::from(-15));
    }

    #[test]
    fn monthly_overflow_is_an_error() {
        let ledger = MovementTable::new(vec![
            MovementRecord::new(id("A"), day(0), Decimal::MAX),
            MovementRecord::new(id("B"), day(1), Decimal::MAX),
        ]);
        assert!(monthly_movement(&ledger).is_err());
    }
}
