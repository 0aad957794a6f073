//! Consumption Estimator.
//!
//! Two policies coexist and are not interchangeable:
//!
//! - [`full_history_daily_rate`]: "need per day". Total outflow per item divided by the
//!   number of whole days the *entire* ledger spans.
//! - [`trailing_window_outflow`]: "need per window". Raw outflow total per item over
//!   the trailing window, *not* divided. Used for ranking and window comparisons;
//!   callers wanting a per-day figure call [`WindowOutflow::daily_rates`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use restock_core::{DomainError, DomainResult, ItemId};

use crate::balance::add_to;
use crate::days::WindowDays;
use crate::model::{MovementRecord, MovementTable};

/// Per-day consumption rate per item.
pub type RateMap = BTreeMap<ItemId, Decimal>;

fn outflow_totals<'a>(
    records: impl Iterator<Item = &'a MovementRecord>,
) -> DomainResult<BTreeMap<ItemId, Decimal>> {
    let mut totals = BTreeMap::new();
    for record in records.filter(|r| r.is_outflow()) {
        add_to(&mut totals, record.item_id.clone(), record.amount.abs())?;
    }
    Ok(totals)
}

/// `reference_time - window`, clamped to the earliest representable time when the
/// window reaches past the calendar range.
fn window_start(reference_time: NaiveDateTime, window: WindowDays) -> NaiveDateTime {
    reference_time
        .checked_sub_signed(window.as_duration())
        .unwrap_or(NaiveDateTime::MIN)
}

/// Average daily consumption over the whole ledger.
///
/// Only items with at least one outflow get an entry. Fails with
/// [`DomainError::InsufficientHistory`] when the ledger spans less than one whole day
/// (including the empty and single-timestamp cases).
pub fn full_history_daily_rate(movements: &MovementTable) -> DomainResult<RateMap> {
    let elapsed_days = movements.elapsed_days();
    if elapsed_days <= 0 {
        return Err(DomainError::insufficient_history(elapsed_days));
    }

    let days = Decimal::from(elapsed_days);
    let rates: RateMap = outflow_totals(movements.records().iter())?
        .into_iter()
        .map(|(item_id, total)| (item_id, total / days))
        .collect();

    tracing::debug!(elapsed_days, items = rates.len(), "computed full-history daily rates");
    Ok(rates)
}

/// Raw outflow totals for one trailing window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowOutflow {
    window: WindowDays,
    reference_time: NaiveDateTime,
    totals: BTreeMap<ItemId, Decimal>,
}

impl WindowOutflow {
    pub fn window(&self) -> WindowDays {
        self.window
    }

    pub fn reference_time(&self) -> NaiveDateTime {
        self.reference_time
    }

    /// Inclusive lower bound of the window.
    pub fn window_start(&self) -> NaiveDateTime {
        window_start(self.reference_time, self.window)
    }

    /// Items with outflow inside the window and their totals.
    pub fn totals(&self) -> &BTreeMap<ItemId, Decimal> {
        &self.totals
    }

    /// Window total for one item; zero when it had no outflow in the window.
    pub fn total_for(&self, item_id: &ItemId) -> Decimal {
        self.totals.get(item_id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Window total normalized to a per-day figure.
    pub fn daily_rate(&self, item_id: &ItemId) -> Decimal {
        self.total_for(item_id) / Decimal::from(self.window)
    }

    pub fn daily_rates(&self) -> RateMap {
        let days = Decimal::from(self.window);
        self.totals
            .iter()
            .map(|(item_id, total)| (item_id.clone(), total / days))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Outflow totals over `[reference_time - window, ..]`.
///
/// Movements later than `reference_time` are not excluded: the bound is one-sided.
/// A window longer than the calendar range takes in the whole ledger.
pub fn trailing_window_outflow(
    movements: &MovementTable,
    window: WindowDays,
    reference_time: NaiveDateTime,
) -> DomainResult<WindowOutflow> {
    let start = window_start(reference_time, window);
    let totals = outflow_totals(movements.records().iter().filter(|r| r.timestamp >= start))?;
    Ok(WindowOutflow {
        window,
        reference_time,
        totals,
    })
}
