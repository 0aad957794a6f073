//! Reorder Planner.
//!
//! Model:
//! - `required = round(daily_rate * coverage_days)`, banker's rounding (half to even).
//! - `shortfall = required - current_balance` (missing balance is zero).
//! - `reorder_needed` only when `shortfall > 0`; an exact match is within policy.
//!
//! The plan covers the union of items with a balance and items with a rate, so an item
//! that only ever received stock still shows up with a zero requirement.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult, ItemId, ValueObject};

use crate::balance::{BalanceMap, balance_of, balances};
use crate::consumption::{RateMap, full_history_daily_rate, trailing_window_outflow};
use crate::days::{CoverageDays, WindowDays};
use crate::model::{ItemDisplay, ItemTable, MovementTable};

/// Which consumption formula feeds the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum RatePolicy {
    /// Total outflow over the whole ledger span (see `full_history_daily_rate`).
    FullHistory,
    /// Trailing-window outflow divided by the window length.
    TrailingWindow {
        window: WindowDays,
        reference_time: NaiveDateTime,
    },
}

impl RatePolicy {
    pub fn daily_rates(&self, movements: &MovementTable) -> DomainResult<RateMap> {
        match self {
            RatePolicy::FullHistory => full_history_daily_rate(movements),
            RatePolicy::TrailingWindow {
                window,
                reference_time,
            } => Ok(trailing_window_outflow(movements, *window, *reference_time)?.daily_rates()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RatePolicy::FullHistory => "full history".to_string(),
            RatePolicy::TrailingWindow { window, .. } => format!("trailing {window}"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStatus {
    ReorderNeeded,
    WithinPolicy,
}

impl ReorderStatus {
    pub fn of(shortfall: Decimal) -> Self {
        if shortfall > Decimal::ZERO {
            ReorderStatus::ReorderNeeded
        } else {
            ReorderStatus::WithinPolicy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReorderStatus::ReorderNeeded => "reorder_needed",
            ReorderStatus::WithinPolicy => "within_policy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub item_id: ItemId,
    pub display: ItemDisplay,
    /// False when the item is in the ledger but missing from the catalog.
    pub in_catalog: bool,
    pub consumption_rate: Decimal,
    pub current_balance: Decimal,
    pub required_quantity: Decimal,
    pub shortfall: Decimal,
    pub status: ReorderStatus,
}

impl ValueObject for ReorderRecommendation {}

/// `round(daily_rate * coverage_days)`, half to even.
pub fn required_quantity(daily_rate: Decimal, coverage: CoverageDays) -> DomainResult<Decimal> {
    let raw = daily_rate
        .checked_mul(Decimal::from(coverage))
        .ok_or_else(|| DomainError::validation(format!("required quantity overflows for rate {daily_rate}")))?;
    Ok(raw.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
}

/// Combine precomputed balances and rates into recommendations, ascending by item id.
pub fn plan_from(
    balances: &BalanceMap,
    rates: &RateMap,
    catalog: &ItemTable,
    coverage: CoverageDays,
) -> DomainResult<Vec<ReorderRecommendation>> {
    let item_ids: BTreeSet<&ItemId> = balances.keys().chain(rates.keys()).collect();

    item_ids
        .into_iter()
        .map(|item_id| {
            let consumption_rate = rates.get(item_id).copied().unwrap_or(Decimal::ZERO);
            let current_balance = balance_of(balances, item_id);
            let required_quantity = required_quantity(consumption_rate, coverage)?;
            let shortfall = required_quantity - current_balance;
            Ok(ReorderRecommendation {
                item_id: item_id.clone(),
                display: catalog.display_for(item_id),
                in_catalog: catalog.contains(item_id),
                consumption_rate,
                current_balance,
                required_quantity,
                shortfall,
                status: ReorderStatus::of(shortfall),
            })
        })
        .collect()
}

/// Stable sort, descending by `key`. Ties keep their incoming order.
pub fn rank_by<T>(mut rows: Vec<T>, key: impl Fn(&T) -> Decimal) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

/// Reorder plan for one coverage horizon.
#[derive(Debug, Clone)]
pub struct ReorderPlanner {
    coverage: CoverageDays,
    policy: RatePolicy,
}

impl ReorderPlanner {
    pub fn new(coverage: CoverageDays) -> Self {
        Self {
            coverage,
            policy: RatePolicy::FullHistory,
        }
    }

    pub fn with_policy(mut self, policy: RatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn coverage(&self) -> CoverageDays {
        self.coverage
    }

    pub fn policy(&self) -> &RatePolicy {
        &self.policy
    }

    pub fn plan(
        &self,
        catalog: &ItemTable,
        movements: &MovementTable,
    ) -> DomainResult<Vec<ReorderRecommendation>> {
        let rates = self.policy.daily_rates(movements)?;
        let plan = plan_from(&balances(movements)?, &rates, catalog, self.coverage)?;

        tracing::debug!(
            coverage = %self.coverage,
            policy = %self.policy.label(),
            items = plan.len(),
            reorder_needed = plan.iter().filter(|r| r.status == ReorderStatus::ReorderNeeded).count(),
            "computed reorder plan"
        );
        Ok(plan)
    }

    /// Same plan, ranked by consumption rate (highest first).
    pub fn ranked(
        &self,
        catalog: &ItemTable,
        movements: &MovementTable,
    ) -> DomainResult<Vec<ReorderRecommendation>> {
        Ok(rank_by(self.plan(catalog, movements)?, |r| r.consumption_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, MovementRecord};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use std::str::FromStr;

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

    fn coverage(days: u32) -> CoverageDays {
        CoverageDays::new(days).unwrap()
    }

    fn catalog() -> ItemTable {
        ItemTable::from_items(vec![Item {
            item_id: id("A"),
            name: Some("Gloves".to_string()),
            description: Some("Nitrile, size M".to_string()),
            image_reference: Some("img/gloves.png".to_string()),
        }])
        .0
    }

    fn sample_ledger() -> MovementTable {
        MovementTable::new(vec![record("A", 0, 100), record("A", 5, -20), record("A", 10, -20)])
    }

    #[test]
    fn fifteen_day_coverage_is_exactly_met() {
        let plan = ReorderPlanner::new(coverage(15)).plan(&catalog(), &sample_ledger()).unwrap();
        assert_eq!(plan.len(), 1);
        let a = &plan[0];
        assert_eq!(a.current_balance, Decimal::from(60));
        assert_eq!(a.consumption_rate, Decimal::from(4));
        assert_eq!(a.required_quantity, Decimal::from(60));
        assert_eq!(a.shortfall, Decimal::ZERO);
        assert_eq!(a.status, ReorderStatus::WithinPolicy);
        assert_eq!(a.display.name.as_deref(), Some("Gloves"));
        assert!(a.in_catalog);
    }

    #[test]
    fn thirty_day_coverage_needs_reorder() {
        let plan = ReorderPlanner::new(coverage(30)).plan(&catalog(), &sample_ledger()).unwrap();
        let a = &plan[0];
        assert_eq!(a.required_quantity, Decimal::from(120));
        assert_eq!(a.shortfall, Decimal::from(60));
        assert_eq!(a.status, ReorderStatus::ReorderNeeded);
    }

    #[test]
    fn zero_shortfall_is_within_policy() {
        assert_eq!(ReorderStatus::of(Decimal::ZERO), ReorderStatus::WithinPolicy);
        assert_eq!(ReorderStatus::of(Decimal::new(1, 2)), ReorderStatus::ReorderNeeded);
    }

    #[test]
    fn rounding_is_half_to_even() {
        let rate = Decimal::from_str("0.5").unwrap();
        assert_eq!(required_quantity(rate, coverage(5)).unwrap(), Decimal::from(2)); // 2.5
        assert_eq!(required_quantity(rate, coverage(7)).unwrap(), Decimal::from(4)); // 3.5
        let third = Decimal::from(10) / Decimal::from(3);
        assert_eq!(required_quantity(third, coverage(30)).unwrap(), Decimal::from(100));
    }

    #[test]
    fn pure_inflow_item_is_in_the_plan() {
        let mut records = sample_ledger().records().to_vec();
        records.push(record("B", 2, 30));
        let plan = ReorderPlanner::new(coverage(30))
            .plan(&catalog(), &MovementTable::new(records))
            .unwrap();

        let b = plan.iter().find(|r| r.item_id == id("B")).unwrap();
        assert_eq!(b.required_quantity, Decimal::ZERO);
        assert_eq!(b.shortfall, Decimal::from(-30));
        assert_eq!(b.status, ReorderStatus::WithinPolicy);
        // Not in the catalog: display fields stay empty, row is kept.
        assert!(!b.in_catalog);
        assert_eq!(b.display, ItemDisplay::default());
    }

    #[test]
    fn rate_only_items_get_zero_balance() {
        let mut rates = RateMap::new();
        rates.insert(id("C"), Decimal::from(2));
        let plan = plan_from(&BalanceMap::new(), &rates, &ItemTable::default(), coverage(7)).unwrap();
        assert_eq!(plan[0].current_balance, Decimal::ZERO);
        assert_eq!(plan[0].shortfall, Decimal::from(14));
    }

    #[test]
    fn insufficient_history_propagates() {
        let ledger = MovementTable::new(vec![record("A", 0, -5)]);
        let err = ReorderPlanner::new(coverage(7)).plan(&catalog(), &ledger).unwrap_err();
        assert!(err.is_insufficient_history());
    }

    #[test]
    fn trailing_window_policy_normalizes_per_day() {
        let policy = RatePolicy::TrailingWindow {
            window: WindowDays::new(10).unwrap(),
            reference_time: day(10),
        };
        let plan = ReorderPlanner::new(coverage(15))
            .with_policy(policy)
            .plan(&catalog(), &sample_ledger())
            .unwrap();
        assert_eq!(plan[0].consumption_rate, Decimal::from(4));
        assert_eq!(plan[0].required_quantity, Decimal::from(60));
    }

    #[test]
    fn ranking_is_descending_and_stable() {
        let ledger = MovementTable::new(vec![
            record("A", 0, -10),
            record("B", 0, -30),
            record("C", 0, -10),
            record("D", 10, 5),
        ]);
        let ranked = ReorderPlanner::new(coverage(7)).ranked(&catalog(), &ledger).unwrap();
        let order: Vec<&str> = ranked.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C", "D"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: planning twice over the same inputs yields identical output.
        #[test]
        fn planning_is_idempotent(
            entries in prop::collection::vec((0usize..3, -500i64..500i64, 0i64..60), 2..30),
            days in 1u32..120
        ) {
            let names = ["A", "B", "C"];
            let mut records: Vec<MovementRecord> = entries
                .iter()
                .map(|(i, amount, n)| record(names[*i], *n, *amount))
                .collect();
            // Guarantee a non-zero span.
            records.push(record("A", 61, 0));
            let ledger = MovementTable::new(records);

            let planner = ReorderPlanner::new(coverage(days));
            let first = planner.plan(&catalog(), &ledger).unwrap();
            let second = planner.plan(&catalog(), &ledger).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: a longer horizon never lowers the requirement or the shortfall.
        #[test]
        fn longer_coverage_is_monotonic(
            rate_cents in 0i64..100_000,
            balance in -1_000i64..1_000,
            short in 1u32..365,
            extra in 0u32..365
        ) {
            let rate = Decimal::new(rate_cents, 2);
            let mut rates = RateMap::new();
            rates.insert(id("A"), rate);
            let mut bal = BalanceMap::new();
            bal.insert(id("A"), Decimal::from(balance));

            let lo = plan_from(&bal, &rates, &ItemTable::default(), coverage(short)).unwrap();
            let hi = plan_from(&bal, &rates, &ItemTable::default(), coverage(short + extra)).unwrap();
            prop_assert!(hi[0].required_quantity >= lo[0].required_quantity);
            prop_assert!(hi[0].shortfall >= lo[0].shortfall);
        }
    }
}
