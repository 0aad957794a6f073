//! Balance Calculator: current stock per item.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult, ItemId, ValueObject};

use crate::model::MovementTable;

/// Net quantity on hand per item. Items without movements are absent.
pub type BalanceMap = BTreeMap<ItemId, Decimal>;

/// Sum every movement (inflows and outflows) per item.
///
/// Fails with [`DomainError::DataFormat`] when a running total leaves the `Decimal` range.
pub fn balances(movements: &MovementTable) -> DomainResult<BalanceMap> {
    let mut out = BalanceMap::new();
    for record in movements.records() {
        add_to(&mut out, record.item_id.clone(), record.amount)?;
    }
    Ok(out)
}

/// Adds `amount` to the running total under `key`, refusing to overflow.
pub(crate) fn add_to<K: Ord>(totals: &mut BTreeMap<K, Decimal>, key: K, amount: Decimal) -> DomainResult<()> {
    let total = totals.entry(key).or_insert(Decimal::ZERO);
    *total = total
        .checked_add(amount)
        .ok_or_else(|| DomainError::data_format(format!("total overflowed adding {amount}")))?;
    Ok(())
}

/// Balance lookup treating a missing key as zero.
pub fn balance_of(balances: &BalanceMap, item_id: &ItemId) -> Decimal {
    balances.get(item_id).copied().unwrap_or(Decimal::ZERO)
}

/// Flag raised on the balance report.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Stock went below zero: a tracking anomaly, reported but not rejected.
    Negative,
    Ok,
}

impl BalanceStatus {
    pub fn of(balance: Decimal) -> Self {
        if balance < Decimal::ZERO {
            BalanceStatus::Negative
        } else {
            BalanceStatus::Ok
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BalanceStatus::Negative => "negative",
            BalanceStatus::Ok => "ok",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub item_id: ItemId,
    pub current_balance: Decimal,
    pub status: BalanceStatus,
}

impl ValueObject for Balance {}

pub fn balance_rows(balances: &BalanceMap) -> Vec<Balance> {
    balances
        .iter()
        .map(|(item_id, current_balance)| Balance {
            item_id: item_id.clone(),
            current_balance: *current_balance,
            status: BalanceStatus::of(*current_balance),
        })
        .collect()
}
