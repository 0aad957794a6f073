//! Catalog and ledger tables.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restock_core::{Entity, ItemId, ValueObject};

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Path or URI of the item picture, when the catalog has one.
    pub image_reference: Option<String>,
}

impl Item {
    pub fn display(&self) -> ItemDisplay {
        ItemDisplay {
            name: self.name.clone(),
            description: self.description.clone(),
            image_reference: self.image_reference.clone(),
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.item_id
    }
}

/// Display attributes joined onto derived views.
///
/// All fields are `None` for items that appear in the ledger but not in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDisplay {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_reference: Option<String>,
}

impl ValueObject for ItemDisplay {}

/// Item catalog keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTable {
    items: BTreeMap<ItemId, Item>,
}

impl ItemTable {
    /// Build the catalog. Duplicate ids keep the first row; the ids of dropped
    /// duplicates are returned alongside.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> (Self, Vec<ItemId>) {
        let mut table = BTreeMap::new();
        let mut duplicates = Vec::new();
        for item in items {
            let item_id = item.id().clone();
            if table.contains_key(&item_id) {
                duplicates.push(item_id);
            } else {
                table.insert(item_id, item);
            }
        }
        (Self { items: table }, duplicates)
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.get(item_id)
    }

    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.items.contains_key(item_id)
    }

    /// Left-join helper: display attributes, or all-`None` when the id is unknown.
    pub fn display_for(&self, item_id: &ItemId) -> ItemDisplay {
        self.get(item_id).map(Item::display).unwrap_or_default()
    }

    /// Ids of the catalog items whose name is in `names` (exact match).
    pub fn ids_named<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> BTreeSet<ItemId> {
        let names: BTreeSet<&str> = names.into_iter().collect();
        self.items
            .values()
            .filter(|item| item.name.as_deref().is_some_and(|n| names.contains(n)))
            .map(|item| item.item_id.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One ledger entry. Negative amounts are consumption, positive are replenishment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub item_id: ItemId,
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
}

impl MovementRecord {
    pub fn new(item_id: ItemId, timestamp: NaiveDateTime, amount: Decimal) -> Self {
        Self {
            item_id,
            timestamp,
            amount,
        }
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Immutable movement ledger, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementTable {
    records: Vec<MovementRecord>,
}

impl MovementTable {
    pub fn new(records: Vec<MovementRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest timestamps across the whole ledger.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.first()?.timestamp;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.timestamp), hi.max(r.timestamp))
        }))
    }

    /// Whole days between the earliest and latest timestamp (partial days truncated).
    /// An empty ledger spans zero days.
    pub fn elapsed_days(&self) -> i64 {
        self.span()
            .map(|(lo, hi)| (hi - lo).num_days())
            .unwrap_or(0)
    }

    pub fn item_ids(&self) -> BTreeSet<ItemId> {
        self.records.iter().map(|r| r.item_id.clone()).collect()
    }

    /// Sub-ledger restricted to the given items.
    pub fn retain_items(&self, item_ids: &BTreeSet<ItemId>) -> MovementTable {
        MovementTable::new(
            self.records
                .iter()
                .filter(|r| item_ids.contains(&r.item_id))
                .cloned()
                .collect(),
        )
    }
}

impl FromIterator<MovementRecord> for MovementTable {
    fn from_iter<T: IntoIterator<Item = MovementRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
