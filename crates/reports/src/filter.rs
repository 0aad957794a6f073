//! Renderer-side filters.

use std::borrow::Cow;
use std::collections::BTreeSet;

use rust_decimal::Decimal;

use restock_inventory::{ItemDisplay, ItemTable, MovementTable};

/// Balance report filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceFilter {
    /// Case-insensitive substring of the item name. Items without a name never match.
    pub name_contains: Option<String>,
    pub negative_only: bool,
}

impl BalanceFilter {
    pub fn matches(&self, display: &ItemDisplay, balance: Decimal) -> bool {
        if self.negative_only && balance >= Decimal::ZERO {
            return false;
        }
        match self.name_contains.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => display
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle.to_lowercase())),
        }
    }
}

/// Restricts consumption views to catalog items with the given names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    names: Option<BTreeSet<String>>,
}

impl ItemFilter {
    /// No restriction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_all(&self) -> bool {
        self.names.is_none()
    }

    /// The ledger restricted to matching items. Ledger items missing from the catalog
    /// have no name and are excluded whenever a name filter is active.
    pub fn apply<'a>(&self, catalog: &ItemTable, movements: &'a MovementTable) -> Cow<'a, MovementTable> {
        match &self.names {
            None => Cow::Borrowed(movements),
            Some(names) => {
                let ids = catalog.ids_named(names.iter().map(String::as_str));
                Cow::Owned(movements.retain_items(&ids))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: Option<&str>) -> ItemDisplay {
        ItemDisplay {
            name: name.map(str::to_string),
            ..ItemDisplay::default()
        }
    }

    #[test]
    fn name_search_is_case_insensitive() {
        let filter = BalanceFilter {
            name_contains: Some("GLOV".to_string()),
            negative_only: false,
        };
        assert!(filter.matches(&named(Some("Nitrile gloves")), Decimal::ONE));
        assert!(!filter.matches(&named(Some("Tape")), Decimal::ONE));
        assert!(!filter.matches(&named(None), Decimal::ONE));
    }

    #[test]
    fn negative_only_keeps_negative_balances() {
        let filter = BalanceFilter {
            name_contains: None,
            negative_only: true,
        };
        assert!(filter.matches(&named(None), Decimal::NEGATIVE_ONE));
        assert!(!filter.matches(&named(None), Decimal::ZERO));
    }

    #[test]
    fn blank_search_matches_everything() {
        let filter = BalanceFilter {
            name_contains: Some("  ".to_string()),
            negative_only: false,
        };
        assert!(filter.matches(&named(None), Decimal::ONE));
    }
}
