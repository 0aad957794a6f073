//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog item (the `Item ID` join key shared by both input tables).
///
/// Source sheets use free-form codes, so this wraps the trimmed text rather than a
/// number. Ordering is lexicographic, which fixes the order of every keyed view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Parse an identifier, rejecting blank values.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("ItemId: blank value"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id: ItemId = "  A-100 ".parse().unwrap();
        assert_eq!(id.as_str(), "A-100");
        assert_eq!(id.to_string(), "A-100");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(ItemId::parse("   "), Err(DomainError::InvalidId(_))));
        assert!(ItemId::try_from(String::new()).is_err());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = ItemId::parse("A").unwrap();
        let b = ItemId::parse("B").unwrap();
        assert!(a < b);
    }
}
