//! Value object trait: equality by value, not identity.
//!
//! Every derived view in this system (balances, outflow totals, reorder
//! recommendations) is a value object: it has no identity of its own and is recomputed
//! from the ledger snapshot on every request. Two recommendations with the same values
//! are the same recommendation.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one, compute
/// a new one from the snapshot.
///
/// The trait requires:
/// - **Clone**: values are handed to renderers by copy
/// - **PartialEq**: values are compared by their attributes (idempotence checks rely on it)
/// - **Debug**: values show up in logs and test failures
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Balance {
///     item_id: ItemId,
///     current_balance: Decimal,
/// }
///
/// impl ValueObject for Balance {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
