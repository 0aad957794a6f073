//! Validated day counts (coverage horizons and trailing windows).

use serde::{Deserialize, Serialize};

use restock_core::{DomainError, DomainResult};

/// Number of forward days of consumption a reorder plan should cover.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CoverageDays(u32);

/// Length of a trailing consumption window, in days.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WindowDays(u32);

macro_rules! impl_day_count {
    ($t:ident, $name:literal) => {
        impl $t {
            /// Create a day count; zero days is rejected.
            pub fn new(days: u32) -> DomainResult<Self> {
                if days == 0 {
                    return Err(DomainError::validation(concat!($name, " must be at least one day")));
                }
                Ok(Self(days))
            }

            pub fn get(self) -> u32 {
                self.0
            }

            pub fn as_duration(self) -> chrono::Duration {
                chrono::Duration::days(i64::from(self.0))
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}d", self.0)
            }
        }

        impl TryFrom<u32> for $t {
            type Error = DomainError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for u32 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl From<$t> for rust_decimal::Decimal {
            fn from(value: $t) -> Self {
                rust_decimal::Decimal::from(value.0)
            }
        }
    };
}

impl_day_count!(CoverageDays, "coverage days");
impl_day_count!(WindowDays, "window days");

/// The trailing windows offered by the consumption views.
pub const STANDARD_WINDOWS: [WindowDays; 4] = [WindowDays(7), WindowDays(15), WindowDays(30), WindowDays(45)];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_days_is_rejected() {
        assert!(matches!(CoverageDays::new(0), Err(DomainError::Validation(_))));
        assert!(WindowDays::try_from(0).is_err());
    }

    #[test]
    fn display_and_conversion() {
        let w = WindowDays::new(30).unwrap();
        assert_eq!(w.to_string(), "30d");
        assert_eq!(u32::from(w), 30);
        assert_eq!(w.as_duration(), chrono::Duration::days(30));
        assert_eq!(STANDARD_WINDOWS.map(WindowDays::get), [7, 15, 30, 45]);
    }
}
