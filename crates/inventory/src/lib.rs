//! Inventory analytics module.
//!
//! This crate contains the replenishment computations, implemented purely as
//! deterministic transforms over an immutable ledger snapshot (no IO, no rendering,
//! no storage):
//!
//! - [`balance`]: net stock per item
//! - [`consumption`]: full-history daily rates and trailing-window outflow totals
//! - [`planner`]: reorder recommendations for a coverage window
//! - [`summary`]: multi-window consumption summary and monthly movement

pub mod balance;
pub mod consumption;
pub mod days;
pub mod model;
pub mod planner;
pub mod summary;

pub use balance::{Balance, BalanceMap, BalanceStatus, balance_of, balance_rows, balances};
pub use consumption::{RateMap, WindowOutflow, full_history_daily_rate, trailing_window_outflow};
pub use days::{CoverageDays, STANDARD_WINDOWS, WindowDays};
pub use model::{Item, ItemDisplay, ItemTable, MovementRecord, MovementTable};
pub use planner::{
    RatePolicy, ReorderPlanner, ReorderRecommendation, ReorderStatus, plan_from, rank_by,
    required_quantity,
};
pub use summary::{
    WindowRecommendation, WindowSummaryRow, YearMonth, monthly_movement, window_summary,
};
