//! `restock` command-line front end.
//!
//! Loads the item catalog and movement ledger once, then renders one report per
//! invocation through [`restock_reports::InventoryReports`].

pub mod args;
pub mod commands;
pub mod config;
pub mod output;

pub use args::Cli;
pub use commands::{execute, run};
pub use config::RestockConfig;
