//! Column/row form of every report, shared by the exporters.

use rust_decimal::Decimal;
use serde::Serialize;

use restock_inventory::ItemDisplay;

use crate::report::{
    BalanceReport, LedgerStats, MonthlyReport, PlanReport, RankingReport, WindowSummaryReport,
};

/// A titled table of text cells. Column order is the export order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new<I, S>(title: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width must match header");
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub trait ToTable {
    fn to_table(&self) -> ReportTable;
}

/// Quantities print without trailing zeros (`60`, `-2.5`).
pub fn fmt_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Rates print with at most four decimals.
pub fn fmt_rate(value: Decimal) -> String {
    value.round_dp(4).normalize().to_string()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn name(display: &ItemDisplay) -> String {
    text(&display.name)
}

pub const RECOMMENDATION_COLUMNS: [&str; 9] = [
    "Item ID",
    "Name",
    "Description",
    "Image",
    "Consumption Rate",
    "Current Balance",
    "Required Quantity",
    "Shortfall",
    "Status",
];

pub const BALANCE_COLUMNS: [&str; 4] = ["Item ID", "Name", "Current Balance", "Status"];

impl ToTable for PlanReport {
    fn to_table(&self) -> ReportTable {
        let title = format!(
            "Reorder plan: {} coverage ({})",
            self.coverage,
            self.policy.label()
        );
        let mut table = ReportTable::new(title, RECOMMENDATION_COLUMNS);
        for r in &self.rows {
            table.push_row(vec![
                r.item_id.to_string(),
                name(&r.display),
                text(&r.display.description),
                text(&r.display.image_reference),
                fmt_rate(r.consumption_rate),
                fmt_quantity(r.current_balance),
                fmt_quantity(r.required_quantity),
                fmt_quantity(r.shortfall),
                r.status.as_str().to_string(),
            ]);
        }
        table
    }
}

impl ToTable for BalanceReport {
    fn to_table(&self) -> ReportTable {
        let mut table = ReportTable::new("Current balance", BALANCE_COLUMNS);
        for r in &self.rows {
            table.push_row(vec![
                r.item_id.to_string(),
                name(&r.display),
                fmt_quantity(r.current_balance),
                r.status.as_str().to_string(),
            ]);
        }
        table
    }
}

impl ToTable for RankingReport {
    fn to_table(&self) -> ReportTable {
        let mut table = ReportTable::new(
            format!("Most consumed items (last {})", self.window),
            vec![
                "Rank".to_string(),
                "Item ID".to_string(),
                "Name".to_string(),
                format!("Consumption {}", self.window),
            ],
        );
        for r in &self.rows {
            table.push_row(vec![
                r.rank.to_string(),
                r.item_id.to_string(),
                name(&r.display),
                fmt_quantity(r.outflow),
            ]);
        }
        table
    }
}

impl ToTable for WindowSummaryReport {
    fn to_table(&self) -> ReportTable {
        let mut columns = vec!["Item ID".to_string(), "Name".to_string()];
        columns.extend(self.windows.iter().map(|w| format!("Consumption {w}")));
        columns.push("Current Balance".to_string());
        columns.push(format!("Recommendation (vs {})", self.comparison));

        let mut table = ReportTable::new("Consumption by window", columns);
        for r in &self.rows {
            let mut row = vec![r.item_id.to_string(), name(&r.display)];
            row.extend(r.outflows.iter().map(|(_, total)| fmt_quantity(*total)));
            row.push(fmt_quantity(r.current_balance));
            row.push(r.recommendation.as_str().to_string());
            table.push_row(row);
        }
        table
    }
}

impl ToTable for MonthlyReport {
    fn to_table(&self) -> ReportTable {
        let mut table = ReportTable::new("Net movement per month", ["Month", "Net Movement"]);
        for (month, total) in &self.months {
            table.push_row(vec![month.to_string(), fmt_quantity(*total)]);
        }
        table
    }
}

impl ToTable for LedgerStats {
    fn to_table(&self) -> ReportTable {
        let timestamp = |t: Option<chrono::NaiveDateTime>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default()
        };
        let mut table = ReportTable::new("Ledger statistics", ["Metric", "Value"]);
        let metrics = [
            ("Movement records", self.movement_records.to_string()),
            ("Skipped rows", self.skipped_rows.to_string()),
            ("Duplicate catalog ids", self.duplicate_catalog_ids.to_string()),
            ("Catalog items", self.catalog_items.to_string()),
            ("Items in ledger", self.ledger_items.to_string()),
            ("Ledger items missing from catalog", self.ledger_items_missing_from_catalog.to_string()),
            ("Catalog items without movements", self.catalog_items_without_movements.to_string()),
            ("First movement", timestamp(self.first_movement)),
            ("Last movement", timestamp(self.last_movement)),
            ("Elapsed days", self.elapsed_days.to_string()),
        ];
        for (metric, value) in metrics {
            table.push_row(vec![metric.to_string(), value]);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::ItemId;
    use restock_inventory::{
        BalanceStatus, CoverageDays, RatePolicy, ReorderRecommendation, ReorderStatus,
    };

    use crate::report::BalanceReportRow;

    #[test]
    fn number_formatting() {
        assert_eq!(fmt_quantity(Decimal::new(6000, 2)), "60");
        assert_eq!(fmt_quantity(Decimal::new(-25, 1)), "-2.5");
        assert_eq!(fmt_rate(Decimal::from(10) / Decimal::from(3)), "3.3333");
        assert_eq!(fmt_rate(Decimal::from(4)), "4");
    }

    #[test]
    fn plan_table_keeps_recommendation_columns() {
        let report = PlanReport {
            coverage: CoverageDays::new(30).unwrap(),
            policy: RatePolicy::FullHistory,
            rows: vec![ReorderRecommendation {
                item_id: ItemId::parse("A").unwrap(),
                display: ItemDisplay {
                    name: Some("Gloves".to_string()),
                    description: None,
                    image_reference: None,
                },
                in_catalog: true,
                consumption_rate: Decimal::from(4),
                current_balance: Decimal::from(60),
                required_quantity: Decimal::from(120),
                shortfall: Decimal::from(60),
                status: ReorderStatus::ReorderNeeded,
            }],
        };
        let table = report.to_table();
        assert_eq!(table.columns, RECOMMENDATION_COLUMNS.map(String::from).to_vec());
        assert_eq!(
            table.rows[0],
            vec!["A", "Gloves", "", "", "4", "60", "120", "60", "reorder_needed"]
        );
        assert!(table.title.contains("30d"));
    }

    #[test]
    fn balance_table_columns() {
        let report = BalanceReport {
            rows: vec![BalanceReportRow {
                item_id: ItemId::parse("Z").unwrap(),
                display: ItemDisplay::default(),
                in_catalog: false,
                current_balance: Decimal::from(-3),
                status: BalanceStatus::Negative,
            }],
        };
        let table = report.to_table();
        assert_eq!(table.columns, BALANCE_COLUMNS.map(String::from).to_vec());
        assert_eq!(table.rows[0], vec!["Z", "", "-3", "negative"]);
    }
}
