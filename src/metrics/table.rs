use std::collections::HashMap;

use derive_more::Display;

use super::parse::MetricRecord;
use crate::ordered::OrderedMap;

/// Allocator context a run was made under. Displays as its column suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Condition {
    /// The platform's default allocator.
    #[display(fmt = "sys")]
    System,
    /// The allocator substituted by the custom wrapper.
    #[display(fmt = "custom")]
    Custom,
}

impl Condition {
    pub const ALL: [Condition; 2] = [Condition::System, Condition::Custom];
}

/// `{test_path}_{sys|custom}`
pub fn column_name(test_path: &str, condition: Condition) -> String {
    format!("{test_path}_{condition}")
}

/// Every column of the exported table, two per test in input order.
pub fn columns<S: AsRef<str>>(test_paths: &[S]) -> Vec<String> {
    test_paths
        .iter()
        .flat_map(|p| Condition::ALL.map(|c| column_name(p.as_ref(), c)))
        .collect()
}

/// Sparse metric x column table. Rows are kept in the order metrics were
/// first seen, which is also the export order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregateTable {
    rows: OrderedMap<HashMap<String, String>>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one test's records into the table.
    ///
    /// New metric names are appended system-first, then custom. Metrics a
    /// record doesn't carry leave their cells unset.
    pub fn merge(&mut self, test_path: &str, system: &MetricRecord, custom: &MetricRecord) {
        for (condition, record) in [(Condition::System, system), (Condition::Custom, custom)] {
            let column = column_name(test_path, condition);
            for (metric, value) in record.iter() {
                self.rows
                    .get_or_insert_with(metric, HashMap::new)
                    .insert(column.clone(), value.clone());
            }
        }
    }

    pub fn get(&self, metric: &str, column: &str) -> Option<&str> {
        self.rows.get(metric)?.get(column).map(String::as_str)
    }

    /// Distinct metric names in first-seen order.
    pub fn metric_order(&self) -> impl Iterator<Item = &str> {
        self.rows.keys()
    }

    pub fn metric_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
