pub mod parse;
pub mod table;

pub use parse::{parse_metrics, MetricRecord};
pub use table::{column_name, columns, AggregateTable, Condition};
