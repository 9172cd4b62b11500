//! CSV and JSON rendering of the aggregate table

use std::{fs::File, io, path::Path};

use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use thiserror::Error;

use crate::metrics::{columns, AggregateTable};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub struct CsvExporter;

impl CsvExporter {
    /// Writes a `Metric` column plus `_sys` and `_custom` columns for every
    /// test path, whether or not the test produced data. One row per metric,
    /// in first-seen order; unobserved cells are empty. Records end in
    /// `\r\n`.
    pub fn write<W: io::Write, S: AsRef<str>>(
        table: &AggregateTable,
        test_paths: &[S],
        writer: W,
    ) -> Result<(), ExportError> {
        let columns = columns(test_paths);
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(writer);

        wtr.write_record(std::iter::once("Metric").chain(columns.iter().map(String::as_str)))?;
        for metric in table.metric_order() {
            wtr.write_record(
                std::iter::once(metric)
                    .chain(columns.iter().map(|c| table.get(metric, c).unwrap_or(""))),
            )?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn to_string<S: AsRef<str>>(
        table: &AggregateTable,
        test_paths: &[S],
    ) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        Self::write(table, test_paths, &mut buf)?;
        // every field came from a `&str`
        Ok(String::from_utf8(buf).unwrap_or_else(|e| unreachable!("csv output is not utf-8: {e}")))
    }

    /// Creates or truncates `path`.
    pub fn export<S: AsRef<str>>(
        table: &AggregateTable,
        test_paths: &[S],
        path: &Path,
    ) -> Result<(), ExportError> {
        Self::write(table, test_paths, File::create(path)?)
    }
}

#[derive(Debug, Serialize)]
struct JsonTable<'a> {
    columns: Vec<String>,
    rows: Vec<JsonRow<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonRow<'a> {
    metric: &'a str,
    cells: Vec<Option<&'a str>>,
}

pub struct JsonExporter;

impl JsonExporter {
    /// Same shape as the CSV, with unobserved cells as `null`.
    pub fn to_value<S: AsRef<str>>(
        table: &AggregateTable,
        test_paths: &[S],
    ) -> Result<serde_json::Value, ExportError> {
        let columns = columns(test_paths);
        let rows = table
            .metric_order()
            .map(|metric| JsonRow {
                metric,
                cells: columns.iter().map(|c| table.get(metric, c)).collect(),
            })
            .collect();
        Ok(serde_json::to_value(JsonTable { columns, rows })?)
    }

    pub fn export<S: AsRef<str>>(
        table: &AggregateTable,
        test_paths: &[S],
        path: &Path,
    ) -> Result<(), ExportError> {
        let value = Self::to_value(table, test_paths)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &value)?;
        Ok(())
    }
}
