//! Uploaded cash-flow data.
//!
//! The merchant's historical cash flows are loaded for review alongside the
//! projection. They do not feed the payback calculation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

use crate::error::McaError;
use crate::types::Money;
use crate::McaResult;

/// A header row plus string cells, as read from a CSV or spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Numeric profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub total: Money,
    pub min: Money,
    pub max: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<ColumnSummary>,
}

impl CashFlowTable {
    /// Build a table, padding short rows so every row has one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> McaResult<Self> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(McaError::InsufficientData(
                "Cash flow file has no header row".into(),
            ));
        }

        let width = headers.len();
        let rows = rows
            .into_iter()
            .filter(|r| r.iter().any(|c| !c.trim().is_empty()))
            .map(|mut r| {
                r.resize(width.max(r.len()), String::new());
                r
            })
            .collect();

        Ok(Self { headers, rows })
    }

    /// Parse CSV with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> McaResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        let table = Self::new(headers, rows)?;
        log::debug!(
            "loaded cash flow table: {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Totals, minima and maxima for every column whose non-empty cells all
    /// parse as amounts. Currency symbols and thousands separators are ignored.
    pub fn summary(&self) -> CashFlowSummary {
        let numeric_columns = self
            .headers
            .iter()
            .enumerate()
            .filter_map(|(idx, name)| self.summarize_column(idx, name))
            .collect();

        CashFlowSummary {
            row_count: self.row_count(),
            column_count: self.column_count(),
            numeric_columns,
        }
    }

    fn summarize_column(&self, idx: usize, name: &str) -> Option<ColumnSummary> {
        let mut values = Vec::new();
        for row in &self.rows {
            let cell = row.get(idx).map(|c| c.trim()).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            values.push(parse_amount(cell)?);
        }

        let first = *values.first()?;
        // A column whose total overflows is left out of the summary.
        let (min, max, total) = values.iter().try_fold(
            (first, first, Decimal::ZERO),
            |(min, max, total), v| Some((min.min(*v), max.max(*v), total.checked_add(*v)?)),
        )?;

        Some(ColumnSummary {
            column: name.to_string(),
            count: values.len(),
            total,
            min,
            max,
        })
    }
}

/// Parse "1,234.50", "$99" or "(250.00)" style amounts.
fn parse_amount(cell: &str) -> Option<Money> {
    let (negative, body) = match cell.strip_prefix('(').and_then(|c| c.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, cell),
    };
    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    Some(if negative { -value } else { value })
}
