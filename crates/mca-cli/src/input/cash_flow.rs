use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::path::Path;

use mca_core::cash_flow::CashFlowTable;

use super::file::{extension, resolve_path};

const SPREADSHEET_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

/// Load an uploaded cash-flow file. CSV goes through the csv reader, Excel
/// and OpenDocument workbooks through calamine (first worksheet only).
pub fn read_cash_flow_file(path: &str) -> Result<CashFlowTable, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;

    match extension(&canonical).as_deref() {
        Some("csv") => {
            let file = File::open(&canonical)
                .map_err(|e| format!("Failed to open '{}': {}", canonical.display(), e))?;
            Ok(CashFlowTable::from_csv_reader(file)?)
        }
        Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => read_workbook(&canonical),
        _ => Err(format!(
            "Unsupported file '{}': upload a CSV or Excel file (.csv, .xlsx)",
            canonical.display()
        )
        .into()),
    }
}

fn read_workbook(path: &Path) -> Result<CashFlowTable, Box<dyn std::error::Error>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open '{}': {}", path.display(), e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| format!("'{}' contains no worksheets", path.display()))??;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let table = CashFlowTable::new(headers, rows.collect())?;

    log::debug!(
        "loaded worksheet from {}: {} rows x {} columns",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("  Deposits ".into())), "Deposits");
        assert_eq!(cell_text(&Data::Float(1200.0)), "1200");
        assert_eq!(cell_text(&Data::Float(950.5)), "950.5");
        assert_eq!(cell_text(&Data::Int(42)), "42");
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join("mca_cash_flow_upload_test.txt");
        std::fs::write(&path, "Day,Revenue\n1,100\n").unwrap();
        let err = read_cash_flow_file(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("upload a CSV or Excel file"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_csv_upload() {
        let path = std::env::temp_dir().join("mca_cash_flow_upload_test.csv");
        std::fs::write(&path, "Day,Revenue\n1,100\n2,250\n").unwrap();
        let table = read_cash_flow_file(path.to_str().unwrap()).unwrap();
        assert_eq!(table.headers, vec!["Day", "Revenue"]);
        assert_eq!(table.row_count(), 2);
        let _ = std::fs::remove_file(path);
    }
}
