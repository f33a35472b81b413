use serde_json::{Map, Value};
use std::io::{self, Write};

use super::format_scalar;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(value, stdout.lock());
}

/// Envelopes with a tabular field (e.g. a schedule) are written as that
/// table; everything else as two-column `field,value` rows.
fn write_csv<W: Write>(value: &Value, out: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some(rows) = first_table(body) {
                write_array_csv(&mut wtr, rows)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in body {
                    wtr.write_record([key.as_str(), &format_scalar(val)])?;
                }
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr)?,
        _ => wtr.write_record([&format_scalar(value)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn first_table(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    map.values().find_map(|v| match v {
        Value::Array(rows) if rows.first().is_some_and(Value::is_object) => Some(rows),
        _ => None,
    })
}

fn write_array_csv<W: Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) -> Result<(), csv::Error> {
    if arr.is_empty() {
        return Ok(());
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        wtr.write_record(&headers)?;

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                    .collect();
                wtr.write_record(&row)?;
            }
        }
    } else {
        for item in arr {
            wtr.write_record([&format_scalar(item)])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(value, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_envelope_writes_rows() {
        let v = json!({"result": {
            "total_payback": "60",
            "schedule": [
                {"day": 0, "remaining_balance": "60"},
                {"day": 1, "remaining_balance": "30"}
            ]
        }});
        let out = render(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["day,remaining_balance", "0,60", "1,30"]);
    }

    #[test]
    fn test_scalar_envelope_writes_fields() {
        let v = json!({"result": {"payback_days": 600}});
        let out = render(&v);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["field,value", "payback_days,600"]);
    }
}
