use serde_json::Value;

use super::format_scalar;

/// Priority list of headline fields, most specific first.
const PRIORITY_KEYS: [&str; 4] = [
    "estimated_payback_days",
    "payoff_day",
    "total_payback",
    "daily_collections",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

/// Look for well-known result fields in priority order, then fall back to
/// the first scalar field in the result object.
fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in &PRIORITY_KEYS {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    return format_scalar(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}
