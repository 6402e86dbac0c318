use serde_json::Value;

use super::scalar;

/// Result fields worth printing on their own, most telling first.
const PRIORITY_KEYS: [&str; 7] = [
    "classification",
    "dscr",
    "cap_rate",
    "cash_on_cash",
    "mortgage_constant",
    "total_cash_flow",
    "overall_confidence",
];

/// Print just the headline value.
///
/// Objects print the first priority field present, falling back to the
/// first field. Lists print one line per entry.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key) {
                    if !val.is_null() {
                        println!("{}", scalar(val));
                        return;
                    }
                }
            }
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar(val));
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", summary_line(item));
            }
        }
        other => println!("{}", scalar(other)),
    }
}

/// One line for a list entry: a benchmark row, a checklist item, or anything else.
fn summary_line(item: &Value) -> String {
    let Value::Object(map) = item else {
        return scalar(item);
    };
    let field = |k: &str| map.get(k).map(scalar).unwrap_or_default();

    if map.contains_key("preferred") {
        format!(
            "{} {} {}: {} / {} / {}",
            field("asset_class"),
            field("tier"),
            field("metric"),
            field("min"),
            field("preferred"),
            field("max")
        )
    } else if map.contains_key("title") {
        format!("[{}] {}", field("category"), field("title"))
    } else {
        map.values().next().map(scalar).unwrap_or_default()
    }
}
