use serde_json::Value;
use std::io;

use super::scalar;

/// Write output as CSV to stdout.
///
/// Lists become one row per entry. Objects become `field,value` pairs with
/// nested values addressed by dotted path (`proforma.0.noi`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        Value::Object(_) => {
            let _ = wtr.write_record(["field", "value"]);
            let mut pairs = Vec::new();
            flatten("", body, &mut pairs);
            for (key, val) in pairs {
                let _ = wtr.write_record([key.as_str(), val.as_str()]);
            }
            if let Some(Value::Array(warnings)) = value.get("warnings") {
                for (i, w) in warnings.iter().enumerate() {
                    let _ = wtr.write_record([format!("warnings.{i}"), scalar(w)]);
                }
            }
        }
        _ => {
            let _ = wtr.write_record([&scalar(body)]);
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&path(key), val, out);
            }
        }
        Value::Array(arr) => {
            for (i, val) in arr.iter().enumerate() {
                flatten(&path(&i.to_string()), val, out);
            }
        }
        Value::Null => out.push((prefix.to_string(), String::new())),
        other => out.push((prefix.to_string(), scalar(other))),
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar(item)]);
        }
    }
}
