use colored::Colorize;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar;

/// Format output as tables using the tabled crate.
///
/// Scalar fields go in a Field/Value table; nested lists such as the pro
/// forma or benchmark assessments get a table of their own underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => print_envelope(result, map),
            None => print_object(map),
        },
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", scalar(value)),
    }
}

fn print_envelope(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => print_table(other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(&str, &Value)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => sections.push((key, val)),
            Value::Object(_) => sections.push((key, val)),
            _ => builder.push_record([key.as_str(), &cell(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in sections {
        println!("\n{}", heading(key).bold());
        match val {
            Value::Array(items) if key == "assessments" => print_assessments(items),
            Value::Array(items) => print_rows(items),
            Value::Object(inner) => print_object(inner),
            _ => {}
        }
    }
}

/// One row per object; columns are the union of keys in first-seen order.
fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }
    if !arr.iter().any(Value::is_object) {
        for item in arr {
            println!("{}", scalar(item));
        }
        return;
    }

    let mut headers: Vec<&str> = Vec::new();
    for item in arr {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key);
                }
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(cell).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

/// Benchmark ratings, flattened from the nested rating object.
fn print_assessments(items: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value", "Rating", "Near preferred", "Range", "Source / reason"]);

    for item in items {
        let metric = item.get("metric").map(scalar).unwrap_or_default();
        let value = item.get("value").map(scalar).unwrap_or_default();
        let rating = item.get("rating").and_then(Value::as_object);
        let row = match rating {
            Some(r) if r.get("status").and_then(Value::as_str) == Some("rated") => {
                let bench = r.get("benchmark");
                let bound = |k: &str| bench.and_then(|b| b.get(k)).map(scalar).unwrap_or_default();
                [
                    metric,
                    value,
                    r.get("classification").map(scalar).unwrap_or_default(),
                    r.get("within_preferred")
                        .and_then(Value::as_bool)
                        .map(|b| if b { "yes" } else { "no" }.to_string())
                        .unwrap_or_default(),
                    format!("{} - {}", bound("min"), bound("max")),
                    bound("source"),
                ]
            }
            Some(r) => [
                metric,
                value,
                "N/A".to_string(),
                String::new(),
                String::new(),
                r.get("reason").map(scalar).unwrap_or_default(),
            ],
            None => [metric, value, "N/A".to_string(), String::new(), String::new(), String::new()],
        };
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn cell(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(scalar).collect::<Vec<_>>().join(", "),
        other => scalar(other),
    }
}

fn heading(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
