use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_object, result_rows};

/// Print the row array as one table, then the scalar totals beneath it.
pub fn print_table(value: &Value) {
    if let Some(rows) = result_rows(value) {
        print_array_table(rows);
    }

    if let Some(result) = result_object(value) {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        let mut any = false;
        for (key, val) in result {
            if val.is_array() || val.is_object() {
                continue;
            }
            builder.push_record([key.as_str(), &format_scalar(val)]);
            any = true;
        }
        if any {
            println!("\n{}", Table::from(builder));
        }
    } else {
        println!("{}", value);
    }

    let envelope = value.as_object();

    if let Some(Value::Array(warnings)) = envelope.and_then(|m| m.get("warnings")) {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.and_then(|m| m.get("methodology")) {
        println!("\nMethodology: {}", meth);
    }
}

fn print_array_table(arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
