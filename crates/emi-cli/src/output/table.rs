use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{is_row_list, scalar_text};

/// Format output as tables using the tabled crate.
///
/// Scalars (and nested objects, flattened with dotted keys) go into a
/// Field/Value table; every list of rows, such as the installments, gets a
/// table of its own.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", scalar_text(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
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
    let mut fields: Vec<(String, String)> = Vec::new();
    let mut row_lists: Vec<(&str, &[Value])> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(arr) if is_row_list(val) => row_lists.push((key.as_str(), arr.as_slice())),
            _ => flatten_into(key, val, &mut fields),
        }
    }

    if !fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &fields {
            builder.push_record([key.as_str(), val.as_str()]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in row_lists {
        println!("\n{}:", name);
        print_array_table(rows);
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten_into(&format!("{}.{}", prefix, key), val, out);
            }
        }
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(scalar_text).collect();
            out.push((prefix.to_string(), items.join(", ")));
        }
        _ => out.push((prefix.to_string(), scalar_text(value))),
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}
