use serde_json::{Map, Value};
use std::io;

use super::{is_row_list, scalar_text};

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A result holding a list of rows (the installments) is written as that
/// table; otherwise a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            match body.values().find(|v| is_row_list(v)) {
                Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
                _ => write_fields_csv(&mut wtr, body),
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields_csv(wtr: &mut StdoutCsv<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
    }
}

fn write_array_csv(wtr: &mut StdoutCsv<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    // Extract headers from first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
    }
}
