use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{render_scalar, result_rows};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value.as_object() {
        Some(envelope) => match envelope.get("result") {
            Some(result) => print_result(result, envelope),
            None => print_fields(envelope),
        },
        None => println!("{}", render_scalar(value, "null")),
    }
}

fn print_result(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(fields) = result {
        // Scalar summary first, then the schedule rows underneath.
        let summary: Map<String, Value> = fields
            .iter()
            .filter(|(key, _)| key.as_str() != "rows")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        print_fields(&summary);

        if let Some(rows) = result_rows(result) {
            println!();
            print_rows(rows);
        }
    } else {
        println!("{}", render_scalar(result, "null"));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(fields: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key.clone(), render_scalar(val, "null")]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());

    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(|v| render_scalar(v, "")).unwrap_or_default())
            .collect();
        builder.push_record(record);
    }

    println!("{}", Table::from(builder));
}
