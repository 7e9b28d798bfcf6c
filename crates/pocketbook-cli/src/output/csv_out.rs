use serde_json::Value;
use std::io;

use super::{render_scalar, result_rows};

type StdoutCsv<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// Schedules become one CSV row per month; any other result becomes a
/// two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    if let Some(rows) = result_rows(result) {
        write_rows(&mut wtr, rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &render_scalar(val, "")]);
        }
    } else {
        let _ = wtr.write_record([&render_scalar(result, "")]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut StdoutCsv<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(|v| render_scalar(v, "")).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&record);
    }
}
