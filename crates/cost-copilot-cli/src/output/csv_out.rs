use serde_json::{Map, Value};
use std::io::{self, Write};

use super::{primary_rows, result_object, scalar_text};

/// Write output as CSV to stdout.
///
/// The first list of records in the result (products, impacts, plays)
/// becomes the table; otherwise the result is written as field,value rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV write error: {}", e);
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);

    match result_object(value) {
        Some(map) => match primary_rows(map) {
            Some((_, rows)) => write_rows(&mut wtr, rows)?,
            None => write_fields(&mut wtr, map)?,
        },
        None => wtr.write_record([scalar_text(value, "")])?,
    }

    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    map: &Map<String, Value>,
) -> Result<(), csv::Error> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in map {
        wtr.write_record([key.as_str(), &scalar_text(val, "")])?;
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let headers: Vec<&str> = match rows.first() {
        Some(Value::Object(first)) => first.keys().map(String::as_str).collect(),
        _ => return Ok(()),
    };
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(|v| scalar_text(v, "")).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    Ok(())
}
