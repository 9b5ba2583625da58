//! CSV export of a day's traffic records.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::TrafficRecord;
use crate::types::PaymentMethod;

/// Header row of the export.
pub const CSV_HEADER: [&str; 14] = [
    "ID", "Gerbang", "Tanggal", "Waktu", "Shift", "Tunai", "Mandiri", "BRI", "BNI", "BCA", "Nobu",
    "DKI", "Mega", "Flo",
];

/// MIME type of the export.
pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Download filename for the report of `date`.
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("lalin_report_{}.csv", date.format("%Y-%m-%d"))
}

/// Render `records` as CSV.
///
/// The header is a bare comma-separated line. Every data field is quoted and
/// embedded quotes are doubled. Rows are separated by `\n` without a trailing
/// newline.
#[must_use]
pub fn traffic_csv(records: &[TrafficRecord]) -> String {
    let mut csv = CSV_HEADER.join(",");
    for record in records {
        csv.push('\n');
        write_row(&mut csv, &row_fields(record));
    }
    csv
}

fn row_fields(record: &TrafficRecord) -> Vec<String> {
    let mut fields = vec![
        record.id.to_string(),
        record.gate_id.to_string(),
        record.timestamp.long_date_id(),
        record.timestamp.time_of_day(),
        record.shift_code.to_string(),
        record.payments.cash.to_string(),
    ];
    fields.extend(
        PaymentMethod::ELECTRONIC
            .iter()
            .map(|method| record.payments.get(*method).to_string()),
    );
    fields
}

fn write_row(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    }
}
