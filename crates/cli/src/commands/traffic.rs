//! Traffic report commands.

use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;

use lalin_admin::api::LalinApiClient;
use lalin_core::report::{export_filename, traffic_csv};
use lalin_core::stats::{DashboardStats, Tally};

use super::CliError;

/// Write the day's records as CSV to `output`, or stdout when absent.
///
/// # Errors
///
/// Returns `CliError` if the backend fails or the file cannot be written.
pub async fn export(
    api: &LalinApiClient,
    date: NaiveDate,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let records = api.list_traffic(date).await?;
    let csv = traffic_csv(&records);

    match output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            tracing::info!(count = records.len(), path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(csv.as_bytes())?;
            stdout.write_all(b"\n")?;
            tracing::info!(
                count = records.len(),
                suggested = %export_filename(date),
                "Report written to stdout"
            );
        }
    }
    Ok(())
}

/// Print the four dashboard aggregates for `date`.
///
/// # Errors
///
/// Returns `CliError::Api` if either collection cannot be loaded.
pub async fn summary(api: &LalinApiClient, date: NaiveDate) -> Result<(), CliError> {
    let (gates, traffic) = tokio::join!(api.list_gates(), api.list_traffic(date));
    let stats = DashboardStats::compute(&gates?, &traffic?);

    #[allow(clippy::print_stdout)]
    {
        print!("{}", format_summary(date, &stats));
    }
    Ok(())
}

fn format_summary(date: NaiveDate, stats: &DashboardStats) -> String {
    let mut out = format!("Lalin {} ({} records)\n", date.format("%Y-%m-%d"), stats.record_count);
    for (title, tallies) in [
        ("Metode Pembayaran", &stats.payment_totals),
        ("Gerbang", &stats.gate_counts),
        ("Shift", &stats.shift_counts),
        ("Cabang", &stats.branch_counts),
    ] {
        out.push_str(&format!("\n{title}\n"));
        push_tallies(&mut out, tallies);
    }
    out
}

fn push_tallies(out: &mut String, tallies: &[Tally]) {
    if tallies.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    let width = tallies.iter().map(|t| t.label.chars().count()).max().unwrap_or(0);
    for tally in tallies {
        out.push_str(&format!("  {:<width$}  {:>8}\n", tally.label, tally.value));
    }
}
