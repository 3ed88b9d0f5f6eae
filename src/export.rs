use std::io::Write;

use crate::error::Result;
use crate::format::format_fixed;
use crate::schedule::Schedule;

/// Column headers of the exported table.
pub const CSV_HEADER: [&str; 6] = [
    "Mes",
    "Saldo inicial",
    "Cuota",
    "Interes",
    "Amortizacion",
    "Saldo final",
];

/// Writes `schedule` as CSV: a header row, then one row per period with
/// every amount fixed to two decimals and no currency symbol.
pub fn write_csv<W: Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for record in schedule {
        wtr.write_record([
            record.period.to_string(),
            format_fixed(record.opening_balance),
            format_fixed(record.payment),
            format_fixed(record.interest),
            format_fixed(record.principal),
            format_fixed(record.closing_balance),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders `schedule` as CSV in memory, header included.
pub fn to_csv_string(schedule: &Schedule) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(schedule, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Download name for an export in `currency`, e.g. `tabla_amortizacion_MXN.csv`.
pub fn export_file_name(currency: &str) -> String {
    format!("tabla_amortizacion_{}.csv", currency.to_ascii_uppercase())
}
