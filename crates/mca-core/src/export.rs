use std::io::Write;

use crate::merchant_cash_advance::PaybackSchedule;
use crate::McaResult;

pub const EXPORT_HEADERS: [&str; 2] = ["Day", "Remaining Balance"];
pub const DEFAULT_EXPORT_FILENAME: &str = "remaining_balance.csv";

/// Write the schedule as `Day,Remaining Balance` CSV.
pub fn write_schedule_csv<W: Write>(schedule: &PaybackSchedule, writer: W) -> McaResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for entry in schedule.entries() {
        wtr.write_record([
            entry.day.to_string(),
            entry.remaining_balance.normalize().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn schedule_to_csv_string(schedule: &PaybackSchedule) -> McaResult<String> {
    let mut buf = Vec::new();
    write_schedule_csv(schedule, &mut buf)?;
    String::from_utf8(buf).map_err(|e| crate::McaError::SerializationError(e.to_string()))
}
