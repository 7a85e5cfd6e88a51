use crate::http_handler::{Entry, Race};
use crate::start_sequence::format_signed_hms;
use chrono::TimeDelta;
use std::cmp::Ordering;
use std::io::Write;
use std::path::Path;

/// Standing of one entry in a race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    position: usize,
    sail_number: String,
    helm: String,
    class: Option<String>,
    laps: usize,
    elapsed: TimeDelta,
    corrected: Option<TimeDelta>,
}

impl ResultRow {
    pub fn position(&self) -> usize { self.position }
    pub fn sail_number(&self) -> &str { &self.sail_number }
    pub fn helm(&self) -> &str { &self.helm }
    pub fn laps(&self) -> usize { self.laps }
    /// Elapsed time at the last recorded lap.
    pub fn elapsed(&self) -> TimeDelta { self.elapsed }
    /// Elapsed time corrected by the Portsmouth number, handicap races only.
    pub fn corrected(&self) -> Option<TimeDelta> { self.corrected }

    fn ranking_time(&self) -> TimeDelta { self.corrected.unwrap_or(self.elapsed) }
}

/// Record layout of the CSV export.
#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRecord<'a> {
    position: usize,
    sail_number: &'a str,
    helm: &'a str,
    class: &'a str,
    laps: usize,
    elapsed: String,
    corrected: String,
}

/// Corrected time as used for Portsmouth Yardstick handicap racing,
/// `elapsed * 1000 / PN`.
pub fn corrected_time(elapsed: TimeDelta, portsmouth_number: u16) -> Option<TimeDelta> {
    if portsmouth_number == 0 {
        return None;
    }
    Some(TimeDelta::milliseconds(elapsed.num_milliseconds() * 1000 / i64::from(portsmouth_number)))
}

/// Ranks the entries of `race`: more laps first, then the shorter time at
/// the last lap. Handicap races rank on corrected time. Entries without a
/// lap share the last places in entry order.
pub fn positions(race: &Race, entries: &[Entry]) -> Vec<ResultRow> {
    let mut rows: Vec<ResultRow> = entries
        .iter()
        .map(|entry| {
            let class = entry.dinghy().dinghy_class();
            let elapsed = entry.sum_of_lap_times();
            let corrected = if race.is_handicap() {
                class.and_then(|c| c.portsmouth_number()).and_then(|pn| corrected_time(elapsed, pn))
            } else {
                None
            };
            ResultRow {
                position: 0,
                sail_number: entry.dinghy().sail_number().to_string(),
                helm: entry.helm().name().to_string(),
                class: class.map(|c| c.name().to_string()),
                laps: entry.laps().len(),
                elapsed,
                corrected,
            }
        })
        .collect();

    rows.sort_by(|a, b| match b.laps.cmp(&a.laps) {
        Ordering::Equal if a.laps == 0 => Ordering::Equal,
        Ordering::Equal => a.ranking_time().cmp(&b.ranking_time()),
        other => other,
    });
    for (i, row) in rows.iter_mut().enumerate() {
        row.position = i + 1;
    }
    rows
}

/// Writes the result table as CSV with a header row.
pub fn write_csv<W: Write>(rows: &[ResultRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(CsvRecord {
            position: row.position,
            sail_number: &row.sail_number,
            helm: &row.helm,
            class: row.class.as_deref().unwrap_or(""),
            laps: row.laps,
            elapsed: format_signed_hms(row.elapsed),
            corrected: row.corrected.map(format_signed_hms).unwrap_or_default(),
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn export_csv(rows: &[ResultRow], path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_csv(rows, file)
}
