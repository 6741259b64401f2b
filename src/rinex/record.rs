use crate::{
    prelude::{Constellation, Epoch, SV},
    time::calendar,
};
use hifitime::Unit;
use log::debug;
use thiserror::Error;

use super::{
    column,
    header::{Header, Version},
};

/// Navigation records are parsed as fixed blocks of this many lines
pub const RECORD_LINES: usize = 8;

/// Ephemeris validity window opens this many hours before Time of Clock
pub const VALIDITY_HOURS_BEFORE_TOC: i64 = 2;

/// Ephemeris validity window closes this many hours after Time of Clock
pub const VALIDITY_HOURS_AFTER_TOC: i64 = 4;

/// Causes for a navigation record to be dropped. These never abort
/// a file parsing: they are logged and the record is skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("truncated record: {0} lines remaining")]
    Truncated(usize),
    #[error("invalid satellite identifier \"{0}\"")]
    InvalidSatellite(String),
    #[error("invalid {field} \"{value}\"")]
    InvalidField { field: &'static str, value: String },
    #[error("invalid time of clock")]
    InvalidEpoch,
}

/// Ephemeris record, reduced to the data needed to determine
/// its validity window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EphemerisRecord {
    /// Satellite
    pub sv: SV,
    /// Time of Clock
    pub toc: Epoch,
    /// Time of Ephemeris. Not extracted from the broadcast parameters:
    /// always equals [Self::toc].
    pub toe: Epoch,
    /// Start of validity
    pub validity_start: Epoch,
    /// End of validity
    pub validity_end: Epoch,
    /// Health flag
    pub health: u8,
}

impl EphemerisRecord {
    /// Satellite system
    pub fn constellation(&self) -> Constellation {
        self.sv.constellation
    }
    /// Satellite number within its system
    pub fn satellite_number(&self) -> u8 {
        self.sv.prn
    }
    /// Parses the record starting on the first line of `block`
    pub(crate) fn parse(block: &[&str], header: &Header) -> Result<Self, RecordError> {
        if block.len() < RECORD_LINES {
            return Err(RecordError::Truncated(block.len()));
        }
        let line = block[0];
        let (sv, toc) = match header.version {
            Version::V2 => Self::parse_v2_epoch(line, header)?,
            Version::V3 | Version::V4 => Self::parse_v3_epoch(line, header)?,
        };
        Ok(Self::from_toc(sv, toc))
    }
    fn from_toc(sv: SV, toc: Epoch) -> Self {
        Self {
            sv,
            toc,
            toe: toc,
            validity_start: calendar::shift(toc, -VALIDITY_HOURS_BEFORE_TOC * Unit::Hour),
            validity_end: calendar::shift(toc, VALIDITY_HOURS_AFTER_TOC * Unit::Hour),
            health: 0,
        }
    }
    /// V2: "PRN YY MM DD HH MM SS.S"
    fn parse_v2_epoch(line: &str, header: &Header) -> Result<(SV, Epoch), RecordError> {
        let prn = column(line, 0, 2).trim();
        let prn = prn
            .parse::<u8>()
            .map_err(|_| RecordError::InvalidSatellite(prn.to_string()))?;
        let yy = integer(line, 3, 5, "year")?;
        let year = if yy < 80 { yy + 2000 } else { yy + 1900 };
        let toc = toc(
            year,
            integer(line, 6, 8, "month")?,
            integer(line, 9, 11, "day")?,
            integer(line, 12, 14, "hour")?,
            integer(line, 15, 17, "minute")?,
            seconds(line, 18, 22)?,
        )?;
        let sv = SV {
            constellation: header.constellation,
            prn,
        };
        Ok((sv, toc))
    }
    /// V3/V4: "SNN YYYY MM DD HH MM SS"
    fn parse_v3_epoch(line: &str, header: &Header) -> Result<(SV, Epoch), RecordError> {
        let id = column(line, 0, 3).trim();
        let (constellation, prn) = match id.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                let constellation = match c {
                    'G' => Constellation::GPS,
                    'R' => Constellation::Glonass,
                    'E' => Constellation::Galileo,
                    'C' => Constellation::BeiDou,
                    'J' => Constellation::QZSS,
                    'I' => Constellation::IRNSS,
                    'S' => Constellation::SBAS,
                    _ => header.constellation,
                };
                (constellation, &id[1..])
            },
            _ => (header.constellation, id),
        };
        let prn = prn
            .trim()
            .parse::<u8>()
            .map_err(|_| RecordError::InvalidSatellite(id.to_string()))?;
        let toc = toc(
            integer(line, 4, 8, "year")?,
            integer(line, 9, 11, "month")?,
            integer(line, 12, 14, "day")?,
            integer(line, 15, 17, "hour")?,
            integer(line, 18, 20, "minute")?,
            seconds(line, 21, 23)?,
        )?;
        Ok((SV { constellation, prn }, toc))
    }
}

fn integer(line: &str, start: usize, end: usize, field: &'static str) -> Result<i32, RecordError> {
    let value = column(line, start, end).trim();
    value.parse::<i32>().map_err(|_| RecordError::InvalidField {
        field,
        value: value.to_string(),
    })
}

/// Seconds field, fractional part is dropped
fn seconds(line: &str, start: usize, end: usize) -> Result<i32, RecordError> {
    let value = column(line, start, end).trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .map(|s| s.trunc() as i32)
        .ok_or_else(|| RecordError::InvalidField {
            field: "second",
            value: value.to_string(),
        })
}

fn toc(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Result<Epoch, RecordError> {
    let field = |v: i32, max: i32| u8::try_from(v).ok().filter(|v| i32::from(*v) <= max);
    let (Some(month), Some(day), Some(hour), Some(minute), Some(second)) = (
        field(month, 12),
        field(day, 31),
        field(hour, 23),
        field(minute, 59),
        field(second, 59),
    ) else {
        return Err(RecordError::InvalidEpoch);
    };
    let naive = calendar::naive((year, month, day, hour, minute, second, 0))
        .map_err(|_| RecordError::InvalidEpoch)?;
    Ok(calendar::to_utc(naive))
}

/// Parses navigation records from the file body. A successfully parsed
/// record consumes [RECORD_LINES] lines, a failure consumes a single line
/// so we re-synchronize on the next record.
pub(crate) fn parse_records(lines: &[&str], first_line: usize, header: &Header) -> Vec<EphemerisRecord> {
    let mut records = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        if lines[index].trim().is_empty() {
            index += 1;
            continue;
        }
        match EphemerisRecord::parse(&lines[index..], header) {
            Ok(record) => {
                debug!("{} - ephemeris toc {}", record.sv, record.toc);
                records.push(record);
                index += RECORD_LINES;
            },
            Err(e) => {
                debug!("line {}: navigation record skipped: {}", first_line + index, e);
                index += 1;
            },
        }
    }
    records
}
