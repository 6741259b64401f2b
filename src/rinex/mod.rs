//! RINEX navigation files: header and ephemeris validity windows
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use itertools::Itertools;
use log::{debug, error, info};
use thiserror::Error;

use crate::prelude::{Constellation, Duration, Epoch, SV};

mod header;
mod record;

pub use header::{Header, Version, DEFAULT_LEAP_SECONDS};
pub use record::{
    EphemerisRecord, RecordError, RECORD_LINES, VALIDITY_HOURS_AFTER_TOC,
    VALIDITY_HOURS_BEFORE_TOC,
};

/// Number of leading lines inspected by [is_valid_rinex_file]
const HEADER_PROBE_LINES: usize = 11;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to parse RINEX file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the [start, end) byte columns of a fixed width line.
/// Columns past the end of line are empty.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    line.get(start.min(end)..end).unwrap_or("")
}

/// Time frame covered by ephemeris data
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValidityRange {
    pub start: Epoch,
    pub end: Epoch,
}

impl ValidityRange {
    /// Aggregates the validity of all records:
    /// earliest start to latest end. None if there are no records.
    pub fn from_records(records: &[EphemerisRecord]) -> Option<Self> {
        let start = records
            .iter()
            .map(|r| r.validity_start)
            .reduce(|a, b| if b < a { b } else { a })?;
        let end = records
            .iter()
            .map(|r| r.validity_end)
            .reduce(|a, b| if b > a { b } else { a })?;
        Some(Self { start, end })
    }
    /// True if `t` lies within this range, bounds included
    pub fn contains(&self, t: Epoch) -> bool {
        t >= self.start && t <= self.end
    }
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
    /// Smallest range covering both
    pub fn merge(&self, rhs: &Self) -> Self {
        Self {
            start: if rhs.start < self.start {
                rhs.start
            } else {
                self.start
            },
            end: if rhs.end > self.end { rhs.end } else { self.end },
        }
    }
}

/// Parsed RINEX navigation file
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationFile {
    pub header: Header,
    /// Ephemeris records, in file order
    pub records: Vec<EphemerisRecord>,
    /// Aggregated validity, None when no record could be parsed
    pub validity: Option<ValidityRange>,
}

impl NavigationFile {
    /// Parses RINEX content. Records are only parsed for navigation
    /// files, malformed records are skipped.
    pub fn parse(content: &str) -> Self {
        let lines = content.lines().collect::<Vec<_>>();
        let (header, body) = Header::parse(&lines);

        let records = if header.is_navigation() {
            record::parse_records(&lines[body..], body, &header)
        } else {
            debug!(
                "file type \"{}\" not supported for ephemeris parsing",
                header.file_type
            );
            Vec::new()
        };

        let validity = ValidityRange::from_records(&records);
        let nav = Self {
            header,
            records,
            validity,
        };

        if let Some(validity) = nav.validity {
            info!(
                "ephemeris validity range: {} to {}",
                validity.start, validity.end
            );
            info!(
                "total duration: {:.1} hours",
                validity.duration().to_seconds() / 3600.0
            );
            info!("number of satellites: {}", nav.satellite_count());
        }
        nav
    }
    /// Reads and parses a RINEX file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        info!("parsing RINEX file: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| {
            error!("error parsing RINEX file {}: {}", path.display(), source);
            Error::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        // undecodable bytes are dropped
        let content = String::from_utf8_lossy(&bytes).replace(char::REPLACEMENT_CHARACTER, "");
        Ok(Self::parse(&content))
    }
    pub fn ephemeris_count(&self) -> usize {
        self.records.len()
    }
    /// Distinct satellites in this file
    pub fn satellites(&self) -> Vec<SV> {
        self.records.iter().map(|r| r.sv).unique().sorted().collect()
    }
    pub fn satellite_count(&self) -> usize {
        self.records.iter().map(|r| r.sv).unique().count()
    }
    /// Distinct satellite systems in this file
    pub fn constellations(&self) -> Vec<Constellation> {
        self.records
            .iter()
            .map(|r| r.sv.constellation)
            .unique()
            .sorted()
            .collect()
    }
}

/// Returns the validity range of a RINEX file, None on any failure.
pub fn quick_validity(path: impl AsRef<Path>) -> Option<ValidityRange> {
    let path = path.as_ref();
    match NavigationFile::from_file(path) {
        Ok(nav) => nav.validity,
        Err(e) => {
            debug!("quick parse failed for {}: {}", path.display(), e);
            None
        },
    }
}

/// True if "RINEX VERSION / TYPE" shows up within the first lines of this
/// file, ahead of any "END OF HEADER".
pub fn is_valid_rinex_file(path: impl AsRef<Path>) -> bool {
    let Ok(fd) = File::open(path) else {
        return false;
    };
    for line in BufReader::new(fd).split(b'\n').take(HEADER_PROBE_LINES) {
        let Ok(line) = line else {
            return false;
        };
        let line = String::from_utf8_lossy(&line);
        if line.contains("RINEX VERSION / TYPE") {
            return true;
        }
        if line.contains("END OF HEADER") {
            break;
        }
    }
    false
}
