use crate::prelude::Constellation;
use log::debug;

use super::column;

/// Default leap seconds when not stated (or not readable) in the header
pub const DEFAULT_LEAP_SECONDS: i64 = 18;

/// RINEX format revision
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Version {
    V2,
    #[default]
    V3,
    V4,
}

impl Version {
    /// Identifies the revision from the version field,
    /// anything unknown is processed as V3.
    fn from_field(field: &str) -> Self {
        if field.starts_with('2') {
            Self::V2
        } else if field.starts_with('4') {
            Self::V4
        } else {
            Self::V3
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::V2 => write!(f, "2"),
            Self::V3 => write!(f, "3"),
            Self::V4 => write!(f, "4"),
        }
    }
}

/// RINEX file header
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Format revision
    pub version: Version,
    /// File type code, "N" for navigation data
    pub file_type: String,
    /// Satellite system declared by the file
    pub constellation: Constellation,
    /// Program that created this file
    pub program: String,
    /// Agency that created this file
    pub run_by: String,
    /// File creation date
    pub date: String,
    /// Leap seconds declared by the file
    pub leap_seconds: i64,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            version: Version::default(),
            file_type: "N".to_string(),
            constellation: Constellation::GPS,
            program: "Unknown".to_string(),
            run_by: "Unknown".to_string(),
            date: "Unknown".to_string(),
            leap_seconds: DEFAULT_LEAP_SECONDS,
        }
    }
}

impl Header {
    /// True if this file contains navigation records
    pub fn is_navigation(&self) -> bool {
        self.file_type.starts_with('N')
    }
    /// Parses the header section. Returns the header and the index of the
    /// first line following "END OF HEADER" (0 if that label is missing).
    pub(crate) fn parse(lines: &[&str]) -> (Self, usize) {
        let mut header = Self::default();
        let mut body = 0;
        for (index, line) in lines.iter().enumerate() {
            if line.contains("END OF HEADER") {
                body = index + 1;
                break;
            }
            if line.contains("RINEX VERSION / TYPE") {
                header.version = Version::from_field(column(line, 0, 9).trim());
                header.file_type = column(line, 20, 21).trim().to_string();
                header.constellation = match column(line, 40, 41).trim() {
                    "R" => Constellation::Glonass,
                    "E" => Constellation::Galileo,
                    "C" => Constellation::BeiDou,
                    _ => Constellation::GPS,
                };
            } else if line.contains("PGM / RUN BY / DATE") {
                header.program = column(line, 0, 20).trim().to_string();
                header.run_by = column(line, 20, 40).trim().to_string();
                header.date = column(line, 40, 60).trim().to_string();
            } else if line.contains("LEAP SECONDS") {
                header.leap_seconds = column(line, 0, 6)
                    .trim()
                    .parse::<i64>()
                    .unwrap_or(DEFAULT_LEAP_SECONDS);
            }
        }
        debug!(
            "rinex header: version {}, system {:?}, type {}",
            header.version, header.constellation, header.file_type
        );
        (header, body)
    }
}
