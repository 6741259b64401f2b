//! Simulation start time
use hifitime::Epoch;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use super::lenient;
use crate::time::{
    convert_from_utc, convert_to_utc, CalendarTime, Error, GlonassTime, SystemTime, TimeSystem,
    WeekTime,
};

/// Simulation start time, expressed in one of the supported [TimeSystem]s.
/// Each system carries its own set of fields.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(from = "RawTime")]
pub enum TimeConfig {
    UTC(CalendarTime),
    GPS(WeekTime),
    BDS(WeekTime),
    Galileo(WeekTime),
    GLONASS(GlonassTime),
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self::UTC(CalendarTime::default())
    }
}

impl TimeConfig {
    pub fn system(&self) -> TimeSystem {
        match self {
            Self::UTC(_) => TimeSystem::UTC,
            Self::GPS(_) => TimeSystem::GPS,
            Self::BDS(_) => TimeSystem::BDS,
            Self::Galileo(_) => TimeSystem::Galileo,
            Self::GLONASS(_) => TimeSystem::GLONASS,
        }
    }
    /// Native representation, as understood by the conversion engine
    pub fn to_system_time(&self) -> Result<SystemTime, Error> {
        Ok(match self {
            Self::UTC(t) => SystemTime::UTC(t.to_epoch()?),
            Self::GPS(t) | Self::BDS(t) | Self::Galileo(t) => SystemTime::Week {
                system: self.system(),
                time: *t,
            },
            Self::GLONASS(t) => SystemTime::GLONASS(*t),
        })
    }
    /// Start time as a UTC instant
    pub fn to_utc(&self) -> Result<Epoch, Error> {
        Ok(convert_to_utc(&self.to_system_time()?)?.utc)
    }
    /// Expresses `utc` in the desired time system
    pub fn from_utc(utc: Epoch, system: TimeSystem) -> Result<Self, Error> {
        Ok(match convert_from_utc(utc, system)? {
            SystemTime::UTC(t) => Self::UTC(CalendarTime::from_epoch(t)),
            SystemTime::Week { system, time } => match system {
                TimeSystem::BDS => Self::BDS(time),
                TimeSystem::Galileo => Self::Galileo(time),
                _ => Self::GPS(time),
            },
            SystemTime::GLONASS(t) => Self::GLONASS(t),
        })
    }
}

impl Serialize for TimeConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.system())?;
        match self {
            Self::UTC(t) => {
                map.serialize_entry("year", &t.year)?;
                map.serialize_entry("month", &t.month)?;
                map.serialize_entry("day", &t.day)?;
                map.serialize_entry("hour", &t.hour)?;
                map.serialize_entry("minute", &t.minute)?;
                map.serialize_entry("second", &t.second)?;
            },
            Self::GPS(t) | Self::BDS(t) | Self::Galileo(t) => {
                map.serialize_entry("second", &t.second)?;
                map.serialize_entry("week", &t.week)?;
            },
            Self::GLONASS(t) => {
                map.serialize_entry("day", &t.day)?;
                map.serialize_entry("second", &t.second)?;
                map.serialize_entry("leapYear", &t.leap_year)?;
            },
        }
        map.end()
    }
}

/// Wire layout: union of all field groups
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTime {
    #[serde(rename = "type", deserialize_with = "lenient::variant")]
    kind: Option<TimeSystem>,
    #[serde(deserialize_with = "lenient::number")]
    year: Option<i32>,
    #[serde(deserialize_with = "lenient::number")]
    month: Option<u8>,
    #[serde(deserialize_with = "lenient::number")]
    day: Option<u16>,
    #[serde(deserialize_with = "lenient::number")]
    hour: Option<u8>,
    #[serde(deserialize_with = "lenient::number")]
    minute: Option<u8>,
    #[serde(deserialize_with = "lenient::number")]
    second: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    week: Option<i32>,
    #[serde(deserialize_with = "lenient::number")]
    leap_year: Option<i32>,
}

impl From<RawTime> for TimeConfig {
    fn from(raw: RawTime) -> Self {
        let week = || WeekTime::new(raw.week.unwrap_or(0), raw.second.unwrap_or(0.0));
        match raw.kind.unwrap_or_default() {
            TimeSystem::UTC => {
                let default = CalendarTime::default();
                Self::UTC(CalendarTime {
                    year: raw.year.unwrap_or(default.year),
                    month: raw.month.unwrap_or(default.month),
                    day: raw
                        .day
                        .and_then(|d| u8::try_from(d).ok())
                        .unwrap_or(default.day),
                    hour: raw.hour.unwrap_or(default.hour),
                    minute: raw.minute.unwrap_or(default.minute),
                    second: raw.second.unwrap_or(default.second),
                })
            },
            TimeSystem::GPS => Self::GPS(week()),
            TimeSystem::BDS => Self::BDS(week()),
            TimeSystem::Galileo => Self::Galileo(week()),
            TimeSystem::GLONASS => {
                let default = GlonassTime::default();
                Self::GLONASS(GlonassTime {
                    leap_year: raw.leap_year.unwrap_or(default.leap_year),
                    day: raw.day.unwrap_or(default.day),
                    second: raw.second.unwrap_or(default.second),
                })
            },
        }
    }
}
