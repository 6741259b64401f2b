//! GNSS time systems to/from UTC conversions
use hifitime::{Duration, Epoch, Unit};
use log::debug;
use thiserror::Error;

pub(crate) mod calendar;
mod leap;

pub use leap::{leap_seconds, LEAP_SECONDS};

/// Seconds in one week
pub const SECONDS_PER_WEEK: f64 = 604800.0;

/// Seconds in one day
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// GLONASS system time runs on Moscow time (UTC+3h)
const GLONASS_UTC_OFFSET_HOURS: i64 = 3;

/// GLONASS "leap year" counts years past 1996
const GLONASS_YEAR_ORIGIN: i32 = 1996;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("unsupported time system \"{0}\"")]
    UnsupportedTimeSystem(String),
    #[error("invalid date {0:04}-{1:02}-{2:02}")]
    InvalidDate(i32, u8, u8),
    #[error("GLONASS leap year {0} out of range")]
    InvalidGlonassYear(i32),
}

/// Time systems a simulation start time may be expressed in
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum TimeSystem {
    #[default]
    UTC,
    GPS,
    GLONASS,
    BDS,
    Galileo,
}

impl TimeSystem {
    /// Wire identifier
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UTC => "UTC",
            Self::GPS => "GPS",
            Self::GLONASS => "GLONASS",
            Self::BDS => "BDS",
            Self::Galileo => "Galileo",
        }
    }
    /// True for systems counting (week, second of week)
    pub const fn is_week_based(&self) -> bool {
        matches!(self, Self::GPS | Self::BDS | Self::Galileo)
    }
    /// Origin of the week counter, on the calendar
    fn week_origin(&self) -> Result<Epoch, Error> {
        match self {
            Self::GPS => calendar::midnight(1980, 1, 6),
            Self::BDS => calendar::midnight(2006, 1, 1),
            Self::Galileo => calendar::midnight(1999, 8, 22),
            _ => Err(Error::UnsupportedTimeSystem(self.to_string())),
        }
    }
}

impl std::fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeSystem {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "UTC" => Ok(Self::UTC),
            "GPS" => Ok(Self::GPS),
            "GLONASS" => Ok(Self::GLONASS),
            "BDS" => Ok(Self::BDS),
            "Galileo" => Ok(Self::Galileo),
            _ => Err(Error::UnsupportedTimeSystem(s.to_string())),
        }
    }
}

impl serde::Serialize for TimeSystem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// (week, second of week) representation, used by GPS, BDS and Galileo
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WeekTime {
    /// Weeks elapsed since the system origin
    pub week: i32,
    /// Seconds into the week, in [0, 604800)
    pub second: f64,
}

impl WeekTime {
    pub fn new(week: i32, second: f64) -> Self {
        Self { week, second }
    }
    fn from_elapsed(elapsed: Duration) -> Self {
        let total = elapsed.to_seconds();
        Self {
            week: (total / SECONDS_PER_WEEK).floor() as i32,
            second: total.rem_euclid(SECONDS_PER_WEEK),
        }
    }
    fn elapsed(&self) -> Duration {
        i64::from(self.week) * 7 * Unit::Day + Duration::from_seconds(self.second)
    }
}

/// GLONASS (leap year, day of year, second of day) representation
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlonassTime {
    /// Years elapsed since 1996
    pub leap_year: i32,
    /// Day of year, starting at 1
    pub day: u16,
    /// Seconds into the day, in [0, 86400)
    pub second: f64,
}

impl Default for GlonassTime {
    fn default() -> Self {
        Self {
            leap_year: 0,
            day: 1,
            second: 0.0,
        }
    }
}

impl GlonassTime {
    pub fn new(leap_year: i32, day: u16, second: f64) -> Self {
        Self {
            leap_year,
            day,
            second,
        }
    }
}

/// UTC calendar representation, as stored in a configuration document
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// Seconds into the minute, fractional part allowed
    pub second: f64,
}

impl Default for CalendarTime {
    fn default() -> Self {
        Self {
            year: 2000,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0.0,
        }
    }
}

impl CalendarTime {
    /// Builds the UTC [Epoch] this calendar time describes
    pub fn to_epoch(&self) -> Result<Epoch, Error> {
        let invalid = Error::InvalidDate(self.year, self.month, self.day);
        if !(0.0..60.0).contains(&self.second) {
            return Err(invalid);
        }
        let whole = self.second.trunc();
        let nanos = (((self.second - whole) * 1.0E9).round() as u32).min(999_999_999);
        let naive = calendar::naive((
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            whole as u8,
            nanos,
        ))?;
        Ok(calendar::to_utc(naive))
    }
    /// Describes given UTC [Epoch] on the calendar
    pub fn from_epoch(t: Epoch) -> Self {
        let (year, month, day, hour, minute, second, nanos) = t.to_gregorian_utc();
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second: f64::from(second) + f64::from(nanos) * 1.0E-9,
        }
    }
}

/// An instant expressed in one of the supported [TimeSystem]s
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SystemTime {
    UTC(Epoch),
    /// Week based systems: GPS, BDS, Galileo
    Week { system: TimeSystem, time: WeekTime },
    GLONASS(GlonassTime),
}

impl SystemTime {
    pub fn system(&self) -> TimeSystem {
        match self {
            Self::UTC(_) => TimeSystem::UTC,
            Self::Week { system, .. } => *system,
            Self::GLONASS(_) => TimeSystem::GLONASS,
        }
    }
    /// Range check of the native representation
    pub fn is_valid(&self) -> bool {
        match self {
            Self::UTC(_) => true,
            Self::Week { system, time } => {
                system.is_week_based()
                    && (0..=9999).contains(&time.week)
                    && (0.0..SECONDS_PER_WEEK).contains(&time.second)
            },
            Self::GLONASS(time) => {
                (0..=100).contains(&time.leap_year)
                    && (1..=366).contains(&time.day)
                    && (0.0..SECONDS_PER_DAY).contains(&time.second)
            },
        }
    }
}

/// Result of a conversion to UTC
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TimeConversion {
    /// Source system
    pub system: TimeSystem,
    /// Source instant, in its native representation
    pub system_time: SystemTime,
    /// Resulting UTC instant
    pub utc: Epoch,
    /// Leap seconds that were subtracted
    pub leap_seconds: i64,
}

/// Converts a week based system time to UTC. Leap seconds are looked up
/// at the system time instant, prior to correction.
pub fn week_to_utc(system: TimeSystem, time: WeekTime) -> Result<TimeConversion, Error> {
    let instant = system.week_origin()? + time.elapsed();
    let (y, m, d, _, _, _, _) = instant.to_gregorian_tai();
    let leap_seconds = leap::leap_seconds_on(y, m, d);
    let utc = calendar::to_utc(instant - leap_seconds * Unit::Second);
    debug!(
        "{} to UTC: week {}, second {:.1} -> {}",
        system, time.week, time.second, utc
    );
    Ok(TimeConversion {
        system,
        system_time: SystemTime::Week { system, time },
        utc,
        leap_seconds,
    })
}

/// Converts a UTC instant to a week based system time. Leap seconds are
/// looked up at the UTC instant.
pub fn utc_to_week(utc: Epoch, system: TimeSystem) -> Result<WeekTime, Error> {
    let origin = system.week_origin()?;
    let system_time = calendar::to_naive(utc) + leap_seconds(utc) * Unit::Second;
    let time = WeekTime::from_elapsed(system_time - origin);
    debug!(
        "UTC to {}: {} -> week {}, second {:.1}",
        system, utc, time.week, time.second
    );
    Ok(time)
}

pub fn gps_to_utc(week: i32, second: f64) -> Result<TimeConversion, Error> {
    week_to_utc(TimeSystem::GPS, WeekTime::new(week, second))
}

pub fn utc_to_gps(utc: Epoch) -> Result<WeekTime, Error> {
    utc_to_week(utc, TimeSystem::GPS)
}

pub fn bds_to_utc(week: i32, second: f64) -> Result<TimeConversion, Error> {
    week_to_utc(TimeSystem::BDS, WeekTime::new(week, second))
}

pub fn utc_to_bds(utc: Epoch) -> Result<WeekTime, Error> {
    utc_to_week(utc, TimeSystem::BDS)
}

pub fn galileo_to_utc(week: i32, second: f64) -> Result<TimeConversion, Error> {
    week_to_utc(TimeSystem::Galileo, WeekTime::new(week, second))
}

pub fn utc_to_galileo(utc: Epoch) -> Result<WeekTime, Error> {
    utc_to_week(utc, TimeSystem::Galileo)
}

/// Converts GLONASS time to UTC. GLONASS is Moscow time: pure offset,
/// the leap second table is never involved.
pub fn glonass_to_utc(time: GlonassTime) -> Result<TimeConversion, Error> {
    let year = GLONASS_YEAR_ORIGIN
        .checked_add(time.leap_year)
        .ok_or(Error::InvalidGlonassYear(time.leap_year))?;
    let moscow = calendar::midnight(year, 1, 1)?
        + (i64::from(time.day) - 1) * Unit::Day
        + Duration::from_seconds(time.second);
    let utc = calendar::to_utc(moscow - GLONASS_UTC_OFFSET_HOURS * Unit::Hour);
    debug!(
        "GLONASS to UTC: leap year {}, day {}, second {:.1} -> {}",
        time.leap_year, time.day, time.second, utc
    );
    Ok(TimeConversion {
        system: TimeSystem::GLONASS,
        system_time: SystemTime::GLONASS(time),
        utc,
        leap_seconds: 0,
    })
}

/// Converts a UTC instant to GLONASS time
pub fn utc_to_glonass(utc: Epoch) -> Result<GlonassTime, Error> {
    let moscow = calendar::to_naive(utc) + GLONASS_UTC_OFFSET_HOURS * Unit::Hour;
    let (y, m, d, hh, mm, ss, ns) = moscow.to_gregorian_tai();
    let days = (calendar::midnight(y, m, d)? - calendar::midnight(y, 1, 1)?).to_seconds()
        / SECONDS_PER_DAY;
    let time = GlonassTime {
        leap_year: y - GLONASS_YEAR_ORIGIN,
        day: days.round() as u16 + 1,
        second: f64::from(hh) * 3600.0
            + f64::from(mm) * 60.0
            + f64::from(ss)
            + f64::from(ns) * 1.0E-9,
    };
    debug!(
        "UTC to GLONASS: {} -> leap year {}, day {}, second {:.1}",
        utc, time.leap_year, time.day, time.second
    );
    Ok(time)
}

/// Converts any [SystemTime] to UTC
pub fn convert_to_utc(time: &SystemTime) -> Result<TimeConversion, Error> {
    match time {
        SystemTime::UTC(utc) => Ok(TimeConversion {
            system: TimeSystem::UTC,
            system_time: *time,
            utc: *utc,
            leap_seconds: 0,
        }),
        SystemTime::Week { system, time } => week_to_utc(*system, *time),
        SystemTime::GLONASS(time) => glonass_to_utc(*time),
    }
}

/// Expresses a UTC instant in given [TimeSystem]
pub fn convert_from_utc(utc: Epoch, system: TimeSystem) -> Result<SystemTime, Error> {
    match system {
        TimeSystem::UTC => Ok(SystemTime::UTC(utc)),
        TimeSystem::GLONASS => Ok(SystemTime::GLONASS(utc_to_glonass(utc)?)),
        system => Ok(SystemTime::Week {
            system,
            time: utc_to_week(utc, system)?,
        }),
    }
}
