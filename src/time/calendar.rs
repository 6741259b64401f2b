//! Calendar arithmetic helpers.
//!
//! Instants exposed by this crate are UTC [Epoch]s, but shifting them
//! must not account for leap seconds: those are only ever applied through
//! the table in [super::leap]. We therefore project UTC calendar fields
//! onto the (uniform) TAI calendar, do the arithmetic there and project
//! the result back.
use hifitime::{Duration, Epoch, TimeScale};

use super::Error;

/// Gregorian fields: (year, month, day, hour, minute, second, nanos)
pub(crate) type Fields = (i32, u8, u8, u8, u8, u8, u32);

/// Builds a calendar instant from its fields.
pub(crate) fn naive(fields: Fields) -> Result<Epoch, Error> {
    let (y, m, d, hh, mm, ss, ns) = fields;
    Epoch::maybe_from_gregorian(y, m, d, hh, mm, ss, ns, TimeScale::TAI)
        .map_err(|_| Error::InvalidDate(y, m, d))
}

/// Calendar instant at midnight of given date.
pub(crate) fn midnight(year: i32, month: u8, day: u8) -> Result<Epoch, Error> {
    naive((year, month, day, 0, 0, 0, 0))
}

/// Projects a UTC epoch onto the calendar.
pub(crate) fn to_naive(utc: Epoch) -> Epoch {
    let (y, m, d, hh, mm, ss, ns) = utc.to_gregorian_utc();
    // 23:59:60 folds onto the previous second
    Epoch::from_gregorian_tai(y, m, d, hh, mm, ss.min(59), ns)
}

/// Projects a calendar instant back to a UTC epoch.
pub(crate) fn to_utc(naive: Epoch) -> Epoch {
    let (y, m, d, hh, mm, ss, ns) = naive.to_gregorian_tai();
    Epoch::from_gregorian_utc(y, m, d, hh, mm, ss, ns)
}

/// Shifts a UTC epoch by a plain calendar duration.
pub(crate) fn shift(utc: Epoch, dt: Duration) -> Epoch {
    to_utc(to_naive(utc) + dt)
}

#[cfg(test)]
mod test {
    use super::*;
    use hifitime::Unit;
    use std::str::FromStr;

    #[test]
    fn shift_ignores_leap_seconds() {
        let t0 = Epoch::from_str("2016-12-31T23:00:00 UTC").unwrap();
        let t1 = shift(t0, 2 * Unit::Hour);
        assert_eq!(t1.to_gregorian_utc(), (2017, 1, 1, 1, 0, 0, 0));
    }

    #[test]
    fn invalid_dates() {
        assert!(midnight(2023, 2, 29).is_err());
        assert!(midnight(2024, 2, 29).is_ok());
        assert!(naive((2024, 13, 1, 0, 0, 0, 0)).is_err());
    }
}
