//! Historical UTC leap seconds
use hifitime::Epoch;

/// Historical leap second table: (year, month, day, cumulative leap seconds),
/// each entry effective from midnight of that date. No leap second has
/// been announced after 2017-01-01.
pub const LEAP_SECONDS: [(i32, u8, u8, i64); 27] = [
    (1972, 7, 1, 1),
    (1973, 1, 1, 2),
    (1974, 1, 1, 3),
    (1975, 1, 1, 4),
    (1976, 1, 1, 5),
    (1977, 1, 1, 6),
    (1978, 1, 1, 7),
    (1979, 1, 1, 8),
    (1980, 1, 1, 9),
    (1981, 7, 1, 10),
    (1982, 7, 1, 11),
    (1983, 7, 1, 12),
    (1985, 7, 1, 13),
    (1988, 1, 1, 14),
    (1990, 1, 1, 15),
    (1991, 1, 1, 16),
    (1992, 7, 1, 17),
    (1993, 7, 1, 18),
    (1994, 7, 1, 19),
    (1996, 1, 1, 20),
    (1997, 7, 1, 21),
    (1999, 1, 1, 22),
    (2006, 1, 1, 23),
    (2009, 1, 1, 24),
    (2012, 7, 1, 25),
    (2015, 7, 1, 26),
    (2017, 1, 1, 27),
];

/// Returns the cumulative leap seconds effective on given calendar date,
/// 0 prior to the first table entry.
pub(crate) fn leap_seconds_on(year: i32, month: u8, day: u8) -> i64 {
    LEAP_SECONDS
        .iter()
        .take_while(|(y, m, d, _)| (year, month, day) >= (*y, *m, *d))
        .last()
        .map(|(_, _, _, total)| *total)
        .unwrap_or(0)
}

/// Returns the cumulative leap seconds effective at given UTC instant.
pub fn leap_seconds(t: Epoch) -> i64 {
    let (y, m, d, _, _, _, _) = t.to_gregorian_utc();
    leap_seconds_on(y, m, d)
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(1970, 1, 1, 0)]
    #[case(1972, 6, 30, 0)]
    #[case(1972, 7, 1, 1)]
    #[case(1980, 1, 6, 9)]
    #[case(2005, 12, 31, 22)]
    #[case(2006, 1, 1, 23)]
    #[case(2016, 12, 31, 26)]
    #[case(2017, 1, 1, 27)]
    #[case(2024, 6, 15, 27)]
    fn table_lookup(#[case] y: i32, #[case] m: u8, #[case] d: u8, #[case] expected: i64) {
        assert_eq!(leap_seconds_on(y, m, d), expected);
    }

    #[test]
    fn monotonic() {
        let mut previous = 0;
        for year in 1960..2040 {
            for month in 1..=12 {
                let ls = leap_seconds_on(year, month, 1);
                assert!(ls >= previous, "{}-{:02}: {} < {}", year, month, ls, previous);
                previous = ls;
            }
        }
        assert_eq!(previous, 27);
    }

    #[test]
    fn table_is_sorted() {
        for pair in LEAP_SECONDS.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.0, a.1, a.2) < (b.0, b.1, b.2));
            assert_eq!(b.3, a.3 + 1);
        }
    }
}
