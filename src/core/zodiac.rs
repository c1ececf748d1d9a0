use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ZodiacSign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZodiacError {
    #[error("invalid date: month {month}, day {day}")]
    InvalidDate { month: u8, day: u8 },
}

/// Inclusive calendar interval of a sign. Capricorn wraps the year end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(rename = "startMonth")]
    pub start_month: u8,
    #[serde(rename = "startDay")]
    pub start_day: u8,
    #[serde(rename = "endMonth")]
    pub end_month: u8,
    #[serde(rename = "endDay")]
    pub end_day: u8,
}

impl DateRange {
    const fn new(start: (u8, u8), end: (u8, u8)) -> Self {
        Self {
            start_month: start.0,
            start_day: start.1,
            end_month: end.0,
            end_day: end.1,
        }
    }

    #[inline]
    pub fn contains(&self, month: u8, day: u8) -> bool {
        let date = (month, day);
        let start = (self.start_month, self.start_day);
        let end = (self.end_month, self.end_day);

        if start <= end {
            start <= date && date <= end
        } else {
            date >= start || date <= end
        }
    }
}

/// February allows 29 so leap-day birthdays classify as Pisces
const DAYS_IN_MONTH: [u8; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

const CALENDAR: [(ZodiacSign, DateRange); 12] = [
    (ZodiacSign::Capricorn, DateRange::new((12, 22), (1, 19))),
    (ZodiacSign::Aquarius, DateRange::new((1, 20), (2, 18))),
    (ZodiacSign::Pisces, DateRange::new((2, 19), (3, 20))),
    (ZodiacSign::Aries, DateRange::new((3, 21), (4, 19))),
    (ZodiacSign::Taurus, DateRange::new((4, 20), (5, 20))),
    (ZodiacSign::Gemini, DateRange::new((5, 21), (6, 20))),
    (ZodiacSign::Cancer, DateRange::new((6, 21), (7, 22))),
    (ZodiacSign::Leo, DateRange::new((7, 23), (8, 22))),
    (ZodiacSign::Virgo, DateRange::new((8, 23), (9, 22))),
    (ZodiacSign::Libra, DateRange::new((9, 23), (10, 22))),
    (ZodiacSign::Scorpio, DateRange::new((10, 23), (11, 21))),
    (ZodiacSign::Sagittarius, DateRange::new((11, 22), (12, 21))),
];

/// Check a month/day pair against the calendar (no year, so Feb 29 is valid)
pub fn is_valid_date(month: u8, day: u8) -> bool {
    (1..=12).contains(&month) && day >= 1 && day <= DAYS_IN_MONTH[usize::from(month - 1)]
}

/// Classify a birth date into its zodiac sign
pub fn classify(month: u8, day: u8) -> Result<ZodiacSign, ZodiacError> {
    if !is_valid_date(month, day) {
        return Err(ZodiacError::InvalidDate { month, day });
    }

    CALENDAR
        .iter()
        .find(|(_, range)| range.contains(month, day))
        .map(|(sign, _)| *sign)
        .ok_or(ZodiacError::InvalidDate { month, day })
}

/// Calendar interval belonging to `sign`
pub fn date_range(sign: ZodiacSign) -> DateRange {
    CALENDAR
        .iter()
        .find(|(s, _)| *s == sign)
        .map(|(_, range)| *range)
        .unwrap_or(DateRange::new((1, 1), (12, 31)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_valid_date() -> impl Iterator<Item = (u8, u8)> {
        (1u8..=12).flat_map(|m| (1u8..=DAYS_IN_MONTH[usize::from(m - 1)]).map(move |d| (m, d)))
    }

    #[test]
    fn test_calendar_partitions_the_year() {
        let mut seen = std::collections::HashSet::new();
        let mut days = 0;

        for (month, day) in every_valid_date() {
            let hits = CALENDAR
                .iter()
                .filter(|(_, range)| range.contains(month, day))
                .count();
            assert_eq!(hits, 1, "{}/{} covered {} times", month, day, hits);
            seen.insert(classify(month, day).unwrap());
            days += 1;
        }

        assert_eq!(days, 366);
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(11, 21).unwrap(), ZodiacSign::Scorpio);
        assert_eq!(classify(11, 22).unwrap(), ZodiacSign::Sagittarius);
        assert_eq!(classify(11, 25).unwrap(), ZodiacSign::Sagittarius);
        assert_eq!(classify(12, 21).unwrap(), ZodiacSign::Sagittarius);
        assert_eq!(classify(12, 22).unwrap(), ZodiacSign::Capricorn);
        assert_eq!(classify(1, 1).unwrap(), ZodiacSign::Capricorn);
        assert_eq!(classify(1, 20).unwrap(), ZodiacSign::Aquarius);
        assert_eq!(classify(2, 29).unwrap(), ZodiacSign::Pisces);
        assert_eq!(classify(3, 21).unwrap(), ZodiacSign::Aries);
    }

    #[test]
    fn test_invalid_dates_rejected() {
        for (month, day) in [(0, 1), (13, 1), (1, 0), (2, 30), (4, 31), (12, 32)] {
            assert_eq!(
                classify(month, day),
                Err(ZodiacError::InvalidDate { month, day })
            );
        }
    }

    #[test]
    fn test_date_range_lookup() {
        let range = date_range(ZodiacSign::Leo);
        assert_eq!((range.start_month, range.start_day), (7, 23));
        assert_eq!((range.end_month, range.end_day), (8, 22));
        assert!(date_range(ZodiacSign::Capricorn).contains(12, 31));
    }
}
