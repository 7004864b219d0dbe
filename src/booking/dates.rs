//! 日付範囲を1泊ずつのペアに展開する

use std::iter::FusedIterator;

use chrono::NaiveDate;

use crate::error::ScraperError;

use super::types::DayPair;

/// 入力・出力で使う日付形式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(input: &str) -> Result<NaiveDate, ScraperError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ScraperError::InvalidDateFormat(input.to_string()))
}

/// `[start, end)` の日付範囲。`end > start` が保証される
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ScraperError> {
        if end <= start {
            return Err(ScraperError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// 両方の文字列を解析してから範囲を検証する
    pub fn parse(start: &str, end: &str) -> Result<Self, ScraperError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn total_days(&self) -> usize {
        (self.end - self.start).num_days() as usize
    }

    /// 何度でも先頭からやり直せる遅延イテレータ
    pub fn days(&self) -> DayPairs {
        DayPairs {
            next: self.start,
            end: self.end,
        }
    }
}

impl IntoIterator for &DateRange {
    type Item = DayPair;
    type IntoIter = DayPairs;

    fn into_iter(self) -> Self::IntoIter {
        self.days()
    }
}

#[derive(Debug, Clone)]
pub struct DayPairs {
    next: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayPairs {
    type Item = DayPair;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let pair = DayPair::starting(self.next)?;
        self.next = pair.check_out();
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next).num_days().max(0) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DayPairs {}

impl FusedIterator for DayPairs {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_expands_half_open_range() {
        let range = DateRange::parse("2025-01-01", "2025-01-03").unwrap();
        let pairs: Vec<_> = range.days().collect();

        assert_eq!(range.total_days(), 2);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].check_in(), date(2025, 1, 1));
        assert_eq!(pairs[0].check_out(), date(2025, 1, 2));
        assert_eq!(pairs[1].check_in(), date(2025, 1, 2));
        assert_eq!(pairs[1].check_out(), date(2025, 1, 3));
    }

    #[test]
    fn test_pairs_step_one_day_across_month_and_leap_day() {
        let range = DateRange::parse("2024-02-27", "2024-03-02").unwrap();
        let pairs: Vec<_> = range.days().collect();

        assert_eq!(pairs.len(), range.total_days());
        assert_eq!(pairs.len(), 4);
        for window in pairs.windows(2) {
            assert_eq!(window[0].check_out(), window[1].check_in());
        }
        for pair in &pairs {
            assert_eq!(pair.check_in().succ_opt(), Some(pair.check_out()));
        }
        assert_eq!(pairs[2].check_in(), date(2024, 2, 29));
    }

    #[test]
    fn test_sequence_is_restartable() {
        let range = DateRange::parse("2025-03-01", "2025-03-05").unwrap();
        let first: Vec<_> = range.days().collect();
        let second: Vec<_> = (&range).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(range.days().len(), 4);
    }

    #[test]
    fn test_equal_bounds_is_invalid_range() {
        let err = DateRange::parse("2025-01-01", "2025-01-01").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidRange { .. }));
    }

    #[test]
    fn test_reversed_bounds_is_invalid_range() {
        let err = DateRange::parse("2025-01-05", "2025-01-01").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidRange { .. }));
    }

    #[test]
    fn test_malformed_dates() {
        for bad in ["2025/01/01", "01-01-2025", "2025-13-01", "2025-02-30", "", "tomorrow"] {
            let err = DateRange::parse(bad, "2025-12-31").unwrap_err();
            assert!(
                matches!(err, ScraperError::InvalidDateFormat(ref s) if s == bad),
                "{bad:?} -> {err:?}"
            );
        }
        let err = DateRange::parse("2025-01-01", "2025-01-0x").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidDateFormat(_)));
    }

    #[test]
    fn test_format_checked_before_range() {
        let err = DateRange::parse("2025-01-01", "bogus").unwrap_err();
        assert!(matches!(err, ScraperError::InvalidDateFormat(_)));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let range = DateRange::parse(" 2025-01-01 ", "2025-01-02\n").unwrap();
        assert_eq!(range.total_days(), 1);
    }
}
