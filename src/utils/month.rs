//! 自然月时间窗口
//!
//! 反馈的"本月"判断按 (年, 月) 组合进行，不同年份的同一月份不会互相混淆。

use chrono::{Datelike, NaiveDate};

/// 半开区间 `[start, end)`，覆盖某一个自然月
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// 月份或年份非法时返回 `None`（月份 1..=12，年份 1..=9999）
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=9999).contains(&year) || !(1..=12).contains(&month) {
            return None;
        }
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    /// 包含指定日期的自然月
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// 服务器本地时间的当月
    pub fn current() -> Self {
        Self::containing(today())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// 月份键 `year * 100 + month`，如 2024-03 为 202403
    pub fn period(&self) -> i32 {
        self.year() * 100 + self.month() as i32
    }
}

/// 服务器本地日期
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_key() {
        assert_eq!(MonthWindow::new(2024, 3).unwrap().period(), 202403);
        assert_eq!(MonthWindow::containing(date(1999, 12, 31)).period(), 199912);
    }

    #[test]
    fn test_regular_month() {
        let window = MonthWindow::new(2024, 5).unwrap();
        assert_eq!(window.start, date(2024, 5, 1));
        assert_eq!(window.end, date(2024, 6, 1));
        assert!(window.contains(date(2024, 5, 31)));
        assert!(!window.contains(date(2024, 6, 1)));
        assert!(!window.contains(date(2024, 4, 30)));
    }

    #[test]
    fn test_december_rolls_over() {
        let window = MonthWindow::new(2023, 12).unwrap();
        assert_eq!(window.end, date(2024, 1, 1));
        assert!(window.contains(date(2023, 12, 31)));
    }

    #[test]
    fn test_same_month_other_year_excluded() {
        let window = MonthWindow::new(2024, 3).unwrap();
        assert!(!window.contains(date(2023, 3, 15)));
        assert!(!window.contains(date(2025, 3, 15)));
    }

    #[test]
    fn test_containing_leap_february() {
        let window = MonthWindow::containing(date(2024, 2, 29));
        assert_eq!(window, MonthWindow::new(2024, 2).unwrap());
        assert_eq!(window.year(), 2024);
        assert_eq!(window.month(), 2);
    }

    #[test]
    fn test_invalid_periods() {
        assert!(MonthWindow::new(2024, 0).is_none());
        assert!(MonthWindow::new(2024, 13).is_none());
        assert!(MonthWindow::new(0, 5).is_none());
        assert!(MonthWindow::new(10000, 5).is_none());
    }
}
