//! Generation calendar: owns the start date and day horizon.

use crate::types::DayIndex;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u64 = 1_440;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimCalendar {
    pub start_date: NaiveDate,
    pub days: u32,
}

impl SimCalendar {
    pub fn new(start_date: NaiveDate, days: u32) -> Self {
        Self { start_date, days }
    }

    /// Midnight at the start of `day`.
    pub fn day_start(&self, day: DayIndex) -> NaiveDateTime {
        midnight(self.start_date) + Duration::days(day as i64)
    }

    /// `day` boundary plus a minute offset into the day.
    pub fn at_minute(&self, day: DayIndex, minute: u64) -> NaiveDateTime {
        self.day_start(day) + Duration::minutes(minute as i64)
    }

    /// First instant after the horizon.
    pub fn end(&self) -> NaiveDateTime {
        self.day_start(self.days)
    }

    pub fn day_indices(&self) -> std::ops::Range<DayIndex> {
        0..self.days
    }
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minute_offsets_stay_inside_their_day() {
        let cal = SimCalendar::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 30);
        let ts = cal.at_minute(2, MINUTES_PER_DAY - 1);
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2026, 1, 3).unwrap());
        assert!(ts < cal.day_start(3));
    }

    #[test]
    fn end_is_one_horizon_after_start() {
        let cal = SimCalendar::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 30);
        assert_eq!(cal.end().date(), NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
        assert_eq!(cal.day_indices().len(), 30);
    }
}
