use super::tracker_data::ProductivityData;
use crate::error::TrackerError;
use chrono::{Datelike, NaiveDate};

/// Number of days in a month, `None` for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// One row of a month table: a goal or habit name and a mark per day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    pub id: String,
    pub name: String,
    /// One entry per day of the month, `true` where a record exists
    pub marks: Vec<bool>,
}

impl MonthRow {
    pub fn marked_days(&self) -> usize {
        self.marks.iter().filter(|m| **m).count()
    }
}

/// Goal and habit matrices for one calendar month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    /// Every day of the month, in order
    pub dates: Vec<NaiveDate>,
    pub goals: Vec<MonthRow>,
    pub habits: Vec<MonthRow>,
}

impl MonthView {
    /// Build the month tables
    ///
    /// A goal is listed when it has a daily in the month or was created in or
    /// before it; its cells mark days with any daily. A habit is listed when it
    /// has an achieved or failed record in the month; its cells mark achieved
    /// days.
    pub fn build(data: &ProductivityData, year: i32, month: u32) -> Result<Self, TrackerError> {
        let days =
            days_in_month(year, month).ok_or(TrackerError::InvalidMonth { year, month })?;
        let dates: Vec<NaiveDate> = (1..=days)
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .collect();

        let goals = data
            .goals
            .iter()
            .filter(|g| g.has_activity_in(year, month) || g.started_by(year, month))
            .map(|g| MonthRow {
                id: g.id.clone(),
                name: g.name.clone(),
                marks: dates.iter().map(|d| g.has_daily_on(*d)).collect(),
            })
            .collect();

        let habits = data
            .habits
            .iter()
            .filter(|h| h.has_record_in(year, month))
            .map(|h| MonthRow {
                id: h.id.clone(),
                name: h.name.clone(),
                marks: dates.iter().map(|d| h.achieved_on(*d)).collect(),
            })
            .collect();

        Ok(Self {
            year,
            month,
            dates,
            goals,
            habits,
        })
    }

    /// Build the view for the month containing `date`
    pub fn for_date(data: &ProductivityData, date: NaiveDate) -> Result<Self, TrackerError> {
        Self::build(data, date.year(), date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2025, 1), Some(31));
        assert_eq!(days_in_month(2025, 2), Some(28));
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2025, 4), Some(30));
        assert_eq!(days_in_month(2025, 12), Some(31));
        assert_eq!(days_in_month(2025, 13), None);
        assert_eq!(days_in_month(2025, 0), None);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        let data = ProductivityData::new();
        assert_eq!(
            MonthView::build(&data, 2025, 13),
            Err(TrackerError::InvalidMonth {
                year: 2025,
                month: 13
            })
        );
    }

    #[test]
    fn test_empty_month_has_full_date_axis() {
        let data = ProductivityData::new();
        let view = MonthView::build(&data, 2024, 2).unwrap();
        assert_eq!(view.dates.len(), 29);
        assert_eq!(view.dates[0], NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(view.dates[28], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(view.goals.is_empty());
        assert!(view.habits.is_empty());
    }
}
