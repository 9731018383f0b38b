use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" and "today" for every tracker operation
pub trait Clock: Send + Sync + 'static {
    /// Current instant, used for `createdAt` timestamps
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar date in the user's local timezone
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self { now, today }
    }

    /// Freeze the clock at noon UTC of `today`
    pub fn at_date(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { now, today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
