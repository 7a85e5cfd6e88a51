use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Time span bounding the races of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl SessionWindow {
    /// Local time the default window opens.
    pub const DEFAULT_OPEN: NaiveTime = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
    /// Local time the default window closes.
    pub const DEFAULT_CLOSE: NaiveTime = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

    /// Creates a window, swapping the bounds if given in reverse.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start { Self { start: end, end: start } } else { Self { start, end } }
    }

    /// Window between two local wall-clock times on `date` in `tz`.
    ///
    /// Returns `None` if a bound does not exist on that date (DST gap).
    pub fn on_date<Tz: TimeZone>(date: NaiveDate, open: NaiveTime, close: NaiveTime, tz: &Tz) -> Option<Self> {
        let start = tz.from_local_datetime(&date.and_time(open)).earliest()?;
        let end = tz.from_local_datetime(&date.and_time(close)).latest()?;
        Some(Self::new(start.with_timezone(&Utc), end.with_timezone(&Utc)))
    }

    /// Today's default window, 08:00 to 18:00 local time.
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self::on_date(today, Self::DEFAULT_OPEN, Self::DEFAULT_CLOSE, &Local).unwrap_or_else(|| {
            let start = Utc::now();
            Self::new(start, start + chrono::TimeDelta::hours(10))
        })
    }

    pub fn start(&self) -> DateTime<Utc> { self.start }
    pub fn end(&self) -> DateTime<Utc> { self.end }
    pub fn contains(&self, t: DateTime<Utc>) -> bool { t >= self.start && t <= self.end }
}

impl Default for SessionWindow {
    fn default() -> Self { Self::today() }
}
