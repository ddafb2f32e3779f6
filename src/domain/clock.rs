use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// Time source for the ledger engine. The daily withdrawal counter rolls
/// over on calendar-date changes, so the engine reads "now" through this
/// seam instead of the wall clock - tests inject a fixed clock to drive
/// rollover deterministically.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date the daily counter applies to.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Second-resolution timestamp for history entries.
    fn timestamp(&self) -> NaiveDateTime {
        self.now().naive_utc().trunc_subsecs(0)
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a single instant, for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to noon on the given date.
    pub fn on_date(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap().and_utc())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
