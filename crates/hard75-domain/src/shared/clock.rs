use chrono::{DateTime, Local, NaiveDate};

/// Source of "now" for everything that depends on the local calendar day.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Today's date in the local time zone
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
