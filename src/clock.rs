use chrono::{Local, NaiveDate};
#[cfg(test)]
use mockall::automock;

/// Source of "today" for every date-sensitive calculation.
#[cfg_attr(test, automock)]
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock stuck on one day, used when the CLI is asked to compute as of a given date.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn clock_for(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    }
}
