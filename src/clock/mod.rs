//! Synchronizes time across components

use std::ops::Deref;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use time::{format_description, Date, OffsetDateTime};

///[DateTime] is a wrapper around the epoch time as i64. This type also functions as a wrapper
///around the time package which offers the datetime functionality needed at the edges, such as
///parsing calendar dates in fixtures.
//The internal representation with the time package should remain hidden from clients. Whilst this
//results in some duplication of the API, this retains the option to get rid of the dependency on
//time or change individual functions later.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DateTime(i64);

impl DateTime {
    pub fn from_date_string(val: &str, date_fmt: &str) -> Self {
        let format = format_description::parse(date_fmt).unwrap();
        let parsed_date = Date::parse(val, &format).unwrap();
        let parsed_time = parsed_date.with_time(time::macros::time!(09:00));
        Self::from(parsed_time.assume_utc().unix_timestamp())
    }
}

impl Deref for DateTime {
    type Target = i64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<OffsetDateTime> for DateTime {
    fn from(value: OffsetDateTime) -> Self {
        value.unix_timestamp().into()
    }
}

impl From<DateTime> for i64 {
    fn from(v: DateTime) -> Self {
        v.0
    }
}

impl From<i64> for DateTime {
    fn from(v: i64) -> Self {
        DateTime(v)
    }
}

#[doc(hidden)]
#[derive(Debug)]
pub enum ClockInner {
    //Reads the system clock on every call
    Wall,
    //Returns the programmed instant until a client moves it
    Fixed(DateTime),
}

/// Used to synchronize time between components.
///
/// Components that filter by the current time hold a shared reference instead of reading time
/// independently, which removes the scope for parts of the system disagreeing about "now" due to
/// inadvertently incorrect sequencing of operations. It also means tests can hold one handle,
/// hand a clone to the component under test, and move time underneath it.
///
/// [Clock] is thread-safe and wrapped in [Arc] so can be cheaply cloned and references held
/// across the application.
#[derive(Debug)]
pub struct Clock {
    inner: Arc<Mutex<ClockInner>>,
}

impl Clone for Clock {
    fn clone(&self) -> Self {
        Clock {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Clock {
    pub fn now(&self) -> DateTime {
        let inner = self.inner.lock().unwrap();
        match *inner {
            ClockInner::Wall => OffsetDateTime::now_utc().into(),
            ClockInner::Fixed(date) => date,
        }
    }

    pub fn is_fixed(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        matches!(*inner, ClockInner::Fixed(_))
    }

    /// Overwrite the instant of a fixed clock. Panics on a wall clock as there is no sensible
    /// interpretation and continuing would silently diverge from system time.
    pub fn set(&mut self, date: impl Into<DateTime>) {
        let mut inner_mut = self.inner.lock().unwrap();
        match *inner_mut {
            ClockInner::Fixed(_) => *inner_mut = ClockInner::Fixed(date.into()),
            ClockInner::Wall => panic!("Client has set the time on a wall clock"),
        }
    }

    /// Move a fixed clock forward. Panics on a wall clock.
    pub fn advance(&mut self, seconds: i64) {
        let mut inner_mut = self.inner.lock().unwrap();
        match *inner_mut {
            ClockInner::Fixed(date) => {
                *inner_mut = ClockInner::Fixed(DateTime::from(*date + seconds))
            }
            ClockInner::Wall => panic!("Client has advanced a wall clock"),
        }
    }

    pub fn wall() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClockInner::Wall)),
        }
    }

    pub fn fixed(start: impl Into<DateTime>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ClockInner::Fixed(start.into()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, DateTime};

    #[test]
    #[should_panic]
    fn test_that_advancing_a_wall_clock_triggers_panic() {
        let mut clock = Clock::wall();
        clock.advance(900);
    }

    #[test]
    #[should_panic]
    fn test_that_setting_a_wall_clock_triggers_panic() {
        let mut clock = Clock::wall();
        clock.set(100);
    }

    #[test]
    fn test_that_fixed_clock_returns_programmed_instant() {
        let mut clock = Clock::fixed(100);
        assert_eq!(i64::from(clock.now()), 100);

        clock.advance(900);
        assert_eq!(i64::from(clock.now()), 1000);

        clock.set(50);
        assert_eq!(i64::from(clock.now()), 50);
    }

    #[test]
    fn test_that_clones_share_the_same_time() {
        let mut clock = Clock::fixed(100);
        let handle = clock.clone();

        clock.advance(10);
        assert_eq!(i64::from(handle.now()), 110);
    }

    #[test]
    fn test_that_wall_clock_reads_system_time() {
        let clock = Clock::wall();
        assert!(*clock.now() > 0);
        assert!(!clock.is_fixed());
    }

    #[test]
    fn test_that_date_string_parses_to_expected_epoch() {
        //09:00 UTC on the parsed date
        let date = DateTime::from_date_string("2021-01-01", "[year]-[month]-[day]");
        assert_eq!(i64::from(date), 1609491600);
    }
}
