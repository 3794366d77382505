//! The simulated calendar.
//!
//! Time advances in whole hours. Months are numbered 0–11 and every month is treated as having
//! the same number of days, which is all the seasonal models need.
use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The number of hourly steps in a simulated day
pub const HOURS_PER_DAY: usize = 24;

/// The number of months in a simulated year
pub const MONTHS_PER_YEAR: u32 = 12;

/// The number of days in every simulated month
pub const DAYS_PER_MONTH: u32 = 30;

/// A month of the year, numbered from 0 (January) to 11 (December)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month(u32);

impl Month {
    /// Create a new [`Month`], checking that it is in range
    pub fn new(month: u32) -> Result<Self> {
        ensure!(
            month < MONTHS_PER_YEAR,
            "Month must be between 0 and {}, got {month}",
            MONTHS_PER_YEAR - 1
        );
        Ok(Self(month))
    }

    /// The zero-based month number
    pub fn index(self) -> u32 {
        self.0
    }

    /// The month number as a float, for use in the seasonal models
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// The following month, wrapping around at the end of the year
    pub fn next(self) -> Self {
        Self((self.0 + 1) % MONTHS_PER_YEAR)
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTime {
    /// The current month
    pub month: Month,
    /// Day of the month (starting at 1)
    pub day: u32,
    /// Hour of the day (0–23)
    pub hour: usize,
}

impl SimTime {
    /// Create a new [`SimTime`] on the first day of the given month
    pub fn new(month: Month, hour: usize) -> Result<Self> {
        ensure!(
            hour < HOURS_PER_DAY,
            "Hour must be between 0 and {}, got {hour}",
            HOURS_PER_DAY - 1
        );

        Ok(Self {
            month,
            day: 1,
            hour,
        })
    }

    /// Move forward by one hour.
    ///
    /// # Returns
    ///
    /// True if the month changed (and profiles therefore need recomputing).
    pub fn advance_hour(&mut self) -> bool {
        self.hour += 1;
        if self.hour < HOURS_PER_DAY {
            return false;
        }

        self.hour = 0;
        self.day += 1;
        if self.day <= DAYS_PER_MONTH {
            return false;
        }

        self.day = 1;
        self.month = self.month.next();
        true
    }
}

impl Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "month {} day {} {:02}:00",
            self.month, self.day, self.hour
        )
    }
}
