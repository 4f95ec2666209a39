//! Formatting helpers for instants and amounts.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Timestamp rendered in the system time zone as `YYYY-MM-DD HH:MM TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M %Z")
        )
    }
}

/// US dollar amount with four decimals, the precision costs are stored at.
pub struct Usd(pub f64);

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.4}", self.0)
    }
}
