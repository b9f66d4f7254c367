//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a `Timestamp` in the system timezone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_datetime_shape() {
        let ts: Timestamp = "2024-01-15T10:30:45Z".parse().unwrap();
        let text = LocalDateTime(&ts).to_string();
        // Date part depends on the system zone; the layout does not
        assert_eq!(text.split(' ').count(), 3);
        assert_eq!(text.split(' ').nth(1).map(str::len), Some(8));
    }
}
