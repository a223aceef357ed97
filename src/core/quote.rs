use std::fmt::{Debug, Formatter};

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::core::error::Error;

/// Single price observation: the slot start and its price in the feed's currency per kWh.
#[derive(Copy, Clone, PartialEq)]
#[must_use]
pub struct PriceQuote {
    pub timestamp: DateTime<FixedOffset>,
    pub price: f64,
}

impl Debug for PriceQuote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.price, self.timestamp.to_rfc3339())
    }
}

impl PriceQuote {
    pub const fn new(timestamp: DateTime<FixedOffset>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Parse the feed's timestamp key, for example `2023-01-02T03:00:00.000+01:00`.
    pub fn try_parse(timestamp: &str, price: f64) -> Result<Self, Error> {
        DateTime::parse_from_rfc3339(timestamp)
            .map(|parsed| Self::new(parsed, price))
            .map_err(|source| Error::MalformedTimestamp { timestamp: timestamp.to_string(), source })
    }
}

/// Parse a query instant.
///
/// Unlike the price keys, a well-formed local time without an offset is refused as
/// [`Error::IncomparableTime`]: there is no ambient timezone to interpret it in.
pub fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>, Error> {
    DateTime::parse_from_rfc3339(text).map_err(|source| {
        if NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok() {
            Error::IncomparableTime { time: text.to_string() }
        } else {
            Error::MalformedTimestamp { timestamp: text.to_string(), source }
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;

    use super::*;

    #[test]
    #[expect(clippy::float_cmp)]
    fn test_try_parse_feed_timestamp() -> Result<(), Error> {
        let quote = PriceQuote::try_parse("2023-01-02T03:00:00.000+01:00", 0.7232)?;
        assert_eq!(quote.timestamp.hour(), 3);
        assert_eq!(quote.timestamp.offset().local_minus_utc(), 3600);
        assert_eq!(quote.price, 0.7232);
        Ok(())
    }

    #[test]
    fn test_try_parse_malformed() {
        let error = PriceQuote::try_parse("yesterday", 1.0).unwrap_err();
        assert!(matches!(
            error,
            Error::MalformedTimestamp { timestamp, .. } if timestamp == "yesterday"
        ));
    }

    #[test]
    fn test_parse_instant_ok() -> Result<(), Error> {
        let instant = parse_instant("2023-01-02T04:00:00+01:00")?;
        assert_eq!(instant.hour(), 4);
        Ok(())
    }

    #[test]
    fn test_parse_instant_without_offset() {
        assert!(matches!(
            parse_instant("2023-01-02T04:00:00.000"),
            Err(Error::IncomparableTime { .. })
        ));
    }

    #[test]
    fn test_parse_instant_garbage() {
        assert!(matches!(parse_instant("04:00"), Err(Error::MalformedTimestamp { .. })));
    }
}
