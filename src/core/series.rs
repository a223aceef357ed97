use chrono::{DateTime, FixedOffset, TimeDelta};
use itertools::Itertools;

use crate::core::{error::Error, quote::PriceQuote};

/// Price quotes ordered by timestamp.
///
/// The order is established once on construction, the series is read-only afterwards.
#[derive(Clone, Default, Debug, derive_more::Deref, derive_more::IntoIterator)]
#[into_iterator(owned, ref)]
#[must_use]
pub struct PriceSeries(Vec<PriceQuote>);

impl FromIterator<PriceQuote> for PriceSeries {
    fn from_iter<T: IntoIterator<Item = PriceQuote>>(iter: T) -> Self {
        // Stable, so duplicate timestamps keep their input order:
        Self(iter.into_iter().sorted_by_key(|quote| quote.timestamp).collect())
    }
}

impl PriceSeries {
    /// Longest slot a quote may cover when there is no following quote.
    pub const MAX_SLOT: TimeDelta = TimeDelta::hours(1);

    /// Parse the feed's `timestamp → price` mapping.
    ///
    /// Fails on the first unparseable key, nothing is partially applied.
    pub fn try_from_map<K: AsRef<str>>(
        map: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, Error> {
        map.into_iter()
            .map(|(timestamp, price)| PriceQuote::try_parse(timestamp.as_ref(), price))
            .collect()
    }

    /// Distinct UTC offsets the quotes are expressed in.
    #[must_use]
    pub fn offsets(&self) -> Vec<FixedOffset> {
        self.0.iter().map(|quote| *quote.timestamp.offset()).unique().collect()
    }

    /// Whether `at` is expressed in one of the series' offsets, so that its hour-of-day
    /// means the same as the quotes' ones.
    #[must_use]
    pub fn is_comparable(&self, at: DateTime<FixedOffset>) -> bool {
        self.0.is_empty() || self.offsets().contains(at.offset())
    }

    /// Quote in effect at the specified instant.
    #[must_use]
    pub fn current(&self, at: DateTime<FixedOffset>) -> Option<PriceQuote> {
        let index = self.0.partition_point(|quote| quote.timestamp <= at);
        let quote = self.0.get(index.checked_sub(1)?)?;
        let slot_end = quote.timestamp + Self::MAX_SLOT;
        let end = self.0.get(index).map_or(slot_end, |next| next.timestamp.min(slot_end));
        (at < end).then_some(*quote)
    }

    /// Express the instant in the offset of the quote in effect at that moment.
    ///
    /// Instants before the series start take the first quote's offset.
    #[must_use]
    pub fn align(&self, at: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        let index = self.0.partition_point(|quote| quote.timestamp <= at);
        self.0
            .get(index.saturating_sub(1))
            .map_or(at, |quote| at.with_timezone(quote.timestamp.offset()))
    }
}
