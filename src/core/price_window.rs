use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Timelike};
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::{
    core::{error::Error, quote::PriceQuote, series::PriceSeries},
    prelude::*,
};

/// Picks the cheapest slots out of a price snapshot.
///
/// The selector does not outlive the update cycle: build a new one for every fresh snapshot.
#[derive(Clone, Debug)]
#[must_use]
pub struct PriceWindowSelector {
    series: PriceSeries,
}

impl From<PriceSeries> for PriceWindowSelector {
    fn from(series: PriceSeries) -> Self {
        Self { series }
    }
}

impl PriceWindowSelector {
    /// Build the selector from the feed's `timestamp → price` mapping.
    pub fn try_from_map<K: AsRef<str>>(
        map: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, Error> {
        PriceSeries::try_from_map(map).map(Self::from)
    }

    pub const fn series(&self) -> &PriceSeries {
        &self.series
    }

    /// Select `count` cheapest quotes and return them in chronological order.
    ///
    /// - `time_from`: only quotes starting at or after this instant are eligible.
    /// - `before_hour`: only quotes before the next occurrence of this hour-of-day are eligible.
    ///   It is only honoured together with `time_from`.
    ///
    /// Equal prices are resolved in favour of the earlier quote.
    #[instrument(skip(self), fields(n_quotes = self.series.len()))]
    pub fn find_cheapest_hours(
        &self,
        count: usize,
        time_from: Option<DateTime<FixedOffset>>,
        before_hour: Option<u32>,
    ) -> Result<Vec<PriceQuote>, Error> {
        if let Some(time_from) = time_from
            && !self.series.is_comparable(time_from)
        {
            return Err(Error::IncomparableTime { time: time_from.to_rfc3339() });
        }
        let max_time = match (time_from, before_hour) {
            (Some(time_from), Some(before_hour)) => Some(cutoff(time_from, before_hour)?),
            _ => None,
        };

        let eligible = self
            .series
            .iter()
            .filter(|quote| time_from.is_none_or(|time_from| quote.timestamp >= time_from))
            .filter(|quote| max_time.is_none_or(|max| quote.timestamp.naive_local() < max))
            .copied()
            .collect_vec();
        let selection = eligible
            .iter()
            .copied()
            .sorted_by_key(|quote| OrderedFloat(quote.price))
            .take(count)
            .sorted_by_key(|quote| quote.timestamp)
            .collect_vec();

        debug!(?max_time, n_eligible = eligible.len(), n_selected = selection.len(), "selected");
        Ok(selection)
    }
}

/// Next occurrence of `before_hour:00` on the wall clock, at or after `time_from`.
///
/// Rolls over to the next day when `time_from` is already at or past the cutoff hour.
/// Quotes are compared against it in their own offsets,
/// so the hour-of-day holds across DST switches.
fn cutoff(time_from: DateTime<FixedOffset>, before_hour: u32) -> Result<NaiveDateTime, Error> {
    let time_from = time_from.naive_local();
    let max_time = time_from
        .date()
        .and_hms_opt(before_hour, 0, 0)
        .ok_or(Error::InvalidCutoffHour(before_hour))?;
    if time_from.hour() >= before_hour {
        Ok(max_time + TimeDelta::days(1))
    } else {
        Ok(max_time)
    }
}
