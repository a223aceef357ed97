use bon::Builder;
use chrono::{DateTime, DurationRound, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::Error, price_window::PriceWindowSelector, quote::PriceQuote},
    prelude::*,
};

/// Charge for `count` cheapest hours, optionally finishing before `before_hour`.
#[derive(Clone, Debug, Eq, PartialEq, Builder, Serialize, Deserialize)]
#[must_use]
pub struct SmartChargeSensor {
    /// Unique sensor name.
    #[builder(into)]
    pub name: String,

    /// Number of charging hours.
    pub count: usize,

    /// Hour-of-day the charging must be done by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_hour: Option<u32>,
}

/// Evaluated sensor state for the current hour.
#[derive(Clone, Debug)]
#[must_use]
pub struct SmartChargeState {
    pub name: String,
    pub count: usize,
    pub before_hour: Option<u32>,

    /// Start of the current hour, the selection lower bound.
    pub time_from: DateTime<FixedOffset>,

    /// Earliest selected hour.
    pub next_hour: Option<PriceQuote>,

    /// The rest of the selected hours, chronologically.
    pub other_hours: Vec<PriceQuote>,

    /// Whether the current hour is one of the selected ones.
    pub is_charging: bool,
}

impl SmartChargeSensor {
    #[instrument(skip_all, fields(name = %self.name))]
    pub fn evaluate(
        &self,
        selector: &PriceWindowSelector,
        now: DateTime<FixedOffset>,
    ) -> Result<SmartChargeState, Error> {
        let time_from = now.duration_trunc(TimeDelta::hours(1)).unwrap_or(now);
        let mut hours = selector
            .find_cheapest_hours(self.count, Some(time_from), self.before_hour)?
            .into_iter();
        let next_hour = hours.next();
        let is_charging = next_hour.is_some_and(|quote| quote.timestamp == time_from);
        info!(?next_hour, is_charging, "evaluated");
        Ok(SmartChargeState {
            name: self.name.clone(),
            count: self.count,
            before_hour: self.before_hour,
            time_from,
            next_hour,
            other_hours: hours.collect(),
            is_charging,
        })
    }
}
