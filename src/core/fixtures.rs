//! Two days of hourly prices, 2023-01-02 and 2023-01-03, with identical daily profiles.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::core::{price_window::PriceWindowSelector, quote::parse_instant};

pub const DAILY_PRICES: [f64; 24] = [
    0.9143, 0.8275, 0.8441, 0.7232, 0.8054, 1.0925, 1.5349, 2.0301, 2.1384, 2.1532, 2.1332, 2.1018,
    2.1161, 2.1075, 2.1692, 2.2685, 2.3734, 2.4722, 2.5381, 2.3952, 2.2359, 2.0785, 1.9395, 1.7503,
];

pub fn price_map() -> BTreeMap<String, f64> {
    ["2023-01-02", "2023-01-03"]
        .into_iter()
        .flat_map(|date| {
            DAILY_PRICES
                .into_iter()
                .enumerate()
                .map(move |(hour, price)| (format!("{date}T{hour:02}:00:00.000+01:00"), price))
        })
        .collect()
}

pub fn selector() -> PriceWindowSelector {
    PriceWindowSelector::try_from_map(price_map()).unwrap()
}

/// Fixture-local time, for example `at("2023-01-02T04:00")`.
pub fn at(local: &str) -> DateTime<FixedOffset> {
    parse_instant(&format!("{local}:00.000+01:00")).unwrap()
}
