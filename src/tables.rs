use chrono::{DateTime, FixedOffset};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::core::{PriceQuote, PriceSeries, SmartChargeSensor, SmartChargeState};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn format_hour(quote: &PriceQuote) -> String {
    quote.timestamp.format("%a %H:%M").to_string()
}

fn format_before_hour(before_hour: Option<u32>) -> String {
    before_hour.map_or_else(|| "—".to_string(), |hour| format!("{hour:02}:00"))
}

/// Median price, or `None` for an empty series.
fn median_price(series: &PriceSeries) -> Option<f64> {
    let prices = series.iter().map(|quote| OrderedFloat(quote.price)).sorted().collect_vec();
    prices.get(prices.len() / 2).map(|price| price.0)
}

#[must_use]
pub fn build_prices_table(series: &PriceSeries, current: Option<PriceQuote>, unit: &str) -> Table {
    let median_price = median_price(series).unwrap_or_default();

    let mut table = new_table();
    table.set_header(vec!["Start", "Price", ""]);
    for quote in series {
        let is_current = current.is_some_and(|current| current.timestamp == quote.timestamp);
        let mut start = Cell::new(quote.timestamp.format("%Y-%m-%d %H:%M"));
        if is_current {
            start = start.add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            start,
            Cell::new(format!("{:.4} {unit}", quote.price))
                .set_alignment(CellAlignment::Right)
                .fg(if quote.price >= median_price { Color::Red } else { Color::Green }),
            Cell::new(if is_current { "◀ now" } else { "" }),
        ]);
    }
    table
}

#[must_use]
pub fn build_smart_charge_table(states: &[SmartChargeState], unit: &str) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Sensor",
        "Charging",
        "Hours",
        "Before",
        "Next hour",
        "Next price",
        "Other hours",
    ]);
    for state in states {
        table.add_row(vec![
            Cell::new(&state.name),
            Cell::new(if state.is_charging { "on" } else { "off" }).fg(if state.is_charging {
                Color::Green
            } else {
                Color::Reset
            }),
            Cell::new(state.count).set_alignment(CellAlignment::Right),
            Cell::new(format_before_hour(state.before_hour)),
            Cell::new(state.next_hour.as_ref().map_or_else(|| "—".to_string(), format_hour)),
            Cell::new(
                state
                    .next_hour
                    .map_or_else(|| "—".to_string(), |quote| format!("{:.4} {unit}", quote.price)),
            )
            .set_alignment(CellAlignment::Right),
            Cell::new(state.other_hours.iter().map(format_hour).join(", "))
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

#[must_use]
pub fn build_sensors_table(sensors: &[SmartChargeSensor]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Sensor", "Hours", "Before"]);
    for sensor in sensors {
        table.add_row(vec![
            Cell::new(&sensor.name),
            Cell::new(sensor.count).set_alignment(CellAlignment::Right),
            Cell::new(format_before_hour(sensor.before_hour)),
        ]);
    }
    table
}

/// One-line summary of the current price.
#[must_use]
pub fn format_current_price(
    current: Option<PriceQuote>,
    now: DateTime<FixedOffset>,
    unit: &str,
) -> String {
    current.map_or_else(
        || format!("no price known at {}", now.format("%Y-%m-%d %H:%M %:z")),
        |quote| format!("{:.4} {unit} since {}", quote.price, quote.timestamp.format("%H:%M")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parse_instant;

    fn series() -> PriceSeries {
        PriceSeries::try_from_map([
            ("2023-01-02T00:00:00.000+01:00", 0.9143),
            ("2023-01-02T01:00:00.000+01:00", 0.8275),
            ("2023-01-02T02:00:00.000+01:00", 0.8441),
        ])
        .unwrap()
    }

    #[test]
    fn test_median_price() {
        assert_eq!(median_price(&series()), Some(0.8441));
        assert_eq!(median_price(&PriceSeries::default()), None);
    }

    #[test]
    fn test_build_prices_table() {
        let series = series();
        let current = series.first().copied();
        let table = build_prices_table(&series, current, "SEK/kWh");
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_format_current_price() {
        let now = parse_instant("2023-01-02T00:30:00+01:00").unwrap();
        let series = series();
        assert_eq!(
            format_current_price(series.current(now), now, "SEK/kWh"),
            "0.9143 SEK/kWh since 00:00",
        );
        let later = parse_instant("2023-01-02T05:00:00+01:00").unwrap();
        assert_eq!(
            format_current_price(series.current(later), later, "SEK/kWh"),
            "no price known at 2023-01-02 05:00 +01:00",
        );
    }
}
