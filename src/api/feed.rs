use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::{core::PriceWindowSelector, prelude::*};

/// Feed's `timestamp → price` mapping, timestamps in ISO-8601 with offset.
pub type PriceMap = BTreeMap<String, f64>;

/// One update cycle's worth of prices.
#[derive(Debug, Default)]
#[must_use]
pub struct PriceSnapshot {
    pub home_name: Option<String>,
    pub grid_company: Option<String>,
    pub currency: Option<String>,
    pub prices: PriceMap,
}

impl PriceSnapshot {
    /// Price unit for display, for example `NOK/kWh`.
    #[must_use]
    pub fn unit(&self) -> String {
        format!("{}/kWh", self.currency.as_deref().unwrap_or("¤"))
    }

    /// Build the selector, failing the entire cycle on a malformed timestamp.
    pub fn try_selector(&self) -> Result<PriceWindowSelector> {
        let selector = PriceWindowSelector::try_from_map(
            self.prices.iter().map(|(timestamp, price)| (timestamp, *price)),
        )
        .context("the price feed returned a malformed timestamp")?;
        Ok(selector)
    }
}

#[async_trait]
pub trait PriceFeed: Sync {
    async fn fetch(&self) -> Result<PriceSnapshot>;

    #[instrument(skip_all)]
    async fn fetch_selector(&self) -> Result<(PriceSnapshot, PriceWindowSelector)> {
        let snapshot = self.fetch().await?;
        let selector = snapshot.try_selector()?;
        info!(n_quotes = selector.series().len(), "fetched the prices");
        Ok((snapshot, selector))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_selector_ok() -> Result {
        let snapshot = PriceSnapshot {
            prices: PriceMap::from([
                ("2023-01-02T01:00:00.000+01:00".to_string(), 0.8275),
                ("2023-01-02T00:00:00.000+01:00".to_string(), 0.9143),
            ]),
            ..PriceSnapshot::default()
        };
        assert_eq!(snapshot.try_selector()?.series().len(), 2);
        Ok(())
    }

    #[test]
    fn test_try_selector_malformed() {
        let snapshot = PriceSnapshot {
            prices: PriceMap::from([("soon".to_string(), 0.8275)]),
            ..PriceSnapshot::default()
        };
        assert!(snapshot.try_selector().is_err());
    }

    #[test]
    fn test_unit() {
        let snapshot = PriceSnapshot { currency: Some("SEK".to_string()), ..PriceSnapshot::default() };
        assert_eq!(snapshot.unit(), "SEK/kWh");
    }
}
