//! [Tibber](https://developer.tibber.com) GraphQL client.

use async_trait::async_trait;
use itertools::Itertools;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    api::{PriceFeed, PriceMap, PriceSnapshot, client},
    prelude::*,
};

const URL: &str = "https://api.tibber.com/v1-beta/gql";

const HOMES_QUERY: &str = "{ viewer { homes { id appNickname address { address1 } meteringPointData { gridCompany } currentSubscription { status priceInfo { current { total startsAt currency } today { total startsAt } tomorrow { total startsAt } } } } } }";

pub struct Api {
    client: Client,
    access_token: String,
    home_id: Option<String>,
}

impl Api {
    /// Build a client, the token is expected to be a personal access token.
    pub fn try_new(access_token: &str, home_id: Option<String>) -> Result<Self> {
        // The token is often pasted with stray spaces:
        let access_token = access_token.replace(' ', "");
        ensure!(!access_token.is_empty(), "the Tibber access token is empty");
        Ok(Self { client: client::try_new()?, access_token, home_id })
    }

    #[instrument(skip_all)]
    pub async fn get_homes(&self) -> Result<Vec<Home>> {
        info!("fetching…");
        let homes = self
            .client
            .post(URL)
            .bearer_auth(&self.access_token)
            .json(&Request { query: HOMES_QUERY })
            .send()
            .await
            .context("failed to call")?
            .error_for_status()
            .context("request failed")?
            .json::<Response>()
            .await
            .context("failed to deserialize the response")?
            .into_homes()?;
        info!(n_homes = homes.len(), "fetched");
        Ok(homes)
    }

    /// Pick the configured home, or the first one with an active subscription.
    fn pick_home(&self, homes: Vec<Home>) -> Result<Home> {
        match &self.home_id {
            Some(home_id) => homes
                .into_iter()
                .find(|home| &home.id == home_id)
                .with_context(|| format!("home `{home_id}` is not found")),
            None => homes
                .into_iter()
                .find(Home::has_active_subscription)
                .context("no home with an active subscription"),
        }
    }
}

#[async_trait]
impl PriceFeed for Api {
    #[instrument(skip_all)]
    async fn fetch(&self) -> Result<PriceSnapshot> {
        let home = self.pick_home(self.get_homes().await?)?;
        if !home.has_active_subscription() {
            warn!(home_id = %home.id, "the home has no active subscription");
        }
        Ok(PriceSnapshot {
            home_name: home.name().map(str::to_string),
            grid_company: home
                .metering_point_data
                .as_ref()
                .and_then(|data| data.grid_company.clone()),
            currency: home.currency().map(str::to_string),
            prices: home.price_total(),
        })
    }
}

#[derive(Serialize)]
struct Request {
    query: &'static str,
}

#[derive(Deserialize)]
struct Response {
    data: Option<Data>,

    #[serde(default)]
    errors: Vec<ResponseError>,
}

impl Response {
    fn into_homes(self) -> Result<Vec<Home>> {
        if !self.errors.is_empty() {
            let messages = self.errors.iter().map(|error| &error.message).join("; ");
            bail!("Tibber API error: {messages}");
        }
        Ok(self.data.context("the response contains no data")?.viewer.homes)
    }
}

#[derive(Deserialize)]
struct ResponseError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    viewer: Viewer,
}

#[derive(Deserialize)]
struct Viewer {
    #[serde(default)]
    homes: Vec<Home>,
}

#[derive(Debug, Deserialize)]
pub struct Home {
    pub id: String,

    #[serde(rename = "appNickname")]
    pub app_nickname: Option<String>,

    pub address: Option<Address>,

    #[serde(rename = "meteringPointData")]
    pub metering_point_data: Option<MeteringPointData>,

    #[serde(rename = "currentSubscription")]
    pub current_subscription: Option<Subscription>,
}

impl Home {
    const ACTIVE_STATUSES: [&'static str; 3] =
        ["running", "awaiting market", "awaiting time restriction"];

    /// App nickname, or the first address line when there is none.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.app_nickname
            .as_deref()
            .or_else(|| self.address.as_ref().and_then(|address| address.address1.as_deref()))
    }

    #[must_use]
    pub fn has_active_subscription(&self) -> bool {
        self.current_subscription
            .as_ref()
            .and_then(|subscription| subscription.status.as_deref())
            .is_some_and(|status| Self::ACTIVE_STATUSES.contains(&status))
    }

    fn price_info(&self) -> Option<&PriceInfo> {
        self.current_subscription.as_ref()?.price_info.as_ref()
    }

    #[must_use]
    pub fn currency(&self) -> Option<&str> {
        self.price_info()?.current.as_ref()?.currency.as_deref()
    }

    /// Today's and tomorrow's total prices by their start time.
    #[must_use]
    pub fn price_total(&self) -> PriceMap {
        let Some(price_info) = self.price_info() else {
            return PriceMap::new();
        };
        price_info
            .today
            .iter()
            .flatten()
            .chain(price_info.tomorrow.iter().flatten())
            .filter_map(|price| Some((price.starts_at.clone(), price.total?)))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct Address {
    pub address1: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeteringPointData {
    #[serde(rename = "gridCompany")]
    pub grid_company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Subscription {
    pub status: Option<String>,

    #[serde(rename = "priceInfo")]
    price_info: Option<PriceInfo>,
}

#[derive(Debug, Deserialize)]
struct PriceInfo {
    current: Option<Price>,
    today: Option<Vec<Price>>,
    tomorrow: Option<Vec<Price>>,
}

#[derive(Debug, Deserialize)]
struct Price {
    total: Option<f64>,

    #[serde(rename = "startsAt")]
    starts_at: String,

    currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    const RESPONSE: &str = r#"{
        "data": {
            "viewer": {
                "homes": [
                    {
                        "id": "inactive",
                        "appNickname": null,
                        "address": { "address1": "Old street 1" },
                        "meteringPointData": null,
                        "currentSubscription": null
                    },
                    {
                        "id": "home",
                        "appNickname": null,
                        "address": { "address1": "Kungsgatan 2" },
                        "meteringPointData": { "gridCompany": "Ellevio" },
                        "currentSubscription": {
                            "status": "running",
                            "priceInfo": {
                                "current": {
                                    "total": 0.9143,
                                    "startsAt": "2023-01-02T00:00:00.000+01:00",
                                    "currency": "SEK"
                                },
                                "today": [
                                    { "total": 0.9143, "startsAt": "2023-01-02T00:00:00.000+01:00" },
                                    { "total": 0.8275, "startsAt": "2023-01-02T01:00:00.000+01:00" }
                                ],
                                "tomorrow": [
                                    { "total": 0.9143, "startsAt": "2023-01-03T00:00:00.000+01:00" },
                                    { "total": null, "startsAt": "2023-01-03T01:00:00.000+01:00" }
                                ]
                            }
                        }
                    }
                ]
            }
        }
    }"#;

    fn api(home_id: Option<&str>) -> Result<Api> {
        Api::try_new("some token", home_id.map(str::to_string))
    }

    #[test]
    fn test_decode_homes() -> Result {
        let homes = serde_json::from_str::<Response>(RESPONSE)?.into_homes()?;
        assert_eq!(homes.len(), 2);

        let home = &homes[1];
        assert!(home.has_active_subscription());
        assert_eq!(home.name(), Some("Kungsgatan 2"));
        assert_eq!(home.currency(), Some("SEK"));

        let prices = home.price_total();
        assert_eq!(
            prices.keys().map(String::as_str).collect_vec(),
            [
                "2023-01-02T00:00:00.000+01:00",
                "2023-01-02T01:00:00.000+01:00",
                "2023-01-03T00:00:00.000+01:00",
            ],
        );

        assert!(!homes[0].has_active_subscription());
        assert!(homes[0].price_total().is_empty());
        Ok(())
    }

    #[test]
    fn test_pick_first_active_home() -> Result {
        let homes = serde_json::from_str::<Response>(RESPONSE)?.into_homes()?;
        assert_eq!(api(None)?.pick_home(homes)?.id, "home");
        Ok(())
    }

    #[test]
    fn test_pick_configured_home() -> Result {
        let homes = serde_json::from_str::<Response>(RESPONSE)?.into_homes()?;
        assert_eq!(api(Some("inactive"))?.pick_home(homes)?.id, "inactive");

        let homes = serde_json::from_str::<Response>(RESPONSE)?.into_homes()?;
        assert!(api(Some("unknown"))?.pick_home(homes).is_err());
        Ok(())
    }

    #[test]
    fn test_graphql_errors() -> Result {
        let response = serde_json::from_str::<Response>(
            r#"{"data": null, "errors": [{"message": "invalid token"}, {"message": "try again"}]}"#,
        )?;
        let error = response.into_homes().unwrap_err();
        assert_eq!(error.to_string(), "Tibber API error: invalid token; try again");
        Ok(())
    }

    #[test]
    fn test_empty_token() {
        assert!(api(None).is_ok());
        assert!(Api::try_new("  ", None).is_err());
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_fetch_ok() -> Result {
        let api = Api::try_new(&env::var("TIBBER_ACCESS_TOKEN")?, None)?;
        let (snapshot, selector) = api.fetch_selector().await?;
        assert!(!snapshot.prices.is_empty());
        assert!(selector.series().iter().is_sorted_by_key(|quote| quote.timestamp));
        Ok(())
    }
}
