mod plan;
mod prices;
mod sensors;

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use clap::{Parser, Subcommand};

pub use self::{
    plan::{PlanArgs, plan},
    prices::{PricesArgs, prices},
    sensors::{SensorsArgs, sensors},
};
use crate::{
    api::{PriceFeed, PriceFile, tibber},
    core::{PriceSeries, parse_instant},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch the prices and evaluate the smart charge sensors.
    #[clap(name = "plan")]
    Plan(Box<PlanArgs>),

    /// Show the current electricity price and the upcoming prices.
    #[clap(name = "prices")]
    Prices(Box<PricesArgs>),

    /// Manage the configured smart charge sensors.
    #[clap(name = "sensors")]
    Sensors(Box<SensorsArgs>),
}

#[derive(Parser)]
pub struct PriceSourceArgs {
    /// Read the prices from a JSON file instead of calling Tibber.
    ///
    /// The file contains a single object mapping ISO-8601 timestamps to prices.
    #[clap(long = "prices-file", env = "PRICES_FILE")]
    pub prices_file: Option<PathBuf>,

    /// Tibber personal access token.
    #[clap(long = "tibber-access-token", env = "TIBBER_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Tibber home ID, defaults to the first home with an active subscription.
    #[clap(long = "tibber-home-id", env = "TIBBER_HOME_ID")]
    pub home_id: Option<String>,
}

impl PriceSourceArgs {
    pub fn feed(&self) -> Result<Box<dyn PriceFeed>> {
        match (&self.prices_file, &self.access_token) {
            (Some(path), _) => Ok(Box::new(PriceFile::new(path.clone()))),
            (None, Some(access_token)) => {
                Ok(Box::new(tibber::Api::try_new(access_token, self.home_id.clone())?))
            }
            (None, None) => bail!("either a prices file or a Tibber access token is required"),
        }
    }
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// Smart charge sensor configuration.
    #[clap(long = "config", env = "SMART_CHARGE_CONFIG", default_value = "smart-charge.toml")]
    pub path: PathBuf,
}

#[derive(Parser)]
pub struct NowArgs {
    /// Evaluate at this instant instead of the current time, for example `2023-01-02T05:00:00+01:00`.
    #[clap(long = "now", value_parser = parse_instant)]
    pub now: Option<DateTime<FixedOffset>>,
}

impl NowArgs {
    /// The explicit instant, or the current time in the series' offset.
    pub fn resolve(&self, series: &PriceSeries) -> DateTime<FixedOffset> {
        self.now.unwrap_or_else(|| series.align(Local::now().fixed_offset()))
    }
}
