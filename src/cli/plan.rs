use clap::Parser;
use itertools::Itertools;

use crate::{
    cli::{ConfigArgs, NowArgs, PriceSourceArgs},
    config::Config,
    core::SmartChargeSensor,
    prelude::*,
    render::render_sensor,
    tables::build_smart_charge_table,
};

#[derive(Parser)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub source: PriceSourceArgs,

    #[clap(flatten)]
    pub config: ConfigArgs,

    #[clap(flatten)]
    pub now: NowArgs,

    /// Evaluate a single sensor charging for this many hours instead of the configured ones.
    #[clap(long)]
    pub hours: Option<usize>,

    /// Hour-of-day the ad-hoc sensor must be done by.
    #[clap(long, requires = "hours")]
    pub before_hour: Option<u32>,

    /// Name of the ad-hoc sensor.
    #[clap(long, default_value = "Smart charge")]
    pub name: String,

    /// Print the sensor states as JSON instead of the table.
    #[clap(long)]
    pub json: bool,
}

impl PlanArgs {
    fn sensors(&self) -> Result<Vec<SmartChargeSensor>> {
        let Some(count) = self.hours else {
            return Ok(Config::read_from(&self.config.path)?.sensors);
        };
        let mut config = Config::default();
        config.add(
            SmartChargeSensor::builder()
                .name(self.name.as_str())
                .count(count)
                .maybe_before_hour(self.before_hour)
                .build(),
        )?;
        Ok(config.sensors)
    }
}

#[instrument(skip_all)]
pub async fn plan(args: &PlanArgs) -> Result {
    let sensors = args.sensors()?;
    if sensors.is_empty() {
        warn!("no smart charge sensors configured, add one with `sensors add`");
    }

    let (snapshot, selector) = args.source.feed()?.fetch_selector().await?;
    let now = args.now.resolve(selector.series());
    info!(%now, n_sensors = sensors.len(), "evaluating…");

    let states = sensors
        .iter()
        .map(|sensor| sensor.evaluate(&selector, now))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to evaluate the smart charge sensors")?;

    if args.json {
        let rendered = states.iter().map(render_sensor).collect_vec();
        println!("{}", serde_json::to_string_pretty(&rendered)?);
    } else {
        println!("{}", build_smart_charge_table(&states, &snapshot.unit()));
    }
    Ok(())
}
