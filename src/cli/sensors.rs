use clap::{Parser, Subcommand};

use crate::{
    cli::ConfigArgs,
    config::Config,
    core::SmartChargeSensor,
    prelude::*,
    tables::build_sensors_table,
};

#[derive(Parser)]
pub struct SensorsArgs {
    #[clap(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: SensorsCommand,
}

#[derive(Subcommand)]
pub enum SensorsCommand {
    /// List the configured sensors.
    List,

    /// Add a new sensor.
    Add(AddSensorArgs),

    /// Remove the sensor.
    Remove {
        /// Sensor name.
        name: String,
    },
}

#[derive(Parser)]
pub struct AddSensorArgs {
    /// Unique sensor name.
    pub name: String,

    /// Number of charging hours.
    #[clap(long)]
    pub hours: usize,

    /// Hour-of-day the charging must be done by.
    #[clap(long)]
    pub before_hour: Option<u32>,
}

impl From<AddSensorArgs> for SmartChargeSensor {
    fn from(args: AddSensorArgs) -> Self {
        Self::builder().name(args.name).count(args.hours).maybe_before_hour(args.before_hour).build()
    }
}

#[instrument(skip_all, fields(path = %args.config.path.display()))]
pub fn sensors(args: SensorsArgs) -> Result {
    let path = &args.config.path;
    let mut config = Config::read_from(path)?;
    match args.command {
        SensorsCommand::List => {}
        SensorsCommand::Add(sensor) => {
            config.add(sensor.into())?;
            config.write_to(path)?;
        }
        SensorsCommand::Remove { name } => {
            let removed = config.remove(&name)?;
            info!(name = %removed.name, "removed");
            config.write_to(path)?;
        }
    }
    println!("{}", build_sensors_table(&config.sensors));
    Ok(())
}
