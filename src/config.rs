use std::{fs, path::Path};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{core::SmartChargeSensor, prelude::*};

/// Configured smart charge sensors.
#[derive(Debug, Default, Serialize, Deserialize)]
#[must_use]
pub struct Config {
    #[serde(default)]
    pub sensors: Vec<SmartChargeSensor>,
}

impl Config {
    /// Read the configuration, a missing file is an empty one.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!("no configuration file");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        config.validate()?;
        info!(n_sensors = config.sensors.len(), "loaded");
        Ok(config)
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write_to(&self, path: &Path) -> Result {
        fs::write(path, toml::to_string(self)?)
            .with_context(|| format!("failed to write `{}`", path.display()))?;
        info!(n_sensors = self.sensors.len(), "saved");
        Ok(())
    }

    pub fn validate(&self) -> Result {
        for sensor in &self.sensors {
            validate_sensor(sensor)?;
        }
        if let Some(name) = self.sensors.iter().map(|sensor| &sensor.name).duplicates().next() {
            bail!("sensor `{name}` is configured more than once");
        }
        Ok(())
    }

    pub fn add(&mut self, sensor: SmartChargeSensor) -> Result {
        validate_sensor(&sensor)?;
        ensure!(self.get(&sensor.name).is_none(), "sensor `{}` already exists", sensor.name);
        self.sensors.push(sensor);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<SmartChargeSensor> {
        let index = self
            .sensors
            .iter()
            .position(|sensor| sensor.name == name)
            .with_context(|| format!("sensor `{name}` is not configured"))?;
        Ok(self.sensors.remove(index))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SmartChargeSensor> {
        self.sensors.iter().find(|sensor| sensor.name == name)
    }
}

fn validate_sensor(sensor: &SmartChargeSensor) -> Result {
    ensure!(!sensor.name.trim().is_empty(), "sensor name must not be empty");
    ensure!(sensor.count >= 1, "sensor `{}` must charge for at least one hour", sensor.name);
    if let Some(before_hour) = sensor.before_hour {
        ensure!(before_hour <= 23, "sensor `{}`: hour {before_hour} is out of range", sensor.name);
    }
    Ok(())
}
