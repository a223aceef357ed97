use std::{fs, path::PathBuf};

use async_trait::async_trait;

use crate::{
    api::{PriceFeed, PriceMap, PriceSnapshot},
    prelude::*,
};

/// Local JSON file with a `{"<timestamp>": <price>}` object.
pub struct PriceFile(PathBuf);

impl PriceFile {
    pub const fn new(path: PathBuf) -> Self {
        Self(path)
    }

    fn read(&self) -> Result<PriceMap> {
        let contents = fs::read(&self.0)
            .with_context(|| format!("failed to read `{}`", self.0.display()))?;
        serde_json::from_slice(&contents)
            .with_context(|| format!("failed to parse `{}`", self.0.display()))
    }
}

#[async_trait]
impl PriceFeed for PriceFile {
    #[instrument(skip_all, fields(path = %self.0.display()))]
    async fn fetch(&self) -> Result<PriceSnapshot> {
        info!("reading…");
        Ok(PriceSnapshot { prices: self.read()?, ..PriceSnapshot::default() })
    }
}
