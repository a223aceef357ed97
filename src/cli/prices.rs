use clap::Parser;

use crate::{
    cli::{NowArgs, PriceSourceArgs},
    prelude::*,
    tables::{build_prices_table, format_current_price},
};

#[derive(Parser)]
pub struct PricesArgs {
    #[clap(flatten)]
    pub source: PriceSourceArgs,

    #[clap(flatten)]
    pub now: NowArgs,
}

#[instrument(skip_all)]
pub async fn prices(args: &PricesArgs) -> Result {
    let (snapshot, selector) = args.source.feed()?.fetch_selector().await?;
    let now = args.now.resolve(selector.series());
    let current = selector.series().current(now);
    if current.is_none() {
        warn!(%now, "the price feed does not cover the current time");
    }

    let unit = snapshot.unit();
    let home_name = snapshot.home_name.as_deref().unwrap_or("home");
    match &snapshot.grid_company {
        Some(grid_company) => println!("Electricity price {home_name} ({grid_company})"),
        None => println!("Electricity price {home_name}"),
    }
    println!("{}", format_current_price(current, now, &unit));
    println!("{}", build_prices_table(selector.series(), current, &unit));
    Ok(())
}
