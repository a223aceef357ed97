mod error;
#[cfg(test)]
mod fixtures;
mod price_window;
mod quote;
mod series;
mod smart_charge;

pub use self::{
    price_window::PriceWindowSelector,
    quote::{PriceQuote, parse_instant},
    series::PriceSeries,
    smart_charge::{SmartChargeSensor, SmartChargeState},
};
