mod client;
mod feed;
mod price_file;
pub mod tibber;

pub use self::{
    feed::{PriceFeed, PriceMap, PriceSnapshot},
    price_file::PriceFile,
};
