pub mod cache;
pub mod client;

pub use cache::RatesCache;
pub use client::HttpRateSource;
