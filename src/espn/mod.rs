pub mod cache;
pub mod client;
pub mod source;

pub use cache::JsonCache;
pub use client::{EspnClient, FetchError};
pub use source::PicksSource;
