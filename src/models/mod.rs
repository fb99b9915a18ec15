pub mod identifier;
pub mod kitespot;
pub mod location;
pub mod news;
pub mod timezone;

pub use identifier::{canonical_spot_path, SpotIdentifier};
pub use kitespot::KiteSpot;
pub use location::{filter_locations, KnownLocation, FALLBACK_LOCATION_COUNT, KNOWN_LOCATIONS};
pub use news::{NewsApiResponse, NewsItem, NewsResponse, NewsSource};
pub use timezone::TimeZoneInfo;
