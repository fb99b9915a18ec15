pub mod backend;
pub mod chat;
pub mod kitespots;
pub mod locations;
pub mod news;
pub mod timezone;
pub mod weather;

pub use backend::BackendClient;
pub use chat::ChatService;
pub use kitespots::{KitespotFilters, KitespotService};
pub use locations::{LocationService, Suggestions};
pub use news::NewsService;
pub use timezone::TimezoneService;
pub use weather::WeatherService;
