pub mod calendar;
pub mod cli;
pub mod config;
pub mod database;
pub mod day_view;
pub mod format;
pub mod geolocation;
pub mod models;
pub mod mood;
pub mod utils;

pub use config::Config;
pub use database::{Database, DatabaseError};
pub use day_view::{CalendarDay, DayView};
pub use models::{Coordinates, DreamEntry, NewDreamEntry};
pub use utils::Profile;
