use serde::{Deserialize, Serialize};

use crate::geolocation::LocationFix;
use crate::utils;

/// Stored in the `coordinates` column when no position was captured
pub const COORDINATES_UNAVAILABLE: &str = "coordinates not available";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DreamEntry {
    pub id: i64,
    pub date: String, // YYYY-MM-DD
    pub name: String,
    pub description: String,
    pub mood: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub notes: String,
    pub tags: String, // comma-separated
    pub created_at: String,
}

/// Field set submitted by the entry form; the store assigns the id
#[derive(Debug, Clone, PartialEq)]
pub struct NewDreamEntry {
    pub date: String,
    pub name: String,
    pub description: String,
    pub mood: String,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub notes: String,
    pub tags: String,
    pub created_at: String,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Serialize for the `coordinates` column, using the sentinel when absent
    pub fn to_column(coordinates: Option<&Coordinates>) -> String {
        coordinates
            .and_then(|c| serde_json::to_string(c).ok())
            .unwrap_or_else(|| COORDINATES_UNAVAILABLE.to_string())
    }

    /// Parse a `coordinates` column value. The sentinel and anything that is
    /// not a JSON point both read back as `None`.
    pub fn from_column(value: &str) -> Option<Coordinates> {
        if value == COORDINATES_UNAVAILABLE {
            return None;
        }
        serde_json::from_str(value).ok()
    }
}

impl DreamEntry {
    /// Trimmed, non-empty, de-duplicated tags in the order they were written
    pub fn tag_list(&self) -> Vec<String> {
        utils::parse_tags(&self.tags)
    }

    pub fn calendar_date(&self) -> Option<chrono::NaiveDate> {
        utils::parse_date(&self.date).ok()
    }
}

impl NewDreamEntry {
    pub fn new(date: String, name: String) -> Self {
        let now = chrono::Utc::now()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        Self {
            date,
            name,
            description: String::new(),
            mood: String::new(),
            location: String::new(),
            coordinates: None,
            notes: String::new(),
            tags: String::new(),
            created_at: now,
        }
    }

    /// Fill location fields from a geolocation result. An explicit location
    /// typed by the user wins over the reverse-geocoded description.
    pub fn with_location_fix(mut self, fix: LocationFix) -> Self {
        self.coordinates = fix.coordinates;
        if self.location.is_empty() {
            self.location = fix.place;
        }
        self
    }

    /// The entry as it would read back from the store under `id`
    pub fn into_entry(self, id: i64) -> DreamEntry {
        DreamEntry {
            id,
            date: self.date,
            name: self.name,
            description: self.description,
            mood: self.mood,
            location: self.location,
            coordinates: self.coordinates,
            notes: self.notes,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}
