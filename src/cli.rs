use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::rc::Rc;
use thiserror::Error;

use crate::calendar::{self, WeekStart};
use crate::database::{Database, DatabaseError};
use crate::day_view::DayView;
use crate::format;
use crate::geolocation::{self, FixedGeolocator, Geolocator, NoGeolocator};
use crate::models::{Coordinates, NewDreamEntry};
use crate::mood::SUGGESTED_MOODS;
use crate::utils::{canonical_date, parse_date, today};

#[derive(Parser)]
#[command(name = "dreamlog")]
#[command(about = "Dream journal - record dreams by date and browse them on a calendar")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new dream
    Add {
        /// Dream title
        name: String,
        /// What happened in the dream
        #[arg(short, long, default_value = "")]
        description: String,
        /// How it felt (e.g. Joyful, Calm, Scared, Confused, Anxious)
        #[arg(short, long, default_value = "")]
        mood: String,
        /// Where the dream took place
        #[arg(short, long, default_value = "")]
        location: String,
        /// Additional notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
        /// Date to file the dream under (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Latitude of where the dream was recorded
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude of where the dream was recorded
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Show the dreams recorded on a day (default if no subcommand)
    Day {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
    },
    /// Show the week around a day with per-day dream counts
    Week {
        /// Date (YYYY-MM-DD), defaults to today
        date: Option<String>,
        /// Move this many weeks forward (negative for back)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,
    },
    /// Show a month calendar, marking days that have dreams
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },
    /// List the suggested mood labels
    Moods,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid month: {0}")]
    InvalidMonth(u32),
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),
}

/// Resolve an optional YYYY-MM-DD argument, falling back to today
fn resolve_date(date: Option<&str>) -> Result<NaiveDate, CliError> {
    match date {
        Some(date_str) => parse_date(date_str)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e))),
        None => Ok(today()),
    }
}

/// Field values collected by the add command
pub struct AddArgs {
    pub name: String,
    pub description: String,
    pub mood: String,
    pub location: String,
    pub notes: String,
    pub tags: String,
    pub date: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// Handle the add command: insert, then show the refreshed day
pub fn handle_add(args: AddArgs, db: &Rc<Database>) -> Result<(), CliError> {
    let date = resolve_date(args.date.as_deref())?;

    let geolocator: Box<dyn Geolocator> = match args.coordinates {
        Some(coordinates) => Box::new(FixedGeolocator { coordinates, place: None }),
        None => Box::new(NoGeolocator),
    };
    let fix = geolocation::locate(geolocator.as_ref());

    let entry = NewDreamEntry {
        description: args.description,
        mood: args.mood,
        location: args.location,
        notes: args.notes,
        tags: args.tags,
        ..NewDreamEntry::new(canonical_date(date), args.name)
    }
    .with_location_fix(fix);

    let mut view = DayView::with_store(Rc::clone(db), date);
    let id = db.insert_entry(&entry)?;
    println!("Dream recorded (ID: {})", id);

    // The view has no change feed; tell it the day is stale
    view.invalidate();
    println!();
    println!("{}", format::day(view.date(), view.entries()?));
    Ok(())
}

/// Handle the day command
pub fn handle_day(date: Option<String>, db: &Rc<Database>) -> Result<(), CliError> {
    let date = resolve_date(date.as_deref())?;
    let mut view = DayView::with_store(Rc::clone(db), date);
    println!("{}", format::day(view.date(), view.entries()?));
    Ok(())
}

/// Number of entries on each day of `days`
pub fn week_counts(db: &Rc<Database>, days: &[NaiveDate; 7]) -> Result<[usize; 7], DatabaseError> {
    let mut view = DayView::with_store(Rc::clone(db), days[0]);
    let mut counts = [0usize; 7];
    for (count, day) in counts.iter_mut().zip(days) {
        view.set_date(*day);
        *count = view.entries()?.len();
    }
    Ok(counts)
}

/// Handle the week command
pub fn handle_week(
    date: Option<String>,
    offset: i64,
    week_start: WeekStart,
    db: &Rc<Database>,
) -> Result<(), CliError> {
    let date = resolve_date(date.as_deref())?;
    let out_of_range = || CliError::DateOutOfRange(format!("{} shifted by {} weeks", date, offset));
    let selected = calendar::shift_week(date, offset).ok_or_else(out_of_range)?;
    let days = calendar::week_days(selected, week_start).ok_or_else(out_of_range)?;

    let counts = week_counts(db, &days)?;
    println!("{}", format::week_strip(&days, &counts, selected, today()));
    Ok(())
}

/// Days of the month that have at least one entry, in calendar order
pub fn marked_days(
    db: &Database,
    year: i32,
    month: u32,
    week_start: WeekStart,
) -> Result<Vec<NaiveDate>, CliError> {
    let cells = calendar::month_grid(year, month, week_start).ok_or(CliError::InvalidMonth(month))?;
    let mut marked = Vec::new();
    for cell in cells.iter().filter(|c| c.in_month) {
        if !db.query_by_date(&canonical_date(cell.date))?.is_empty() {
            marked.push(cell.date);
        }
    }
    Ok(marked)
}

/// Handle the month command
pub fn handle_month(
    year: Option<i32>,
    month: Option<u32>,
    week_start: WeekStart,
    db: &Rc<Database>,
) -> Result<(), CliError> {
    let now = today();
    let year = year.unwrap_or(now.year());
    let month = month.unwrap_or(now.month());

    let marked = marked_days(db, year, month, week_start)?;
    let grid = format::month_grid(year, month, week_start, now, |d| marked.contains(&d))
        .ok_or(CliError::InvalidMonth(month))?;
    println!("{}", grid);
    Ok(())
}

/// Handle the moods command
pub fn handle_moods() {
    for mood in SUGGESTED_MOODS {
        println!("{}", mood);
    }
}
