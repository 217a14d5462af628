use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use std::rc::Rc;
use tracing::{debug, warn};

use crate::database::{Database, DatabaseError};
use crate::models::DreamEntry;
use crate::utils;

/// A value that falls on a calendar day
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the day in the value's own timezone, never a UTC-shifted one
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Entries recorded for one selected day.
///
/// The store never pushes changes, so the view re-queries only when told to:
/// the date changed, the store was attached, or `invalidate` was called after
/// a write. Reads in between are served from the cached list.
pub struct DayView {
    store: Option<Rc<Database>>,
    date: NaiveDate,
    entries: Vec<DreamEntry>,
    stale: bool,
}

impl DayView {
    /// A view with no store yet; it reads as empty until one is attached
    pub fn new(date: impl CalendarDay) -> Self {
        Self {
            store: None,
            date: date.calendar_day(),
            entries: Vec::new(),
            stale: true,
        }
    }

    pub fn with_store(store: Rc<Database>, date: impl CalendarDay) -> Self {
        let mut view = Self::new(date);
        view.store = Some(store);
        view
    }

    /// Hand the store to the view. The next read queries it.
    pub fn attach_store(&mut self, store: Rc<Database>) {
        self.store = Some(store);
        self.stale = true;
    }

    pub fn store(&self) -> Option<&Rc<Database>> {
        self.store.as_ref()
    }

    /// Select a day. Only a different day marks the view stale.
    pub fn set_date(&mut self, date: impl CalendarDay) {
        let day = date.calendar_day();
        if day != self.date {
            self.date = day;
            self.stale = true;
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The `YYYY-MM-DD` key used for the query
    pub fn canonical_date(&self) -> String {
        utils::canonical_date(self.date)
    }

    /// Signal that the data may have changed behind the view
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Entries for the selected day, re-queried first if the view is stale
    pub fn entries(&mut self) -> Result<&[DreamEntry], DatabaseError> {
        if self.stale {
            self.refresh()?;
        }
        Ok(&self.entries)
    }

    /// Re-run the query unconditionally.
    /// On failure the previous list is kept and the view stays stale.
    pub fn refresh(&mut self) -> Result<&[DreamEntry], DatabaseError> {
        let Some(store) = self.store.as_ref() else {
            self.entries.clear();
            return Ok(&self.entries);
        };

        let date = self.canonical_date();
        debug!(date = %date, "refreshing day view");
        match store.query_by_date(&date) {
            Ok(entries) => {
                self.entries = entries;
                self.stale = false;
                Ok(&self.entries)
            }
            Err(e) => {
                warn!(error = %e, date = %date, "day view refresh failed");
                self.stale = true;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewDreamEntry;
    use chrono::{FixedOffset, Utc};

    fn store() -> Rc<Database> {
        let db = Database::in_memory();
        db.ensure_schema().unwrap();
        Rc::new(db)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(db: &Database, date: &str, name: &str) -> i64 {
        db.insert_entry(&NewDreamEntry::new(date.to_string(), name.to_string()))
            .unwrap()
    }

    #[test]
    fn without_store_reads_empty() {
        let mut view = DayView::new(day(2024, 5, 10));
        assert!(view.entries().unwrap().is_empty());
    }

    #[test]
    fn attaching_store_loads_existing_rows() {
        let db = store();
        add(&db, "2024-05-10", "before attach");

        let mut view = DayView::new(day(2024, 5, 10));
        assert!(view.entries().unwrap().is_empty());

        view.attach_store(Rc::clone(&db));
        assert!(view.is_stale());
        let names: Vec<_> = view.entries().unwrap().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["before attach"]);
    }

    #[test]
    fn cached_until_invalidated() {
        let db = store();
        let mut view = DayView::with_store(Rc::clone(&db), day(2024, 5, 10));
        assert!(view.entries().unwrap().is_empty());
        assert!(!view.is_stale());

        add(&db, "2024-05-10", "late write");
        assert!(view.entries().unwrap().is_empty());

        view.invalidate();
        assert_eq!(view.entries().unwrap().len(), 1);
    }

    #[test]
    fn changing_date_requeries() {
        let db = store();
        add(&db, "2024-03-01", "march first");
        add(&db, "2024-03-02", "march second");

        let mut view = DayView::with_store(db, day(2024, 3, 1));
        assert_eq!(view.entries().unwrap()[0].name, "march first");

        view.set_date(day(2024, 3, 2));
        assert!(view.is_stale());
        assert_eq!(view.entries().unwrap()[0].name, "march second");
    }

    #[test]
    fn same_day_does_not_mark_stale() {
        let db = store();
        let mut view = DayView::with_store(db, day(2024, 3, 1));
        view.entries().unwrap();
        view.set_date(day(2024, 3, 1).and_hms_opt(23, 59, 0).unwrap());
        assert!(!view.is_stale());
    }

    #[test]
    fn canonicalizes_any_granularity() {
        let evening = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 10, 22, 30, 0)
            .unwrap();
        // Already 2024-05-11 in UTC; the local calendar day is what counts
        let view = DayView::new(evening);
        assert_eq!(view.canonical_date(), "2024-05-10");

        let utc = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 1).unwrap();
        assert_eq!(DayView::new(utc).canonical_date(), "2024-01-02");
    }

    #[test]
    fn query_failure_keeps_view_stale() {
        // No schema: the query itself fails
        let db = Rc::new(Database::in_memory());
        let mut view = DayView::with_store(db, day(2024, 3, 1));
        let err = view.entries().unwrap_err();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
        assert!(view.is_stale());

        view.store().unwrap().ensure_schema().unwrap();
        assert!(view.entries().unwrap().is_empty());
    }
}
