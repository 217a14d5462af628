//! Plain-text rendering of entries and calendars for the terminal.

use chrono::{Datelike, NaiveDate};

use crate::calendar::{self, WeekStart};
use crate::models::DreamEntry;
use crate::mood::MoodCategory;

/// Render one entry as a card: title and mood, description, place, notes, tags
pub fn entry_card(entry: &DreamEntry) -> String {
    let mood = MoodCategory::classify(&entry.mood);
    let mut lines = vec![format!("#{} {}  [{} {}]", entry.id, entry.name, mood.symbol(), entry.mood)];

    lines.extend(entry.description.lines().map(|line| format!("  {line}")));

    let mut meta = Vec::new();
    if !entry.location.is_empty() {
        meta.push(format!("at {}", entry.location));
    }
    if let Some(coords) = entry.coordinates {
        meta.push(format!("({:.2}, {:.2})", coords.latitude, coords.longitude));
    }
    if !meta.is_empty() {
        lines.push(format!("  {}", meta.join(" ")));
    }

    if !entry.notes.is_empty() {
        lines.push(format!("  Notes: {}", entry.notes));
    }

    let tags = entry.tag_list();
    if !tags.is_empty() {
        let tags: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
        lines.push(format!("  {}", tags.join(" ")));
    }

    lines.push(format!("  {}", entry.date));
    lines.join("\n")
}

/// Render a day: a heading followed by its cards, or a placeholder line
pub fn day(date: NaiveDate, entries: &[DreamEntry]) -> String {
    let mut out = format!("{}\n", date.format("%A, %B %-d, %Y"));
    if entries.is_empty() {
        out.push_str("No dreams recorded for this day.");
        return out;
    }
    let cards: Vec<String> = entries.iter().map(entry_card).collect();
    out.push_str(&cards.join("\n\n"));
    out
}

/// One line per weekday with its entry count. `*` marks the selected day,
/// `>` marks today.
pub fn week_strip(
    days: &[NaiveDate; 7],
    counts: &[usize; 7],
    selected: NaiveDate,
    today: NaiveDate,
) -> String {
    let lines: Vec<String> = days
        .iter()
        .zip(counts)
        .map(|(day, count)| {
            let marker = if calendar::is_same_day(day, &selected) {
                '*'
            } else if calendar::is_same_day(day, &today) {
                '>'
            } else {
                ' '
            };
            let mut line = format!("{marker} {}", day.format("%a %Y-%m-%d"));
            if *count > 0 {
                let noun = if *count == 1 { "dream" } else { "dreams" };
                line.push_str(&format!("  {count} {noun}"));
            }
            line
        })
        .collect();
    lines.join("\n")
}

/// A 6x7 month grid. Days outside the month are dimmed with `.`, days with
/// entries carry a trailing `*`, today is bracketed. `None` for an invalid month.
pub fn month_grid(
    year: i32,
    month: u32,
    start: WeekStart,
    today: NaiveDate,
    has_entries: impl Fn(NaiveDate) -> bool,
) -> Option<String> {
    let cells = calendar::month_grid(year, month, start)?;
    let title = NaiveDate::from_ymd_opt(year, month, 1)?.format("%B %Y").to_string();

    let mut lines = vec![format!("{title:^35}")];
    lines.push(start.day_labels().iter().map(|label| format!(" {label:>3} ")).collect());

    for row in cells.chunks(7) {
        let mut line = String::new();
        for cell in row {
            let day = cell.date.day();
            let text = if !cell.in_month {
                format!(" {day:>2}.")
            } else if calendar::is_same_day(&cell.date, &today) {
                format!("[{day:>2}]")
            } else {
                format!(" {day:>2} ")
            };
            let mark = if cell.in_month && has_entries(cell.date) { '*' } else { ' ' };
            line.push_str(&text);
            line.push(mark);
        }
        lines.push(line);
    }
    Some(lines.join("\n"))
}
