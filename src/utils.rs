use directories::{ProjectDirs, BaseDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "dreamlog-dev",
            Profile::Prod => "dreamlog",
        }
    }
}

/// Get the configuration directory path for dreamlog
/// If profile is Dev, uses "dreamlog-dev" instead of "dreamlog"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    // On macOS this resolves under ~/Library/Application Support/
    ProjectDirs::from("com", "dreamlog", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for dreamlog
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "dreamlog", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Format a date in the canonical `YYYY-MM-DD` form used as the query key
pub fn canonical_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in the local timezone
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Split a comma-separated tag string into trimmed, non-empty, unique tokens
pub fn parse_tags(tags: &str) -> Vec<String> {
    let mut parsed: Vec<String> = Vec::new();
    for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !parsed.iter().any(|existing| existing == tag) {
            parsed.push(tag.to_string());
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn canonical_date_is_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(canonical_date(date), "2024-03-01");
        assert_eq!(parse_date("2024-03-01").unwrap(), date);
    }

    #[test]
    fn parse_date_rejects_other_forms() {
        assert!(parse_date("01/03/2024").is_err());
        assert!(parse_date("").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn parse_tags_trims_and_drops_empty() {
        assert_eq!(parse_tags("flying,city"), vec!["flying", "city"]);
        assert_eq!(parse_tags("  water , , family,"), vec!["water", "family"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn parse_tags_removes_duplicates() {
        assert_eq!(parse_tags("sea, sky, sea"), vec!["sea", "sky"]);
    }

    #[test]
    fn expand_path_leaves_absolute_paths() {
        assert_eq!(expand_path("/tmp/dreams.db"), PathBuf::from("/tmp/dreams.db"));
    }
}
