/// Moods offered by the entry form. The store accepts any string.
pub const SUGGESTED_MOODS: [&str; 5] = ["Joyful", "Calm", "Scared", "Confused", "Anxious"];

/// Display grouping for a free-text mood label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodCategory {
    Happy,
    Sad,
    Scared,
    Calm,
    Confused,
    Neutral,
}

impl MoodCategory {
    /// Case-insensitive keyword match, first hit wins
    pub fn classify(mood: &str) -> Self {
        let mood = mood.to_lowercase();
        let has = |keywords: &[&str]| keywords.iter().any(|k| mood.contains(k));

        if has(&["happy", "joy", "good"]) {
            MoodCategory::Happy
        } else if has(&["sad", "depress"]) {
            MoodCategory::Sad
        } else if has(&["scare", "fear", "nightmare"]) {
            MoodCategory::Scared
        } else if has(&["calm", "peace"]) {
            MoodCategory::Calm
        } else if has(&["confus", "weird"]) {
            MoodCategory::Confused
        } else {
            MoodCategory::Neutral
        }
    }

    /// Short text badge for terminal output
    pub fn symbol(self) -> &'static str {
        match self {
            MoodCategory::Happy => ":)",
            MoodCategory::Sad => ":(",
            MoodCategory::Scared => "!!",
            MoodCategory::Calm => "~~",
            MoodCategory::Confused => "??",
            MoodCategory::Neutral => ":|",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggested_moods_classify() {
        let categories: Vec<_> = SUGGESTED_MOODS.iter().map(|m| MoodCategory::classify(m)).collect();
        assert_eq!(
            categories,
            vec![
                MoodCategory::Happy,
                MoodCategory::Calm,
                MoodCategory::Scared,
                MoodCategory::Confused,
                MoodCategory::Neutral,
            ]
        );
    }

    #[test]
    fn free_text_moods() {
        assert_eq!(MoodCategory::classify("Pretty GOOD actually"), MoodCategory::Happy);
        assert_eq!(MoodCategory::classify("depressing"), MoodCategory::Sad);
        assert_eq!(MoodCategory::classify("a nightmare"), MoodCategory::Scared);
        assert_eq!(MoodCategory::classify("peaceful"), MoodCategory::Calm);
        assert_eq!(MoodCategory::classify("so weird"), MoodCategory::Confused);
        assert_eq!(MoodCategory::classify(""), MoodCategory::Neutral);
    }

    #[test]
    fn earlier_keywords_win() {
        // "joy" is checked before "fear"
        assert_eq!(MoodCategory::classify("joyful but fearful"), MoodCategory::Happy);
    }
}
