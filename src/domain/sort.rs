use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::domain::note::Note;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    Title,
    DateAscending,
    DateDescending,
}

impl SortPolicy {
    pub const ALL: [SortPolicy; 3] = [
        SortPolicy::Title,
        SortPolicy::DateAscending,
        SortPolicy::DateDescending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortPolicy::Title => "title",
            SortPolicy::DateAscending => "oldest",
            SortPolicy::DateDescending => "newest",
        }
    }

    pub fn menu_key(self) -> &'static str {
        match self {
            SortPolicy::Title => "1",
            SortPolicy::DateAscending => "2",
            SortPolicy::DateDescending => "3",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortPolicy::Title => "By title (A-Z)",
            SortPolicy::DateAscending => "By date (oldest first)",
            SortPolicy::DateDescending => "By date (newest first)",
        }
    }

    /// Dates compare as raw strings; the stamp layout is fixed width and
    /// zero padded, so string order is chronological order.
    pub fn compare(self, left: &Note, right: &Note) -> Ordering {
        match self {
            SortPolicy::Title => left.title.to_lowercase().cmp(&right.title.to_lowercase()),
            SortPolicy::DateAscending => left.date.cmp(&right.date),
            SortPolicy::DateDescending => right.date.cmp(&left.date),
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortPolicy {
    type Err = ParseSortPolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let policy = match normalized.as_str() {
            "1" | "title" => SortPolicy::Title,
            "2" | "oldest" | "date" => SortPolicy::DateAscending,
            "3" | "newest" => SortPolicy::DateDescending,
            _ => {
                return Err(ParseSortPolicyError {
                    value: value.to_string(),
                });
            }
        };

        Ok(policy)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortPolicyError {
    value: String,
}

impl fmt::Display for ParseSortPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid sort option '{}': expected one of {}",
            self.value.trim(),
            SortPolicy::ALL
                .iter()
                .map(|policy| policy.menu_key())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl Error for ParseSortPolicyError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, date: &str) -> Note {
        Note {
            title: title.to_string(),
            content: String::new(),
            tags: Vec::new(),
            date: date.to_string(),
        }
    }

    #[test]
    fn parses_menu_keys_and_names() {
        assert_eq!("1".parse::<SortPolicy>(), Ok(SortPolicy::Title));
        assert_eq!(" 2 ".parse::<SortPolicy>(), Ok(SortPolicy::DateAscending));
        assert_eq!("3".parse::<SortPolicy>(), Ok(SortPolicy::DateDescending));
        assert_eq!("Newest".parse::<SortPolicy>(), Ok(SortPolicy::DateDescending));
    }

    #[test]
    fn rejects_unknown_choice() {
        let err = "9".parse::<SortPolicy>().expect_err("9 is not a policy");
        assert!(err.to_string().contains("'9'"));
        assert!(err.to_string().contains("1, 2, 3"));
        assert!("".parse::<SortPolicy>().is_err());
    }

    #[test]
    fn title_ordering_ignores_case() {
        let apple = note("Apple", "");
        let banana = note("banana", "");
        assert_eq!(SortPolicy::Title.compare(&banana, &apple), Ordering::Greater);
    }

    #[test]
    fn date_orderings_are_mirrored() {
        let old = note("a", "2025-12-31 23:59");
        let new = note("b", "2026-01-01 00:00");
        assert_eq!(SortPolicy::DateAscending.compare(&old, &new), Ordering::Less);
        assert_eq!(SortPolicy::DateDescending.compare(&old, &new), Ordering::Greater);
    }
}
