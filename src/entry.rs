use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

/// Suggested categories, offered by the new-entry form. The schema does not
/// enforce membership.
pub const CATEGORIES: [&str; 5] = ["Personal", "Work", "Travel", "Family", "Other"];

#[derive(Debug, Clone, PartialEq)]
pub struct DiaryEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub category: String,
    pub image_uri: Option<String>,
}

impl DiaryEntry {
    /// Mints a new entry with a random id and the current time.
    ///
    /// The timestamp is truncated to millisecond precision so a freshly
    /// created entry compares equal to its own persisted round trip.
    pub fn new(content: String, category: String, image_uri: Option<String>) -> Self {
        DiaryEntry {
            id: Uuid::new_v4().to_string(),
            date: Utc::now().trunc_subsecs(3),
            content,
            category,
            image_uri,
        }
    }

    /// Case-insensitive substring match over content and category.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.content.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, category: &str) -> DiaryEntry {
        DiaryEntry::new(content.to_string(), category.to_string(), None)
    }

    #[test]
    fn matches_is_case_insensitive() {
        let e = entry("Went hiking in the Alps", "Travel");
        assert!(e.matches("HIKING"));
        assert!(e.matches("travel"));
        assert!(e.matches(""));
        assert!(!e.matches("office"));
    }

    #[test]
    fn new_entries_get_distinct_ids() {
        let a = entry("a", "Personal");
        let b = entry("b", "Personal");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn date_has_millisecond_precision() {
        let e = entry("a", "Personal");
        assert_eq!(e.date.timestamp_subsec_nanos() % 1_000_000, 0);
    }
}
