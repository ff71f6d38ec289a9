//! Aggregate statistics over the in-memory entry list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::entry::DiaryEntry;

/// Tallies computed in one pass; recomputed on each stats render.
#[derive(Debug, Default)]
pub struct Stats {
    pub total: usize,
    pub by_category: BTreeMap<String, usize>,
    /// Keyed by (year, month) so iteration is chronological.
    pub by_month: BTreeMap<(i32, u32), usize>,
}

impl Stats {
    pub fn collect(entries: &[DiaryEntry]) -> Self {
        let mut stats = Stats {
            total: entries.len(),
            ..Stats::default()
        };
        for entry in entries {
            *stats.by_category.entry(entry.category.clone()).or_insert(0) += 1;
            let key = (entry.date.year(), entry.date.month());
            *stats.by_month.entry(key).or_insert(0) += 1;
        }
        stats
    }

    pub fn categories_used(&self) -> usize {
        self.by_category.len()
    }

    pub fn months_active(&self) -> usize {
        self.by_month.len()
    }
}

/// "January 2024"-style label for a (year, month) tally key.
pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date.format("%B %Y").to_string(),
        None => format!("{year}-{month:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn entry(date: &str, category: &str) -> DiaryEntry {
        DiaryEntry {
            id: date.to_string(),
            date: DateTime::parse_from_rfc3339(date)
                .unwrap()
                .with_timezone(&Utc),
            content: "text".to_string(),
            category: category.to_string(),
            image_uri: None,
        }
    }

    #[test]
    fn tallies_by_category_and_month() {
        let entries = vec![
            entry("2024-01-01T10:00:00Z", "Travel"),
            entry("2024-01-15T10:00:00Z", "Work"),
            entry("2024-02-01T10:00:00Z", "Travel"),
        ];
        let stats = Stats::collect(&entries);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_category.get("Travel"), Some(&2));
        assert_eq!(stats.by_category.get("Work"), Some(&1));
        assert_eq!(stats.by_month.get(&(2024, 1)), Some(&2));
        assert_eq!(stats.by_month.get(&(2024, 2)), Some(&1));
        assert_eq!(stats.categories_used(), 2);
        assert_eq!(stats.months_active(), 2);
    }

    #[test]
    fn empty_list_yields_empty_stats() {
        let stats = Stats::collect(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_category.is_empty());
        assert!(stats.by_month.is_empty());
    }

    #[test]
    fn month_labels_are_human_readable() {
        assert_eq!(month_label(2024, 1), "January 2024");
        assert_eq!(month_label(2023, 12), "December 2023");
    }
}
