//! End-to-end CRUD flow against a real on-disk database.

use chrono::{DateTime, Utc};
use tempfile::tempdir;

use my_diary::entry::DiaryEntry;
use my_diary::state::DiaryState;
use my_diary::store::EntryStore;

fn fixed_entry(id: &str, date: &str, content: &str, category: &str) -> DiaryEntry {
    DiaryEntry {
        id: id.to_string(),
        date: DateTime::parse_from_rfc3339(date)
            .unwrap()
            .with_timezone(&Utc),
        content: content.to_string(),
        category: category.to_string(),
        image_uri: None,
    }
}

#[test]
fn create_edit_delete_flow_on_disk() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("diary.db");

    let mut state = DiaryState::new(EntryStore::open(&db_path).unwrap());
    state.fetch();
    assert!(state.entries().is_empty());

    let entry = DiaryEntry::new(
        "Morning pages".to_string(),
        "Personal".to_string(),
        Some("/photos/sunrise.jpg".to_string()),
    );
    state.create(entry.clone()).unwrap();

    state.fetch();
    assert_eq!(state.entries(), std::slice::from_ref(&entry));

    let mut edited = entry.clone();
    edited.content = "Morning pages, revised".to_string();
    state.update(edited).unwrap();

    state.fetch();
    let stored = state.get(&entry.id).unwrap();
    assert_eq!(stored.content, "Morning pages, revised");
    assert_eq!(stored.date, entry.date);
    assert_eq!(stored.category, entry.category);
    assert_eq!(stored.image_uri, entry.image_uri);

    state.delete(&entry.id).unwrap();
    state.fetch();
    assert!(state.entries().is_empty());

    // Deleting an id that no longer exists raises nothing.
    state.delete(&entry.id).unwrap();
}

#[test]
fn entries_survive_reopening_the_store() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("diary.db");

    let first = EntryStore::open(&db_path).unwrap();
    let entry = DiaryEntry::new("persisted".to_string(), "Work".to_string(), None);
    first.upsert(&entry).unwrap();
    drop(first);

    // Reopen runs CREATE TABLE IF NOT EXISTS again; the data is untouched.
    let second = EntryStore::open(&db_path).unwrap();
    assert_eq!(second.list_all().unwrap(), vec![entry]);
}

#[test]
fn fetch_orders_newest_first_and_filter_finds_office_day() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("diary.db");
    let mut state = DiaryState::new(EntryStore::open(&db_path).unwrap());

    let hiking = fixed_entry("1", "2024-01-01T00:00:00Z", "Went hiking", "Travel");
    let office = fixed_entry("2", "2024-01-02T00:00:00Z", "Office day", "Work");
    state.create(hiking.clone()).unwrap();
    state.create(office.clone()).unwrap();

    state.fetch();
    let ids: Vec<_> = state.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1"]);

    let hits = state.filter("office");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "2");
}

#[test]
fn list_is_non_increasing_in_date() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("diary.db");
    let store = EntryStore::open(&db_path).unwrap();

    let dates = [
        "2023-06-15T08:30:00Z",
        "2024-03-01T12:00:00Z",
        "2023-06-15T08:30:00Z",
        "2024-01-01T00:00:00Z",
    ];
    for (i, date) in dates.iter().enumerate() {
        store
            .upsert(&fixed_entry(&i.to_string(), date, "text", "Other"))
            .unwrap();
    }

    let listed = store.list_all().unwrap();
    assert_eq!(listed.len(), dates.len());
    for pair in listed.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
}
