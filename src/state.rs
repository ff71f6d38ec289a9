//! In-memory view of the persisted entries plus transient status flags.
//!
//! Every screen reads from this container and mutates through it. A
//! mutating action first runs the persistence call and only updates the
//! in-memory list once that call has succeeded, so the list always mirrors
//! confirmed storage state.

use tracing::{debug, warn};

use crate::entry::DiaryEntry;
use crate::store::{EntryStore, StoreResult};

pub struct DiaryState {
    store: EntryStore,
    entries: Vec<DiaryEntry>,
    loading: bool,
    error: Option<String>,
}

impl DiaryState {
    pub fn new(store: EntryStore) -> Self {
        DiaryState {
            store,
            entries: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Replaces the in-memory list wholesale from storage. A failure is
    /// recorded as the container's error string rather than returned; the
    /// home screen renders it.
    pub fn fetch(&mut self) {
        self.loading = true;
        self.error = None;
        match self.store.list_all() {
            Ok(entries) => {
                debug!(count = entries.len(), "fetched entries");
                self.entries = entries;
            }
            Err(e) => {
                warn!(error = %e, "fetch failed");
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Persists a new entry and prepends it. New entries carry "now" as
    /// their date, so prepending preserves newest-first order.
    pub fn create(&mut self, entry: DiaryEntry) -> StoreResult<()> {
        self.store.upsert(&entry)?;
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Persists a full-record replacement and mirrors it in memory.
    /// A no-op on the list if no element has the entry's id.
    pub fn update(&mut self, entry: DiaryEntry) -> StoreResult<()> {
        self.store.upsert(&entry)?;
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
        }
        Ok(())
    }

    /// Deletes by id and filters the element out of the list.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        self.store.remove(id)?;
        self.entries.retain(|e| e.id != id);
        Ok(())
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entries whose content or category contains `query`,
    /// case-insensitively. Recomputed on every call.
    pub fn filter(&self, query: &str) -> Vec<&DiaryEntry> {
        self.entries.iter().filter(|e| e.matches(query)).collect()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
