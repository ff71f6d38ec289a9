//! A personal diary for the terminal.
//!
//! Entries carry a creation date, free-text content, a category tag, and an
//! optional image reference. They are persisted in a single local SQLite
//! table and browsed through a small stack of screens: a searchable list,
//! a new-entry form, a detail/edit view, and aggregate statistics.
//!
//! Data flows one way: a screen dispatches an intent, the
//! [`state::DiaryState`] container runs the matching [`store::EntryStore`]
//! call, and only a confirmed persistence result updates the in-memory
//! list the screens render from.

pub mod entry;
pub mod state;
pub mod stats;
pub mod store;
pub mod ui;
