//! Bounded, newest-first log of past requests and their suggestions.
//!
//! [`HistoryLog`] is plain state owned by the caller. [`HistoryStore`] maps it
//! onto a single durable slot: every mutation rewrites the whole slot, and a
//! slot that is missing or malformed loads as an empty log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::domain::{BulletRequest, EntryId, HistoryEntry, ScoredBullet};
use storage::KeyValueStore;
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};

pub const HISTORY_LIMIT: usize = 50;
pub const DEFAULT_HISTORY_KEY: &str = "bulletHistory";
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all history?";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    selected: Option<usize>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self {
            entries,
            selected: None,
        }
    }

    /// Parses a serialized log. Callers that want the fail-closed behaviour
    /// go through [`HistoryStore::load`].
    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<HistoryEntry> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&HistoryEntry> {
        self.selected.and_then(|index| self.entries.get(index))
    }

    /// Prepends and drops from the tail past [`HISTORY_LIMIT`]. The selection
    /// index is left as-is; it refers to positions, not entries.
    pub fn push_front(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        &self.entries[0]
    }

    pub fn try_select(&mut self, index: usize) -> Result<&HistoryEntry> {
        let len = self.entries.len();
        if index >= len {
            return Err(ClientError::SelectionOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(&self.entries[index])
    }

    /// Out-of-range indexes leave the selection untouched.
    pub fn select(&mut self, index: usize) -> Option<&HistoryEntry> {
        match self.try_select(index) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(%err, "ignoring history selection");
                None
            }
        }
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.selected = None;
    }
}

/// Blocking yes/no prompt gating destructive actions.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirmation for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_HISTORY_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// A missing or malformed slot is an empty log. A failed read is an
    /// error: an empty log built from it would overwrite the slot on the
    /// next record.
    pub async fn load(&self) -> Result<HistoryLog> {
        let raw = match self.store.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(HistoryLog::new()),
            Err(err) => {
                let error = format!("{err:#}");
                warn!(key = %self.key, %error, "history slot unreadable");
                return Err(ClientError::Storage(err));
            }
        };
        match HistoryLog::from_json(&raw) {
            Ok(log) => {
                debug!(key = %self.key, entries = log.len(), "history loaded");
                Ok(log)
            }
            Err(err) => {
                warn!(key = %self.key, %err, "discarding malformed history");
                Ok(HistoryLog::new())
            }
        }
    }

    pub async fn record<'a>(
        &self,
        log: &'a mut HistoryLog,
        input: BulletRequest,
        output: Vec<ScoredBullet>,
    ) -> Result<&'a HistoryEntry> {
        self.record_at(log, input, output, Utc::now()).await
    }

    /// The whole log is rewritten on every call, so a failed write can lose
    /// more than the new entry. The in-memory log keeps the entry either way.
    pub async fn record_at<'a>(
        &self,
        log: &'a mut HistoryLog,
        input: BulletRequest,
        output: Vec<ScoredBullet>,
        now: DateTime<Utc>,
    ) -> Result<&'a HistoryEntry> {
        let entry = HistoryEntry {
            id: EntryId::from_timestamp(now),
            timestamp: now,
            input,
            output,
        };
        log.push_front(entry);
        self.persist(log).await?;
        debug!(key = %self.key, entries = log.len(), "history entry recorded");
        Ok(&log.entries[0])
    }

    pub async fn persist(&self, log: &HistoryLog) -> Result<()> {
        let raw = log.to_json()?;
        self.store
            .set(&self.key, &raw)
            .await
            .map_err(ClientError::Storage)
    }

    /// Returns whether the log was cleared.
    pub async fn clear(
        &self,
        log: &mut HistoryLog,
        confirmation: &dyn Confirmation,
    ) -> Result<bool> {
        if !confirmation.confirm(CLEAR_PROMPT) {
            return Ok(false);
        }
        self.clear_unconfirmed(log).await?;
        Ok(true)
    }

    pub async fn clear_unconfirmed(&self, log: &mut HistoryLog) -> Result<()> {
        log.reset();
        self.store
            .remove(&self.key)
            .await
            .map_err(ClientError::Storage)?;
        info!(key = %self.key, "history cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
