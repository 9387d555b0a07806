use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Folder, HistoryEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read store snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode store snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
    NewestFirst,
    OldestFirst,
}

impl HistoryOrder {
    pub fn from_reorder_after_paste(reorder_after_paste: bool) -> Self {
        if reorder_after_paste {
            Self::NewestFirst
        } else {
            Self::OldestFirst
        }
    }
}

/// Read-only view over the clip store.
///
/// Implementations return owned copies; callers never observe later writes
/// through a value they already hold.
pub trait EntryStore {
    fn history(&self, order: HistoryOrder) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Folders ordered by `index`, each with snippets ordered by `index`.
    fn folders(&self) -> Result<Vec<Folder>, StoreError>;
}

impl<S: EntryStore + ?Sized> EntryStore for &S {
    fn history(&self, order: HistoryOrder) -> Result<Vec<HistoryEntry>, StoreError> {
        (**self).history(order)
    }

    fn folders(&self) -> Result<Vec<Folder>, StoreError> {
        (**self).folders()
    }
}

#[derive(Debug)]
pub enum SectionData<T> {
    Available(Vec<T>),
    Unavailable(String),
}

impl<T> SectionData<T> {
    fn from_result(result: Result<Vec<T>, StoreError>) -> Self {
        match result {
            Ok(items) => Self::Available(items),
            Err(error) => Self::Unavailable(error.to_string()),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Immutable copy of the store taken at the start of a rebuild.
#[derive(Debug)]
pub struct Snapshot {
    pub history: SectionData<HistoryEntry>,
    pub folders: SectionData<Folder>,
}

impl Snapshot {
    pub fn take<S: EntryStore + ?Sized>(store: &S, order: HistoryOrder) -> Self {
        Self {
            history: SectionData::from_result(store.history(order)),
            folders: SectionData::from_result(store.folders()),
        }
    }

    pub fn from_parts(history: Vec<HistoryEntry>, folders: Vec<Folder>) -> Self {
        Self {
            history: SectionData::Available(history),
            folders: SectionData::Available(folders),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreContents {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contents: StoreContents,
    offline: Option<String>,
}

/// Shared in-memory store, typically fed from a JSON export of the real
/// store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new(contents: StoreContents) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryState {
                contents,
                offline: None,
            })),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let contents: StoreContents = serde_json::from_str(raw)?;
        Ok(Self::new(contents))
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn push_history(&self, entry: HistoryEntry) -> Result<(), StoreError> {
        let mut state = self.write()?;
        state.contents.history.push(entry);
        Ok(())
    }

    pub fn set_folders(&self, folders: Vec<Folder>) -> Result<(), StoreError> {
        self.write()?.contents.folders = folders;
        Ok(())
    }

    /// Simulates the backing storage going away (`Some(reason)`) or coming back.
    pub fn set_offline(&self, reason: Option<&str>) -> Result<(), StoreError> {
        self.write()?.offline = reason.map(str::to_string);
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;
        if let Some(reason) = &state.offline {
            return Err(StoreError::Unavailable(reason.clone()));
        }
        Ok(state)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl EntryStore for MemoryStore {
    fn history(&self, order: HistoryOrder) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut history = self.read()?.contents.history.clone();
        match order {
            HistoryOrder::NewestFirst => {
                history.sort_by(|a, b| b.update_time.cmp(&a.update_time))
            }
            HistoryOrder::OldestFirst => history.sort_by_key(|entry| entry.update_time),
        }
        Ok(history)
    }

    fn folders(&self) -> Result<Vec<Folder>, StoreError> {
        let mut folders = self.read()?.contents.folders.clone();
        folders.sort_by_key(|folder| folder.index);
        for folder in &mut folders {
            folder.snippets.sort_by_key(|snippet| snippet.index);
        }
        Ok(folders)
    }
}
