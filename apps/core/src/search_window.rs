use std::time::{Duration, Instant};

use crate::config::MenuConfig;
use crate::entry_store::{EntryStore, HistoryOrder, StoreError};
use crate::filter::visible_folders;
use crate::query::QueryState;

const NO_TITLE: &str = "(No title)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Clip,
    Snippet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub source: ResultSource,
    pub identifier: String,
}

/// Flat list behind the full-window search: every clip, newest first,
/// followed by the snippets of enabled folders.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    results: Vec<SearchResult>,
}

impl SearchIndex {
    pub fn load<S: EntryStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let mut results = Vec::new();

        for clip in store.history(HistoryOrder::NewestFirst)? {
            results.push(SearchResult {
                title: display_title(&clip.title),
                content: clip.title,
                source: ResultSource::Clip,
                identifier: clip.id,
            });
        }

        let folders = store.folders()?;
        for group in visible_folders(&folders) {
            for snippet in group.snippets {
                results.push(SearchResult {
                    title: display_title(&snippet.title),
                    content: snippet.content.clone(),
                    source: ResultSource::Snippet,
                    identifier: snippet.id.clone(),
                });
            }
        }

        Ok(Self { results })
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Everything for an empty query, otherwise results whose title or
    /// content contains it.
    pub fn filter(&self, text: &str) -> Vec<&SearchResult> {
        let query = QueryState::new(text);
        if !query.is_active() {
            return self.results.iter().collect();
        }
        self.results
            .iter()
            .filter(|result| query.matches(&result.title) || query.matches(&result.content))
            .collect()
    }
}

fn display_title(title: &str) -> String {
    if title.is_empty() {
        NO_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Holds back re-filtering until typing has paused for `interval`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Quiet period taken from `search_debounce_ms`.
    pub fn from_config(config: &MenuConfig) -> Self {
        Self::from_millis(config.search_debounce_ms)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn input(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now));
    }

    /// The latest text once the quiet period has elapsed; fires once.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let (_, last_input) = self.pending.as_ref()?;
        if now.saturating_duration_since(*last_input) < self.interval {
            return None;
        }
        self.pending.take().map(|(text, _)| text)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
