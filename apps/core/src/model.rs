use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    #[default]
    Text,
    Image,
    Pdf,
    Filenames,
    ColorCode,
}

/// A captured clipboard entry as handed over by the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub title: String,
    pub update_time: i64,
    #[serde(default)]
    pub content_kind: ContentKind,
    #[serde(default)]
    pub thumbnail_ref: Option<String>,
}

impl HistoryEntry {
    pub fn new(id: &str, title: &str, update_time: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            update_time,
            content_kind: ContentKind::Text,
            thumbnail_ref: None,
        }
    }

    pub fn with_kind(mut self, kind: ContentKind) -> Self {
        self.content_kind = kind;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail_ref: &str) -> Self {
        self.thumbnail_ref = Some(thumbnail_ref.to_string());
        self
    }

    pub fn is_color_code(&self) -> bool {
        self.content_kind == ContentKind::ColorCode
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub content: String,
    pub index: i64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Snippet {
    pub fn new(id: &str, title: &str, content: &str, index: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            index,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub title: String,
    pub index: i64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub snippets: Vec<Snippet>,
}

impl Folder {
    pub fn new(id: &str, title: &str, index: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            index,
            enabled: true,
            snippets: Vec::new(),
        }
    }

    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Enabled snippets in ascending `index` order.
    pub fn enabled_snippets(&self) -> Vec<&Snippet> {
        let mut snippets: Vec<&Snippet> = self.snippets.iter().filter(|s| s.enabled).collect();
        snippets.sort_by_key(|snippet| snippet.index);
        snippets
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Lowercases and trims free text the same way for queries and haystacks.
pub fn normalize_for_search(input: &str) -> String {
    input.trim().to_lowercase()
}
