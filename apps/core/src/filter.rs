use crate::model::{Folder, HistoryEntry, Snippet};
use crate::query::QueryState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult<T> {
    /// No query is active; callers render their normal layout.
    NoQuery,
    /// A query is active and nothing matched.
    Empty,
    Matches(Vec<T>),
}

impl<T> FilterResult<T> {
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Self::Empty)
    }

    fn from_matches(matches: Vec<T>) -> Self {
        if matches.is_empty() {
            Self::Empty
        } else {
            Self::Matches(matches)
        }
    }
}

/// Text fields a query is matched against.
pub trait Searchable {
    fn matches_query(&self, query: &QueryState) -> bool;
}

impl Searchable for HistoryEntry {
    fn matches_query(&self, query: &QueryState) -> bool {
        query.matches(&self.title)
    }
}

impl Searchable for Snippet {
    fn matches_query(&self, query: &QueryState) -> bool {
        query.matches(&self.title) || query.matches(&self.content)
    }
}

pub fn filter<'a, T: Searchable>(entries: &'a [T], query: &QueryState) -> FilterResult<&'a T> {
    if !query.is_active() {
        return FilterResult::NoQuery;
    }

    FilterResult::from_matches(
        entries
            .iter()
            .filter(|entry| entry.matches_query(query))
            .collect(),
    )
}

/// An enabled folder together with the snippets that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderMatch<'a> {
    pub folder: &'a Folder,
    pub snippets: Vec<&'a Snippet>,
}

/// Enabled folders with their enabled snippets, in store order.
pub fn visible_folders(folders: &[Folder]) -> Vec<FolderMatch<'_>> {
    folders
        .iter()
        .filter(|folder| folder.enabled)
        .map(|folder| FolderMatch {
            folder,
            snippets: folder.enabled_snippets(),
        })
        .collect()
}

/// Folder-grouped filtering: folders without a matching snippet drop out,
/// and `Empty` stands for "no folder contributed anything".
pub fn filter_folders<'a>(
    folders: &'a [Folder],
    query: &QueryState,
) -> FilterResult<FolderMatch<'a>> {
    if !query.is_active() {
        return FilterResult::NoQuery;
    }

    FilterResult::from_matches(
        visible_folders(folders)
            .into_iter()
            .filter_map(|group| {
                let snippets: Vec<&Snippet> = group
                    .snippets
                    .into_iter()
                    .filter(|snippet| snippet.matches_query(query))
                    .collect();
                if snippets.is_empty() {
                    None
                } else {
                    Some(FolderMatch {
                        folder: group.folder,
                        snippets,
                    })
                }
            })
            .collect(),
    )
}
