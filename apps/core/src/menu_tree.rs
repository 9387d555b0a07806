use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{MenuConfig, SnippetSearchLayout};
use crate::display::{ActionKind, DisplayNode, Icon, LeafKind, LeafNode};
use crate::entry_store::{SectionData, Snapshot};
use crate::filter::{filter, filter_folders, visible_folders, FilterResult, FolderMatch};
use crate::model::{ContentKind, Folder, HistoryEntry, Snippet};
use crate::pagination::{key_equivalent, paginate, unbucketed_slots, PageLayout, Slot};
use crate::query::QueryState;
use crate::title::{clip_tooltip, numbered_label, trim_title};

pub const ROOT_LABEL: &str = "Clips";
pub const QUERY_PLACEHOLDER: &str = "Search...";
pub const HISTORY_LABEL: &str = "History";
pub const SNIPPETS_LABEL: &str = "Snippets";
pub const SEARCH_RESULTS_LABEL: &str = "Search Results";
pub const NO_MATCHING_CLIPS: &str = "No matching clips found";
pub const NO_MATCHING_SNIPPETS: &str = "No matching snippets found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebuildMode {
    Full,
    Patched,
}

/// Trailing actions owned by the UI layer; emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticActions {
    pub clear_history: String,
    pub edit_snippets: String,
    pub preferences: String,
    pub quit: String,
}

impl Default for StaticActions {
    fn default() -> Self {
        Self {
            clear_history: "Clear History".to_string(),
            edit_snippets: "Edit Snippets...".to_string(),
            preferences: "Preferences...".to_string(),
            quit: "Quit".to_string(),
        }
    }
}

impl StaticActions {
    /// Nodes of the static region, starting with its leading separator.
    pub fn nodes(&self, config: &MenuConfig) -> Vec<DisplayNode> {
        let mut nodes = vec![DisplayNode::Separator];
        if config.add_clear_history_item {
            nodes.push(action(ActionKind::ClearHistory, &self.clear_history));
        }
        nodes.push(action(ActionKind::EditSnippets, &self.edit_snippets));
        nodes.push(action(ActionKind::Preferences, &self.preferences));
        nodes.push(DisplayNode::Separator);
        nodes.push(action(ActionKind::Quit, &self.quit));
        nodes
    }
}

fn action(kind: ActionKind, label: &str) -> DisplayNode {
    DisplayNode::Action {
        kind,
        label: label.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuTreeBuilder {
    actions: StaticActions,
}

impl MenuTreeBuilder {
    pub fn new(actions: StaticActions) -> Self {
        Self { actions }
    }

    pub fn build(&self, snapshot: &Snapshot, query: &QueryState, config: &MenuConfig) -> DisplayNode {
        let mut children = self.variable_region(snapshot, query, config);
        children.extend(self.actions.nodes(config));
        DisplayNode::section(ROOT_LABEL, children)
    }

    /// Re-derives everything before the static action region of `previous`
    /// and re-attaches that region untouched. Falls back to [`Self::build`]
    /// when the region can't be found or no longer matches the actions the
    /// current configuration asks for.
    pub fn patch(
        &self,
        previous: DisplayNode,
        snapshot: &Snapshot,
        query: &QueryState,
        config: &MenuConfig,
    ) -> (DisplayNode, RebuildMode) {
        let DisplayNode::Section {
            label,
            children: mut previous_children,
        } = previous
        else {
            warn!("previous menu root is not a section; rebuilding");
            return (self.build(snapshot, query, config), RebuildMode::Full);
        };

        let Some(start) = static_region_start(&previous_children) else {
            warn!("static action region missing from previous menu; rebuilding");
            return (self.build(snapshot, query, config), RebuildMode::Full);
        };

        let preserved = previous_children.split_off(start);
        if label != ROOT_LABEL || preserved != self.actions.nodes(config) {
            debug!("static action region changed; rebuilding");
            return (self.build(snapshot, query, config), RebuildMode::Full);
        }

        let mut children = self.variable_region(snapshot, query, config);
        children.extend(preserved);
        (DisplayNode::Section { label, children }, RebuildMode::Patched)
    }

    fn variable_region(
        &self,
        snapshot: &Snapshot,
        query: &QueryState,
        config: &MenuConfig,
    ) -> Vec<DisplayNode> {
        let mut children = vec![
            DisplayNode::QueryInput {
                text: query.text().to_string(),
                placeholder: QUERY_PLACEHOLDER.to_string(),
            },
            DisplayNode::Separator,
            DisplayNode::section(HISTORY_LABEL, history_items(&snapshot.history, query, config)),
        ];

        let has_folders = match &snapshot.folders {
            SectionData::Available(folders) => !folders.is_empty(),
            SectionData::Unavailable(_) => true,
        };
        if has_folders {
            children.push(DisplayNode::Separator);
            children.push(DisplayNode::section(
                SNIPPETS_LABEL,
                snippet_items(&snapshot.folders, query, config),
            ));
        }
        children
    }
}

/// Index of the separator that opens the static action region: the first
/// separator directly followed by one of the leading actions.
fn static_region_start(children: &[DisplayNode]) -> Option<usize> {
    children.windows(2).position(|pair| {
        pair[0].is_separator()
            && matches!(
                pair[1],
                DisplayNode::Action {
                    kind: ActionKind::ClearHistory
                        | ActionKind::EditSnippets
                        | ActionKind::Preferences,
                    ..
                }
            )
    })
}

fn folder_icon(config: &MenuConfig) -> Option<Icon> {
    config.show_icon_in_menu.then_some(Icon::Folder)
}

fn history_items(
    history: &SectionData<HistoryEntry>,
    query: &QueryState,
    config: &MenuConfig,
) -> Vec<DisplayNode> {
    let entries = match history {
        SectionData::Available(entries) => entries,
        SectionData::Unavailable(reason) => {
            warn!(%reason, "history unavailable; rendering empty section");
            return Vec::new();
        }
    };

    match filter(entries, query) {
        FilterResult::NoQuery => paginate(
            entries,
            PageLayout {
                inline_capacity: config.inline_capacity,
                folder_capacity: config.folder_capacity,
                first_index: config.first_index(),
                max_total: config.max_history_size,
                folder_icon: folder_icon(config),
            },
            |entry, slot| clip_leaf(entry, slot, config),
        ),
        FilterResult::Empty => vec![DisplayNode::disabled(NO_MATCHING_CLIPS)],
        FilterResult::Matches(found) => {
            let children = found
                .iter()
                .zip(unbucketed_slots(found.len(), config.first_index()))
                .map(|(entry, slot)| clip_leaf(entry, slot, config))
                .collect();
            vec![DisplayNode::folder(
                SEARCH_RESULTS_LABEL,
                folder_icon(config),
                children,
            )]
        }
    }
}

fn snippet_items(
    folders: &SectionData<Folder>,
    query: &QueryState,
    config: &MenuConfig,
) -> Vec<DisplayNode> {
    let folders = match folders {
        SectionData::Available(folders) => folders,
        SectionData::Unavailable(reason) => {
            warn!(%reason, "snippets unavailable; rendering empty section");
            return Vec::new();
        }
    };

    match filter_folders(folders, query) {
        FilterResult::NoQuery => visible_folders(folders)
            .iter()
            .map(|group| snippet_folder(group, config))
            .collect(),
        FilterResult::Empty => vec![DisplayNode::disabled(NO_MATCHING_SNIPPETS)],
        FilterResult::Matches(groups) => match config.snippet_search_layout {
            SnippetSearchLayout::Grouped => groups
                .iter()
                .map(|group| snippet_folder(group, config))
                .collect(),
            SnippetSearchLayout::Flat => {
                let all: Vec<&Snippet> = groups
                    .iter()
                    .flat_map(|group| group.snippets.iter().copied())
                    .collect();
                let children = all
                    .iter()
                    .zip(unbucketed_slots(all.len(), config.first_index()))
                    .map(|(snippet, slot)| snippet_leaf(snippet, slot.list_number, config))
                    .collect();
                vec![DisplayNode::folder(
                    SEARCH_RESULTS_LABEL,
                    folder_icon(config),
                    children,
                )]
            }
        },
    }
}

fn snippet_folder(group: &FolderMatch<'_>, config: &MenuConfig) -> DisplayNode {
    let first_index = config.first_index();
    let children = group
        .snippets
        .iter()
        .enumerate()
        .map(|(offset, snippet)| snippet_leaf(snippet, first_index + offset, config))
        .collect();
    DisplayNode::folder(group.folder.title.clone(), folder_icon(config), children)
}

fn clip_leaf(entry: &HistoryEntry, slot: Slot, config: &MenuConfig) -> DisplayNode {
    let title = trim_title(&entry.title, config.max_title_length);
    let display_title = match entry.content_kind {
        ContentKind::Image => "(Image)".to_string(),
        ContentKind::Pdf => "(PDF)".to_string(),
        ContentKind::Filenames if title.is_empty() => "(Filenames)".to_string(),
        _ => title,
    };

    let wants_preview = if entry.is_color_code() {
        config.show_color_preview
    } else {
        config.show_thumbnail_image
    };
    let thumbnail = entry
        .thumbnail_ref
        .as_ref()
        .filter(|reference| wants_preview && !reference.is_empty())
        .cloned();

    DisplayNode::Leaf(LeafNode {
        label: numbered_label(&display_title, slot.list_number, config.mark_items_with_numbers),
        list_number: slot.list_number,
        payload_id: entry.id.clone(),
        kind: LeafKind::Clip(entry.content_kind),
        tooltip: config
            .show_tooltip
            .then(|| clip_tooltip(&entry.title, config.max_tooltip_length)),
        key_equivalent: if config.add_numeric_key_equivalents {
            key_equivalent(slot.position, config.first_index())
        } else {
            None
        },
        icon: None,
        thumbnail,
        image: None,
    })
}

fn snippet_leaf(snippet: &Snippet, list_number: usize, config: &MenuConfig) -> DisplayNode {
    let title = trim_title(&snippet.title, config.max_title_length);
    DisplayNode::Leaf(LeafNode {
        label: numbered_label(&title, list_number, config.mark_items_with_numbers),
        list_number,
        payload_id: snippet.id.clone(),
        kind: LeafKind::Snippet,
        tooltip: Some(snippet.content.clone()),
        key_equivalent: None,
        icon: config.show_icon_in_menu.then_some(Icon::Snippet),
        thumbnail: None,
        image: None,
    })
}
