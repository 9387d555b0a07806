use serde::{Deserialize, Serialize};

use crate::model::ContentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Folder,
    Snippet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "content_kind", rename_all = "snake_case")]
pub enum LeafKind {
    Clip(ContentKind),
    Snippet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ClearHistory,
    EditSnippets,
    Preferences,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafNode {
    pub label: String,
    pub list_number: usize,
    pub payload_id: String,
    pub kind: LeafKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_equivalent: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<Icon>,
    /// Stable reference of a pending out-of-band image lookup.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub thumbnail: Option<String>,
    /// Decorative image delivered by that lookup.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DisplayNode {
    Leaf(LeafNode),
    Folder {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        icon: Option<Icon>,
        children: Vec<DisplayNode>,
    },
    Section {
        label: String,
        children: Vec<DisplayNode>,
    },
    Separator,
    Disabled {
        label: String,
    },
    QueryInput {
        text: String,
        placeholder: String,
    },
    Action {
        kind: ActionKind,
        label: String,
    },
}

impl DisplayNode {
    pub fn folder(label: impl Into<String>, icon: Option<Icon>, children: Vec<DisplayNode>) -> Self {
        Self::Folder {
            label: label.into(),
            icon,
            children,
        }
    }

    pub fn section(label: impl Into<String>, children: Vec<DisplayNode>) -> Self {
        Self::Section {
            label: label.into(),
            children,
        }
    }

    pub fn disabled(label: impl Into<String>) -> Self {
        Self::Disabled {
            label: label.into(),
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.label),
            Self::Folder { label, .. }
            | Self::Section { label, .. }
            | Self::Disabled { label }
            | Self::Action { label, .. } => Some(label),
            Self::QueryInput { .. } | Self::Separator => None,
        }
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            Self::Folder { children, .. } | Self::Section { children, .. } => children,
            _ => &[],
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Separator)
    }

    /// Finds the section child labelled `label`, searching direct children only.
    pub fn find_section(&self, label: &str) -> Option<&DisplayNode> {
        self.children()
            .iter()
            .find(|node| matches!(node, Self::Section { label: l, .. } if l == label))
    }

    /// Depth-first visit of every leaf below (and including) this node.
    pub fn leaves(&self) -> Vec<&LeafNode> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }

    pub fn find_leaf_mut(&mut self, payload_id: &str) -> Option<&mut LeafNode> {
        match self {
            Self::Leaf(leaf) if leaf.payload_id == payload_id => Some(leaf),
            Self::Folder { children, .. } | Self::Section { children, .. } => children
                .iter_mut()
                .find_map(|child| child.find_leaf_mut(payload_id)),
            _ => None,
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(DisplayNode::node_count)
            .sum::<usize>()
    }
}

fn collect_leaves<'a>(node: &'a DisplayNode, out: &mut Vec<&'a LeafNode>) {
    match node {
        DisplayNode::Leaf(leaf) => out.push(leaf),
        other => {
            for child in other.children() {
                collect_leaves(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayNode, LeafKind, LeafNode};

    fn leaf(id: &str) -> DisplayNode {
        DisplayNode::Leaf(LeafNode {
            label: id.to_string(),
            list_number: 1,
            payload_id: id.to_string(),
            kind: LeafKind::Snippet,
            tooltip: None,
            key_equivalent: None,
            icon: None,
            thumbnail: None,
            image: None,
        })
    }

    #[test]
    fn finds_nested_leaves() {
        let mut root = DisplayNode::section(
            "root",
            vec![
                leaf("a"),
                DisplayNode::folder("f", None, vec![leaf("b"), DisplayNode::Separator]),
            ],
        );

        assert_eq!(root.leaves().len(), 2);
        assert_eq!(root.node_count(), 5);
        let found = root.find_leaf_mut("b").unwrap();
        found.image = Some("img".into());
        assert_eq!(root.leaves()[1].image.as_deref(), Some("img"));
        assert!(root.find_leaf_mut("missing").is_none());
    }

    #[test]
    fn serializes_with_node_tag() {
        let encoded = serde_json::to_string(&DisplayNode::disabled("No results")).unwrap();
        assert_eq!(encoded, r#"{"node":"disabled","label":"No results"}"#);
    }
}
