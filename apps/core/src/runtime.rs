use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{self, ConfigError};
use crate::display::DisplayNode;
use crate::entry_store::{MemoryStore, StoreError};
use crate::live_query::LiveQueryController;
use crate::menu_tree::MenuTreeBuilder;
use crate::search_window::{Debouncer, SearchIndex};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("failed to encode menu: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented outline.
    Text,
    /// The display tree as JSON.
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(
    name = "clipmenu-core",
    version,
    about = "Render the clipboard menu for a store snapshot"
)]
pub struct CliOptions {
    /// JSON export of clipboard history and snippet folders.
    #[arg(long = "store", value_name = "SNAPSHOT")]
    pub store_path: PathBuf,

    /// Menu settings (.toml, .json or .json5).
    #[arg(long = "config", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Text typed into the menu's search field.
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// List full-window search results instead of the menu.
    #[arg(long = "window")]
    pub search_window: bool,

    /// Debug logging (overridden by CLIPMENU_LOG).
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn run_with_options(options: CliOptions) -> Result<(), RuntimeError> {
    crate::logging::init(options.verbose).map_err(|e| RuntimeError::Logging(e.to_string()))?;

    let menu_config = match &options.config_path {
        Some(path) => config::load(path)?,
        None => config::MenuConfig::default(),
    };
    let store = MemoryStore::load(&options.store_path)?;
    info!(store = %options.store_path.display(), "loaded store snapshot");

    if options.search_window {
        let index = SearchIndex::load(&store)?;
        if index.is_empty() {
            info!("store has nothing to search");
            return Ok(());
        }

        let mut debouncer = Debouncer::from_config(&menu_config);
        let typed_at = Instant::now();
        debouncer.input(options.query.as_deref().unwrap_or_default(), typed_at);
        let query = debouncer
            .poll(typed_at + debouncer.interval())
            .unwrap_or_default();
        debug!(
            entries = index.len(),
            debounce_ms = debouncer.interval().as_millis() as u64,
            "search window query settled"
        );

        for result in index.filter(&query) {
            println!("{:?}\t{}\t{}", result.source, result.identifier, result.title);
        }
        return Ok(());
    }

    let mut controller =
        LiveQueryController::new(store, menu_config, MenuTreeBuilder::default());
    controller.refresh();
    if let Some(query) = &options.query {
        controller.on_query_text_changed(query);
    }

    let Some(root) = controller.tree() else {
        return Ok(());
    };
    match options.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(root)?),
        OutputFormat::Text => print!("{}", render_outline(root)),
    }
    Ok(())
}

/// Indented plain-text outline of a menu tree.
pub fn render_outline(root: &DisplayNode) -> String {
    let mut out = String::new();
    for child in root.children() {
        render_node(child, 0, &mut out);
    }
    out
}

fn render_node(node: &DisplayNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let line = match node {
        DisplayNode::Leaf(leaf) => match leaf.key_equivalent {
            Some(key) => format!("{}  [{key}]", leaf.label),
            None => leaf.label.clone(),
        },
        DisplayNode::Folder { label, .. } => format!("{label} >"),
        DisplayNode::Section { label, .. } => format!("[{label}]"),
        DisplayNode::Separator => "----".to_string(),
        DisplayNode::Disabled { label } => format!("({label})"),
        DisplayNode::QueryInput { text, placeholder } => {
            if text.is_empty() {
                format!("<{placeholder}>")
            } else {
                format!("<{text}>")
            }
        }
        DisplayNode::Action { label, .. } => label.clone(),
    };
    out.push_str(&indent);
    out.push_str(&line);
    out.push('\n');

    for child in node.children() {
        render_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{render_outline, CliOptions, OutputFormat};
    use crate::display::DisplayNode;

    fn parse(raw: &[&str]) -> Result<CliOptions, clap::Error> {
        CliOptions::try_parse_from(std::iter::once("clipmenu-core").chain(raw.iter().copied()))
    }

    #[test]
    fn parses_full_argument_set() {
        let options = parse(&[
            "--store", "clips.json", "--query", "abc", "--format", "json", "-v",
        ])
        .unwrap();
        assert_eq!(options.store_path.to_string_lossy(), "clips.json");
        assert_eq!(options.query.as_deref(), Some("abc"));
        assert_eq!(options.format, OutputFormat::Json);
        assert!(options.verbose);
        assert!(!options.search_window);
    }

    #[test]
    fn defaults_to_text_outline() {
        let options = parse(&["--store", "clips.json", "--window"]).unwrap();
        assert_eq!(options.format, OutputFormat::Text);
        assert!(options.search_window);
        assert_eq!(options.config_path, None);
    }

    #[test]
    fn store_is_required() {
        let error = parse(&["--query", "abc"]).unwrap_err();
        assert_eq!(error.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn rejects_missing_values_and_unknown_flags() {
        assert!(parse(&["--store"]).is_err());
        assert_eq!(
            parse(&["--store", "a", "--nope"]).unwrap_err().kind(),
            clap::error::ErrorKind::UnknownArgument
        );
        assert_eq!(
            parse(&["--store", "a", "--format", "xml"]).unwrap_err().kind(),
            clap::error::ErrorKind::InvalidValue
        );
    }

    #[test]
    fn outline_indents_nested_nodes() {
        let root = DisplayNode::section(
            "root",
            vec![
                DisplayNode::section("History", vec![DisplayNode::disabled("No results")]),
                DisplayNode::Separator,
            ],
        );
        assert_eq!(render_outline(&root), "[History]\n  (No results)\n----\n");
    }
}
