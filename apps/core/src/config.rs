use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::title::ELLIPSIS;

const MAX_SEARCH_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("unsupported config format: {0} (expected .toml, .json or .json5)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SnippetSearchLayout {
    /// One folder per store folder that has matches.
    #[default]
    Grouped,
    /// All matching snippets in a single "Search Results" folder.
    Flat,
}

/// Validated menu options. Every rebuild works on one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    pub inline_capacity: usize,
    pub folder_capacity: usize,
    pub max_history_size: usize,
    pub first_index_starts_at_zero: bool,
    pub show_icon_in_menu: bool,
    pub mark_items_with_numbers: bool,
    pub show_tooltip: bool,
    pub max_tooltip_length: usize,
    pub show_thumbnail_image: bool,
    pub show_color_preview: bool,
    pub add_numeric_key_equivalents: bool,
    pub max_title_length: usize,
    pub reorder_after_paste: bool,
    pub add_clear_history_item: bool,
    pub snippet_search_layout: SnippetSearchLayout,
    pub search_debounce_ms: u64,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            inline_capacity: 0,
            folder_capacity: 10,
            max_history_size: 30,
            first_index_starts_at_zero: false,
            show_icon_in_menu: true,
            mark_items_with_numbers: true,
            show_tooltip: true,
            max_tooltip_length: 200,
            show_thumbnail_image: true,
            show_color_preview: true,
            add_numeric_key_equivalents: false,
            max_title_length: 20,
            reorder_after_paste: true,
            add_clear_history_item: true,
            snippet_search_layout: SnippetSearchLayout::Grouped,
            search_debounce_ms: 300,
        }
    }
}

impl MenuConfig {
    pub fn first_index(&self) -> usize {
        if self.first_index_starts_at_zero {
            0
        } else {
            1
        }
    }
}

/// Supplies the configuration snapshot for each rebuild.
pub trait ConfigSource {
    fn snapshot(&self) -> MenuConfig;
}

impl ConfigSource for MenuConfig {
    fn snapshot(&self) -> MenuConfig {
        self.clone()
    }
}

impl<F> ConfigSource for F
where
    F: Fn() -> MenuConfig,
{
    fn snapshot(&self) -> MenuConfig {
        self()
    }
}

/// On-disk shape: every field optional and signed so that out-of-range
/// values can be clamped instead of rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub inline_capacity: Option<i64>,
    pub folder_capacity: Option<i64>,
    pub max_history_size: Option<i64>,
    pub first_index_starts_at_zero: Option<bool>,
    pub show_icon_in_menu: Option<bool>,
    pub mark_items_with_numbers: Option<bool>,
    pub show_tooltip: Option<bool>,
    pub max_tooltip_length: Option<i64>,
    pub show_thumbnail_image: Option<bool>,
    pub show_color_preview: Option<bool>,
    pub add_numeric_key_equivalents: Option<bool>,
    pub max_title_length: Option<i64>,
    pub reorder_after_paste: Option<bool>,
    pub add_clear_history_item: Option<bool>,
    pub snippet_search_layout: Option<SnippetSearchLayout>,
    pub search_debounce_ms: Option<i64>,
}

impl ConfigFile {
    pub fn resolve(&self) -> MenuConfig {
        let defaults = MenuConfig::default();
        let min_title = ELLIPSIS.chars().count();

        MenuConfig {
            inline_capacity: clamp_field(
                "inline_capacity",
                self.inline_capacity,
                defaults.inline_capacity,
                0,
                usize::MAX,
            ),
            folder_capacity: clamp_field(
                "folder_capacity",
                self.folder_capacity,
                defaults.folder_capacity,
                1,
                usize::MAX,
            ),
            max_history_size: clamp_field(
                "max_history_size",
                self.max_history_size,
                defaults.max_history_size,
                1,
                usize::MAX,
            ),
            first_index_starts_at_zero: self
                .first_index_starts_at_zero
                .unwrap_or(defaults.first_index_starts_at_zero),
            show_icon_in_menu: self.show_icon_in_menu.unwrap_or(defaults.show_icon_in_menu),
            mark_items_with_numbers: self
                .mark_items_with_numbers
                .unwrap_or(defaults.mark_items_with_numbers),
            show_tooltip: self.show_tooltip.unwrap_or(defaults.show_tooltip),
            max_tooltip_length: clamp_field(
                "max_tooltip_length",
                self.max_tooltip_length,
                defaults.max_tooltip_length,
                1,
                usize::MAX,
            ),
            show_thumbnail_image: self
                .show_thumbnail_image
                .unwrap_or(defaults.show_thumbnail_image),
            show_color_preview: self.show_color_preview.unwrap_or(defaults.show_color_preview),
            add_numeric_key_equivalents: self
                .add_numeric_key_equivalents
                .unwrap_or(defaults.add_numeric_key_equivalents),
            max_title_length: clamp_field(
                "max_title_length",
                self.max_title_length,
                defaults.max_title_length,
                min_title,
                usize::MAX,
            ),
            reorder_after_paste: self
                .reorder_after_paste
                .unwrap_or(defaults.reorder_after_paste),
            add_clear_history_item: self
                .add_clear_history_item
                .unwrap_or(defaults.add_clear_history_item),
            snippet_search_layout: self
                .snippet_search_layout
                .unwrap_or(defaults.snippet_search_layout),
            search_debounce_ms: clamp_field(
                "search_debounce_ms",
                self.search_debounce_ms,
                defaults.search_debounce_ms as usize,
                0,
                MAX_SEARCH_DEBOUNCE_MS as usize,
            ) as u64,
        }
    }
}

fn clamp_field(name: &str, value: Option<i64>, default: usize, min: usize, max: usize) -> usize {
    let Some(raw) = value else {
        return default;
    };

    let clamped = if raw < 0 {
        min
    } else {
        usize::try_from(raw).unwrap_or(max).clamp(min, max)
    };
    if i64::try_from(clamped).ok() != Some(raw) {
        warn!(field = name, value = raw, clamped, "config value out of range; clamped");
    }
    clamped
}

pub fn parse(raw: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    match extension.as_deref() {
        Some("toml") => toml::from_str(raw).map_err(|e| parse_error(e.to_string())),
        Some("json") | Some("json5") => json5::from_str(raw).map_err(|e| parse_error(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Loads and clamps a config file; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<MenuConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(MenuConfig::default())
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    Ok(parse(&raw, path)?.resolve())
}

#[cfg(test)]
mod tests {
    use super::{clamp_field, ConfigFile, MenuConfig};

    #[test]
    fn negative_values_clamp_to_minimum() {
        assert_eq!(clamp_field("x", Some(-4), 7, 1, usize::MAX), 1);
        assert_eq!(clamp_field("x", None, 7, 1, usize::MAX), 7);
        assert_eq!(clamp_field("x", Some(9_000), 7, 0, 5_000), 5_000);
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        assert_eq!(ConfigFile::default().resolve(), MenuConfig::default());
    }

    #[test]
    fn first_index_follows_flag() {
        let mut config = MenuConfig::default();
        assert_eq!(config.first_index(), 1);
        config.first_index_starts_at_zero = true;
        assert_eq!(config.first_index(), 0);
    }
}
