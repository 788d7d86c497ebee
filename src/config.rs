use std::path::{Path, PathBuf};

use crate::keys::DEFAULT_KIND;
use crate::street::{AbbreviationTable, MatchMode};

/// What the street normalizer is applied to for `addr:street` tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreetFix {
    /// Normalize the local key fragment (`"street"`) and write the value
    /// raw. Ways also force the kind to `addr`. Matches the tables produced
    /// by earlier exports.
    #[default]
    KeyFragment,
    /// Keep `street` as the key and normalize the street name itself.
    Value,
}

#[derive(Debug, Clone)]
pub struct ShapeConfig {
    /// Kind recorded for keys without a namespace.
    pub default_kind: String,
    pub street_fix: StreetFix,
    pub match_mode: MatchMode,
    pub abbreviations: AbbreviationTable,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            default_kind: DEFAULT_KIND.to_string(),
            street_fix: StreetFix::default(),
            match_mode: MatchMode::default(),
            abbreviations: AbbreviationTable::default(),
        }
    }
}

pub const NODES_FILE: &str = "nodes.csv";
pub const NODE_TAGS_FILE: &str = "nodes_tags.csv";
pub const WAYS_FILE: &str = "ways.csv";
pub const WAY_NODES_FILE: &str = "ways_nodes.csv";
pub const WAY_TAGS_FILE: &str = "ways_tags.csv";

/// Locations of the five output tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub nodes: PathBuf,
    pub node_tags: PathBuf,
    pub ways: PathBuf,
    pub way_nodes: PathBuf,
    pub way_tags: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            nodes: dir.join(NODES_FILE),
            node_tags: dir.join(NODE_TAGS_FILE),
            ways: dir.join(WAYS_FILE),
            way_nodes: dir.join(WAY_NODES_FILE),
            way_tags: dir.join(WAY_TAGS_FILE),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        [
            &self.nodes,
            &self.node_tags,
            &self.ways,
            &self.way_nodes,
            &self.way_tags,
        ]
        .into_iter()
        .map(PathBuf::as_path)
    }
}
