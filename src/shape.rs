//! Shaping of one element into flat, id-linked rows.

use log::{debug, trace};
use serde::Serialize;

use crate::coerce::{coerce_float, coerce_int};
use crate::config::{ShapeConfig, StreetFix};
use crate::element::{Attributes, Element, Point, Tag, Way};
use crate::keys::{classify, has_problem_chars, is_street_name, TagClass, ADDR_KIND};
use crate::street::StreetNormalizer;

pub const NODE_FIELDS: [&str; 8] = [
    "id",
    "lat",
    "lon",
    "version",
    "timestamp",
    "changeset",
    "uid",
    "user",
];
pub const NODE_TAGS_FIELDS: [&str; 4] = ["id", "key", "value", "type"];
pub const WAY_FIELDS: [&str; 6] = ["id", "user", "uid", "version", "changeset", "timestamp"];
pub const WAY_NODES_FIELDS: [&str; 3] = ["id", "node_id", "position"];
pub const WAY_TAGS_FIELDS: [&str; 4] = NODE_TAGS_FIELDS;

// Field order below must match the header constants above.

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointRow {
    pub id: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub version: Option<String>,
    pub timestamp: Option<String>,
    pub changeset: Option<String>,
    pub uid: Option<i64>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WayRow {
    pub id: Option<i64>,
    pub user: Option<String>,
    pub uid: Option<i64>,
    pub version: Option<String>,
    pub changeset: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRow {
    pub id: Option<i64>,
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRow {
    pub id: Option<i64>,
    pub node_id: Option<i64>,
    pub position: usize,
}

/// Rows produced from a single element.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSet {
    Point {
        point: PointRow,
        tags: Vec<TagRow>,
    },
    Way {
        way: WayRow,
        nodes: Vec<MemberRow>,
        tags: Vec<TagRow>,
    },
}

#[derive(Debug, Clone)]
pub struct Shaper {
    default_kind: String,
    street_fix: StreetFix,
    street: StreetNormalizer,
}

impl Default for Shaper {
    fn default() -> Self {
        Self::new(&ShapeConfig::default())
    }
}

impl Shaper {
    pub fn new(config: &ShapeConfig) -> Self {
        Self {
            default_kind: config.default_kind.clone(),
            street_fix: config.street_fix,
            street: StreetNormalizer::new(config.abbreviations.clone(), config.match_mode),
        }
    }

    /// Returns `None` for elements that are neither points nor ways.
    pub fn shape(&self, element: &Element) -> Option<RecordSet> {
        match element {
            Element::Point(point) => Some(self.shape_point(point)),
            Element::Way(way) => Some(self.shape_way(way)),
            Element::Other { kind } => {
                debug!("ignoring <{kind}> element");
                None
            }
        }
    }

    fn shape_point(&self, point: &Point) -> RecordSet {
        let attributes = &point.attributes;
        let row = PointRow {
            id: int_field(attributes, "id"),
            lat: float_field(attributes, "lat"),
            lon: float_field(attributes, "lon"),
            version: text_field(attributes, "version"),
            timestamp: text_field(attributes, "timestamp"),
            changeset: text_field(attributes, "changeset"),
            uid: int_field(attributes, "uid"),
            user: text_field(attributes, "user"),
        };
        let tags = self.tag_rows(row.id, &point.tags);
        RecordSet::Point { point: row, tags }
    }

    fn shape_way(&self, way: &Way) -> RecordSet {
        let attributes = &way.attributes;
        let row = WayRow {
            id: int_field(attributes, "id"),
            user: text_field(attributes, "user"),
            uid: int_field(attributes, "uid"),
            version: text_field(attributes, "version"),
            changeset: text_field(attributes, "changeset"),
            timestamp: text_field(attributes, "timestamp"),
        };
        let nodes = way
            .node_refs
            .iter()
            .enumerate()
            .map(|(position, node_ref)| MemberRow {
                id: row.id,
                node_id: coerce_int(node_ref),
                position,
            })
            .collect();
        let tags = self.tag_rows(row.id, &way.tags);
        RecordSet::Way {
            way: row,
            nodes,
            tags,
        }
    }

    fn tag_rows(&self, id: Option<i64>, tags: &[Tag]) -> Vec<TagRow> {
        tags.iter().filter_map(|tag| self.tag_row(id, tag)).collect()
    }

    fn tag_row(&self, id: Option<i64>, tag: &Tag) -> Option<TagRow> {
        if has_problem_chars(&tag.key) {
            trace!("dropping tag {:?} on element {id:?}", tag.key);
            return None;
        }
        let TagClass { kind, key } = classify(&tag.key, &self.default_kind);
        if !is_street_name(&tag.key) {
            return Some(TagRow {
                id,
                key,
                value: tag.value.clone(),
                kind,
            });
        }

        let row = match self.street_fix {
            StreetFix::KeyFragment => TagRow {
                id,
                key: self.street.normalize(&key),
                value: tag.value.clone(),
                kind: ADDR_KIND.to_string(),
            },
            StreetFix::Value => TagRow {
                id,
                key,
                value: self.street.normalize(&tag.value),
                kind: ADDR_KIND.to_string(),
            },
        };
        Some(row)
    }
}

fn int_field(attributes: &Attributes, name: &str) -> Option<i64> {
    attributes.get(name).and_then(coerce_int)
}

fn float_field(attributes: &Attributes, name: &str) -> Option<f64> {
    attributes.get(name).and_then(coerce_float)
}

fn text_field(attributes: &Attributes, name: &str) -> Option<String> {
    attributes.get(name).map(str::to_string)
}
