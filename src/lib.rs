//! Flattens OpenStreetMap exports into CSV tables for bulk loading.
//!
//! Each point (`<node>`) and way of an `.osm` or `.pbf` file is shaped into
//! one attribute row plus dependent tag rows and, for ways, ordered member
//! rows, all linked by the element id:
//!
//! | table            | columns                                                  |
//! |------------------|----------------------------------------------------------|
//! | `nodes.csv`      | id, lat, lon, version, timestamp, changeset, uid, user   |
//! | `nodes_tags.csv` | id, key, value, type                                     |
//! | `ways.csv`       | id, user, uid, version, changeset, timestamp             |
//! | `ways_nodes.csv` | id, node_id, position                                    |
//! | `ways_tags.csv`  | id, key, value, type                                     |
//!
//! Malformed numeric attributes become empty cells and tags whose key holds
//! characters such as spaces, commas or periods are dropped; neither stops
//! the export. Street names in `addr:street` tags can be audited for
//! unexpected suffixes and have abbreviations like `St.` expanded.
//!
//! ```no_run
//! use std::path::Path;
//! use osm_tabular::{export, ShapeConfig};
//!
//! # fn main() -> osm_tabular::Result<()> {
//! let summary = export(Path::new("oakland.osm"), Path::new("out"), &ShapeConfig::default())?;
//! println!("{} points, {} ways", summary.points, summary.ways);
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod coerce;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod keys;
pub mod reader;
pub mod shape;
pub mod street;

pub use audit::{audit_street_types, count_tags, TagCounts};
pub use config::{OutputPaths, ShapeConfig, StreetFix};
pub use element::{Attributes, Element, Point, Tag, Way};
pub use error::{Error, Result};
pub use export::{export, CsvSink, ExportSummary};
pub use reader::{read_elements, InputFormat, XmlElements};
pub use shape::{MemberRow, PointRow, RecordSet, Shaper, TagRow, WayRow};
pub use street::{AbbreviationTable, MatchMode, StreetNormalizer, StreetTypeAudit};
