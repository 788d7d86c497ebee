use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Document-level failures. Field and tag problems inside an element never
/// surface here; they degrade to empty cells or dropped tags.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to create output directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed OSM XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("malformed attribute value in OSM XML: {0}")]
    XmlValue(#[source] quick_xml::Error),
    #[error("malformed attribute in OSM XML: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("failed to decode OSM PBF data: {0}")]
    Pbf(#[from] osmpbfreader::Error),
    #[error("{path:?} is not an .osm file; tag counts need OSM XML input")]
    NotXml { path: PathBuf },
    #[error("no input given and {0}")]
    NoDefaultInput(String),
    #[error("failed to write {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
