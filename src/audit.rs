//! Diagnostic passes over an input file. Neither feeds the exported tables.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::element::Element;
use crate::error::{Error, Result};
use crate::keys::is_street_name;
use crate::reader::{open, read_elements, InputFormat};
use crate::street::StreetTypeAudit;

/// Collects unexpected street suffixes from `addr:street` values of points
/// and ways.
pub fn audit_street_types(path: &Path) -> Result<StreetTypeAudit> {
    let mut audit = StreetTypeAudit::default();
    read_elements(path, |element| {
        record_street_names(&mut audit, &element);
        Ok(())
    })?;
    Ok(audit)
}

pub fn record_street_names(audit: &mut StreetTypeAudit, element: &Element) {
    for tag in element.tags() {
        if is_street_name(&tag.key) {
            audit.record(&tag.value);
        }
    }
}

/// Number of occurrences of each XML element name, at any depth.
pub type TagCounts = BTreeMap<String, u64>;

pub fn count_tags(path: &Path) -> Result<TagCounts> {
    if InputFormat::from_path(path) != InputFormat::Xml {
        return Err(Error::NotXml {
            path: path.to_path_buf(),
        });
    }
    count_tags_from(BufReader::new(open(path)?))
}

pub fn count_tags_from<R: BufRead>(source: R) -> Result<TagCounts> {
    let mut reader = Reader::from_reader(source);
    reader.trim_text(true);

    let mut counts = TagCounts::new();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| Error::Xml {
                position: reader.buffer_position() as u64,
                source,
            })?;
        match event {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                *counts.entry(name).or_insert(0) += 1;
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const OSM_STREETS: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<osm version="0.6" generator="test">
  <node id="1" lat="37.8" lon="-122.2">
    <tag k="addr:street" v="Telegraph Ave" />
  </node>
  <node id="2" lat="37.8" lon="-122.3">
    <tag k="addr:street" v="Main Street" />
    <tag k="name" v="Not a Rd" />
  </node>
  <way id="3">
    <nd ref="1" />
    <nd ref="2" />
    <tag k="addr:street" v="College Ave" />
    <tag k="addr:street_name" v="Ignored Blvd" />
  </way>
  <relation id="4">
    <tag k="addr:street" v="Relation Rd" />
  </relation>
</osm>
"#;

    fn write_sample(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("streets.osm");
        std::fs::write(&path, OSM_STREETS).unwrap();
        path
    }

    #[test]
    fn audit_collects_unexpected_suffixes() {
        let dir = tempdir().unwrap();
        let audit = audit_street_types(&write_sample(dir.path())).unwrap();

        assert_eq!(audit.len(), 1);
        let names: Vec<&str> = audit
            .names("Ave")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["College Ave", "Telegraph Ave"]);
    }

    #[test]
    fn counts_every_element_name() {
        let dir = tempdir().unwrap();
        let counts = count_tags(&write_sample(dir.path())).unwrap();

        assert_eq!(counts.get("osm"), Some(&1));
        assert_eq!(counts.get("node"), Some(&2));
        assert_eq!(counts.get("way"), Some(&1));
        assert_eq!(counts.get("relation"), Some(&1));
        assert_eq!(counts.get("nd"), Some(&2));
        assert_eq!(counts.get("tag"), Some(&6));
    }

    #[test]
    fn counting_rejects_pbf_input() {
        let err = count_tags(Path::new("region.osm.pbf")).unwrap_err();
        assert!(matches!(err, Error::NotXml { .. }));
    }
}
