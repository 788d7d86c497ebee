//! Writes shaped records to the five CSV tables.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use log::info;
use serde::Serialize;

use crate::config::{OutputPaths, ShapeConfig};
use crate::error::{Error, Result};
use crate::reader::read_elements;
use crate::shape::{
    RecordSet, Shaper, NODE_FIELDS, NODE_TAGS_FIELDS, WAY_FIELDS, WAY_NODES_FIELDS,
    WAY_TAGS_FIELDS,
};

/// Counts of what an export wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub points: u64,
    pub point_tags: u64,
    pub ways: u64,
    pub way_nodes: u64,
    pub way_tags: u64,
    /// Top-level elements that were neither points nor ways.
    pub skipped: u64,
}

struct Table {
    path: PathBuf,
    writer: Writer<File>,
}

impl Table {
    fn create(path: &Path, header: &[&str]) -> Result<Self> {
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|source| Error::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        let mut table = Self {
            path: path.to_path_buf(),
            writer,
        };
        table.write_header(header)?;
        info!("writing {}", path.display());
        Ok(table)
    }

    fn write_header(&mut self, header: &[&str]) -> Result<()> {
        self.writer
            .write_record(header)
            .map_err(|source| self.error(source))
    }

    fn write<T: Serialize>(&mut self, row: &T) -> Result<()> {
        self.writer
            .serialize(row)
            .map_err(|source| self.error(source))
    }

    fn write_all<T: Serialize>(&mut self, rows: &[T]) -> Result<u64> {
        for row in rows {
            self.write(row)?;
        }
        Ok(rows.len() as u64)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|source| self.error(csv::Error::from(source)))
    }

    fn error(&self, source: csv::Error) -> Error {
        Error::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

/// The five output tables, each opened with its header already written.
pub struct CsvSink {
    nodes: Table,
    node_tags: Table,
    ways: Table,
    way_nodes: Table,
    way_tags: Table,
    summary: ExportSummary,
}

impl CsvSink {
    pub fn create(paths: &OutputPaths) -> Result<Self> {
        for path in paths.iter() {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
            }
        }

        Ok(Self {
            nodes: Table::create(&paths.nodes, &NODE_FIELDS)?,
            node_tags: Table::create(&paths.node_tags, &NODE_TAGS_FIELDS)?,
            ways: Table::create(&paths.ways, &WAY_FIELDS)?,
            way_nodes: Table::create(&paths.way_nodes, &WAY_NODES_FIELDS)?,
            way_tags: Table::create(&paths.way_tags, &WAY_TAGS_FIELDS)?,
            summary: ExportSummary::default(),
        })
    }

    pub fn write(&mut self, records: &RecordSet) -> Result<()> {
        match records {
            RecordSet::Point { point, tags } => {
                self.nodes.write(point)?;
                self.summary.points += 1;
                self.summary.point_tags += self.node_tags.write_all(tags)?;
            }
            RecordSet::Way { way, nodes, tags } => {
                self.ways.write(way)?;
                self.summary.ways += 1;
                self.summary.way_nodes += self.way_nodes.write_all(nodes)?;
                self.summary.way_tags += self.way_tags.write_all(tags)?;
            }
        }
        Ok(())
    }

    pub fn skip(&mut self) {
        self.summary.skipped += 1;
    }

    /// Flushes every table and returns what was written.
    pub fn finish(mut self) -> Result<ExportSummary> {
        for table in [
            &mut self.nodes,
            &mut self.node_tags,
            &mut self.ways,
            &mut self.way_nodes,
            &mut self.way_tags,
        ] {
            table.flush()?;
        }
        Ok(self.summary)
    }
}

/// Converts `input` into the five tables under `output_dir` in one pass.
pub fn export(input: &Path, output_dir: &Path, config: &ShapeConfig) -> Result<ExportSummary> {
    let shaper = Shaper::new(config);
    let mut sink = CsvSink::create(&OutputPaths::in_dir(output_dir))?;

    read_elements(input, |element| {
        match shaper.shape(&element) {
            Some(records) => sink.write(&records)?,
            None => sink.skip(),
        }
        Ok(())
    })?;

    let summary = sink.finish()?;
    info!(
        "exported {} points ({} tags) and {} ways ({} members, {} tags); skipped {} elements",
        summary.points,
        summary.point_tags,
        summary.ways,
        summary.way_nodes,
        summary.way_tags,
        summary.skipped
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StreetFix;
    use csv::ReaderBuilder;
    use tempfile::tempdir;

    const OSM_SAMPLE: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<osm version="0.6" generator="test">
  <bounds minlat="45" minlon="-123" maxlat="46" maxlon="-122"/>
  <node id="1" lat="45.0" lon="-122.0" version="1" timestamp="2016-03-01T10:00:00Z" changeset="100" uid="42" user="mapper">
    <tag k="addr:street" v="5th Ave" />
    <tag k="a b" v="dropped" />
    <tag k="name" v="Café Zoë" />
  </node>
  <node id="2" lat="bad" lon="-122.5" user="other" />
  <way id="10" user="mapper" uid="42" version="3" changeset="101" timestamp="2016-03-02T10:00:00Z">
    <nd ref="2" />
    <nd ref="1" />
    <nd ref="2" />
    <tag k="highway" v="residential" />
    <tag k="addr:street" v="Main St." />
    <tag k="fixme?" v="dropped" />
  </way>
  <relation id="20">
    <member type="way" ref="10" role="outer" />
  </relation>
</osm>
"#;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|row| row.unwrap().iter().map(|value| value.to_string()).collect())
            .collect()
    }

    fn run(config: &ShapeConfig) -> (tempfile::TempDir, ExportSummary) {
        let dir = tempdir().unwrap();
        let osm_path = dir.path().join("sample.osm");
        std::fs::write(&osm_path, OSM_SAMPLE).unwrap();
        let summary = export(&osm_path, &dir.path().join("out"), config).unwrap();
        (dir, summary)
    }

    #[test]
    fn export_writes_all_five_tables() {
        let (dir, summary) = run(&ShapeConfig::default());
        let out = dir.path().join("out");

        assert_eq!(
            summary,
            ExportSummary {
                points: 2,
                point_tags: 2,
                ways: 1,
                way_nodes: 3,
                way_tags: 2,
                skipped: 2,
            }
        );

        let nodes = read_rows(&out.join("nodes.csv"));
        assert_eq!(nodes[0], NODE_FIELDS);
        assert_eq!(
            nodes[1],
            vec!["1", "45.0", "-122.0", "1", "2016-03-01T10:00:00Z", "100", "42", "mapper"]
        );
        assert_eq!(nodes[2], vec!["2", "", "-122.5", "", "", "", "", "other"]);

        let node_tags = read_rows(&out.join("nodes_tags.csv"));
        assert_eq!(node_tags[0], NODE_TAGS_FIELDS);
        assert_eq!(node_tags[1], vec!["1", "street", "5th Ave", "addr"]);
        assert_eq!(node_tags[2], vec!["1", "name", "Café Zoë", "regular"]);
        assert_eq!(node_tags.len(), 3);

        let ways = read_rows(&out.join("ways.csv"));
        assert_eq!(ways[0], WAY_FIELDS);
        assert_eq!(
            ways[1],
            vec!["10", "mapper", "42", "3", "101", "2016-03-02T10:00:00Z"]
        );

        let way_nodes = read_rows(&out.join("ways_nodes.csv"));
        assert_eq!(way_nodes[0], WAY_NODES_FIELDS);
        assert_eq!(
            way_nodes[1..],
            [
                vec!["10", "2", "0"],
                vec!["10", "1", "1"],
                vec!["10", "2", "2"],
            ]
        );

        let way_tags = read_rows(&out.join("ways_tags.csv"));
        assert_eq!(way_tags[0], WAY_TAGS_FIELDS);
        assert_eq!(way_tags[1], vec!["10", "highway", "residential", "regular"]);
        assert_eq!(way_tags[2], vec!["10", "street", "Main St.", "addr"]);
        assert_eq!(way_tags.len(), 3);
    }

    #[test]
    fn export_normalizes_street_values_when_configured() {
        let config = ShapeConfig {
            street_fix: StreetFix::Value,
            ..ShapeConfig::default()
        };
        let (dir, _) = run(&config);
        let out = dir.path().join("out");

        let node_tags = read_rows(&out.join("nodes_tags.csv"));
        assert_eq!(node_tags[1], vec!["1", "street", "5th Avenue", "addr"]);
        let way_tags = read_rows(&out.join("ways_tags.csv"));
        assert_eq!(way_tags[2], vec!["10", "street", "Main Street", "addr"]);
    }

    #[test]
    fn headers_are_written_without_rows() {
        let dir = tempdir().unwrap();
        let osm_path = dir.path().join("empty.osm");
        std::fs::write(&osm_path, "<osm version=\"0.6\"></osm>").unwrap();

        let summary = export(&osm_path, dir.path(), &ShapeConfig::default()).unwrap();
        assert_eq!(summary, ExportSummary::default());
        assert_eq!(read_rows(&dir.path().join("ways_nodes.csv")), vec![WAY_NODES_FIELDS]);
    }
}
