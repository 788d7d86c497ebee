//! Forward-only element streams over OSM XML and OSM PBF files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::warn;
use osmpbfreader::{OsmObj, OsmPbfReader, Tags};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::{Attributes, Element, Point, Tag, Way};
use crate::error::{Error, Result};

/// Input encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Xml,
    Pbf,
}

impl InputFormat {
    /// `.osm` is XML, everything else is treated as PBF.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("osm") => InputFormat::Xml,
            _ => InputFormat::Pbf,
        }
    }
}

/// Visits every top-level element of `path` in document order.
pub fn read_elements<F>(path: &Path, mut visit: F) -> Result<()>
where
    F: FnMut(Element) -> Result<()>,
{
    match InputFormat::from_path(path) {
        InputFormat::Xml => {
            for element in XmlElements::from_path(path)? {
                visit(element?)?;
            }
        }
        InputFormat::Pbf => {
            let file = open(path)?;
            let mut pbf = OsmPbfReader::new(file);
            for obj in pbf.iter() {
                visit(pbf_element(obj?))?;
            }
        }
    }
    Ok(())
}

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Picks the only `.osm` or `.pbf` file in `folder`.
pub fn find_default_input(folder: &Path) -> Result<PathBuf> {
    let entries = folder.read_dir().map_err(|source| Error::Open {
        path: folder.to_path_buf(),
        source,
    })?;
    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| Error::Open {
                path: folder.to_path_buf(),
                source,
            })?
            .path();
        if matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("osm" | "pbf")
        ) {
            inputs.push(path);
        }
    }
    inputs.sort();

    match inputs.len() {
        0 => Err(Error::NoDefaultInput(
            "no .osm or .pbf files found in current directory".to_string(),
        )),
        1 => Ok(inputs.remove(0)),
        _ => Err(Error::NoDefaultInput(
            "multiple .osm/.pbf files found; pass --input explicitly".to_string(),
        )),
    }
}

/// Streams the children of the OSM root element, one element at a time.
///
/// Only the element under construction is buffered. `<tag>` and `<nd>`
/// children are attached to their parent; anything nested deeper is
/// ignored. Top-level elements other than `node` and `way` come out as
/// [`Element::Other`] without children.
pub struct XmlElements<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    depth: usize,
    current: Option<Element>,
    done: bool,
}

impl XmlElements<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(BufReader::new(open(path)?)))
    }
}

impl<R: BufRead> XmlElements<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            depth: 0,
            current: None,
            done: false,
        }
    }

    fn next_element(&mut self) -> Result<Option<Element>> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|source| Error::Xml {
                    position: self.reader.buffer_position() as u64,
                    source,
                })?;
            match event {
                Event::Eof => return Ok(None),
                Event::Start(e) => {
                    let depth = self.depth;
                    self.depth += 1;
                    match depth {
                        1 => self.current = Some(begin_element(&e)?),
                        2 => attach_child(&mut self.current, &e)?,
                        _ => {}
                    }
                }
                Event::Empty(e) => match self.depth {
                    1 => return begin_element(&e).map(Some),
                    2 => attach_child(&mut self.current, &e)?,
                    _ => {}
                },
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 1 {
                        if let Some(element) = self.current.take() {
                            return Ok(Some(element));
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl<R: BufRead> Iterator for XmlElements<R> {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_element();
        if !matches!(next, Ok(Some(_))) {
            self.done = true;
        }
        next.transpose()
    }
}

fn get_attr_value(event: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in event.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(Error::XmlValue)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn read_attributes(event: &BytesStart<'_>) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attr in event.attributes().with_checks(false) {
        let attr = attr?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(Error::XmlValue)?;
        attributes.insert(name, value.into_owned());
    }
    Ok(attributes)
}

fn begin_element(event: &BytesStart<'_>) -> Result<Element> {
    let element = match event.name().as_ref() {
        b"node" => Element::Point(Point {
            attributes: read_attributes(event)?,
            tags: Vec::new(),
        }),
        b"way" => Element::Way(Way {
            attributes: read_attributes(event)?,
            ..Way::default()
        }),
        other => Element::Other {
            kind: String::from_utf8_lossy(other).into_owned(),
        },
    };
    Ok(element)
}

fn attach_child(current: &mut Option<Element>, event: &BytesStart<'_>) -> Result<()> {
    let Some(element) = current.as_mut() else {
        return Ok(());
    };
    match event.name().as_ref() {
        b"tag" => {
            let Some(key) = get_attr_value(event, b"k")? else {
                warn!("skipping <tag> without k on <{}>", element.kind());
                return Ok(());
            };
            let value = get_attr_value(event, b"v")?.unwrap_or_default();
            match element {
                Element::Point(point) => point.tags.push(Tag { key, value }),
                Element::Way(way) => way.tags.push(Tag { key, value }),
                Element::Other { .. } => {}
            }
        }
        b"nd" => {
            if let Element::Way(way) = element {
                way.node_refs
                    .push(get_attr_value(event, b"ref")?.unwrap_or_default());
            }
        }
        _ => {}
    }
    Ok(())
}

fn pbf_tags(tags: &Tags) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag::new(key.as_str(), value.as_str()))
        .collect()
}

fn pbf_element(obj: OsmObj) -> Element {
    match obj {
        OsmObj::Node(node) => Element::Point(Point {
            attributes: [
                ("id", node.id.0.to_string()),
                ("lat", node.lat().to_string()),
                ("lon", node.lon().to_string()),
            ]
            .into_iter()
            .collect(),
            tags: pbf_tags(&node.tags),
        }),
        OsmObj::Way(way) => Element::Way(Way {
            attributes: [("id", way.id.0.to_string())].into_iter().collect(),
            node_refs: way.nodes.iter().map(|node| node.0.to_string()).collect(),
            tags: pbf_tags(&way.tags),
        }),
        OsmObj::Relation(_) => Element::Other {
            kind: "relation".to_string(),
        },
    }
}
