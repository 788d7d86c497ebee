//! Elements as delivered by the readers, before shaping.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Attributes in document order. Elements carry a handful, so lookups scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub attributes: Attributes,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Way {
    pub attributes: Attributes,
    /// Raw `ref` values of the member points, in document order. A missing
    /// `ref` is kept as an empty string so positions stay contiguous.
    pub node_refs: Vec<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Point(Point),
    Way(Way),
    /// Any other top-level element, such as a relation.
    Other { kind: String },
}

impl Element {
    pub fn kind(&self) -> &str {
        match self {
            Element::Point(_) => "node",
            Element::Way(_) => "way",
            Element::Other { kind } => kind,
        }
    }

    /// Tags of points and ways; other elements have none.
    pub fn tags(&self) -> &[Tag] {
        match self {
            Element::Point(point) => &point.tags,
            Element::Way(way) => &way.tags,
            Element::Other { .. } => &[],
        }
    }
}
