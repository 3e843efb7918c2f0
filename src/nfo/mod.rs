//! Untyped records read from NFO files.
//!
//! An NFO file is an XML document whose root element names the kind of
//! record (`movie`, `episodedetails`, `tvshow`). The reader turns the
//! children of that root into a [`RawRecord`]: a tree of texts, lists and
//! nested maps with no guarantees about which fields are present.

use std::collections::BTreeMap;
use std::fmt;

pub mod reader;

pub use reader::{Nfo, read_nfo, read_nfo_str};

/// The kind of record an NFO file describes, taken from its root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NfoKind {
    /// `<movie>`
    Movie,
    /// `<episodedetails>`
    Episode,
    /// `<tvshow>`
    TvShow,
}

impl NfoKind {
    /// Maps a root element name to a kind, if it is one we understand.
    pub fn from_root(name: &str) -> Option<Self> {
        match name {
            "movie" => Some(Self::Movie),
            "episodedetails" => Some(Self::Episode),
            "tvshow" => Some(Self::TvShow),
            _ => None,
        }
    }

    pub fn root(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Episode => "episodedetails",
            Self::TvShow => "tvshow",
        }
    }
}

impl fmt::Display for NfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root())
    }
}

/// A single value in a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Character data of a leaf element.
    Text(String),
    /// Repeated sibling elements sharing one name, in document order.
    List(Vec<RawValue>),
    /// An element with child elements.
    Map(RawRecord),
}

impl RawValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&RawRecord> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// A short name for the shape of the value, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(items) if items.iter().all(|item| item.as_text().is_some()) => {
                "list of texts"
            }
            Self::List(_) => "list of nested elements",
            Self::Map(_) => "nested element",
        }
    }
}

impl From<&str> for RawValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<RawRecord> for RawValue {
    fn from(record: RawRecord) -> Self {
        Self::Map(record)
    }
}

/// Field name to value, as read from one NFO element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, RawValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.fields.get(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.fields.iter()
    }

    /// Adds a value under `field`.
    ///
    /// A second value for the same field turns the entry into a
    /// [`RawValue::List`], which is how repeated elements such as
    /// `<genre>` or `<actor>` are represented.
    pub fn push(&mut self, field: impl Into<String>, value: RawValue) {
        use std::collections::btree_map::Entry;

        match self.fields.entry(field.into()) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            Entry::Occupied(mut entry) => match entry.get_mut() {
                RawValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, RawValue::List(Vec::new()));
                    *existing = RawValue::List(vec![first, value]);
                }
            },
        }
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (field, value) in iter {
            record.push(field, value.into());
        }
        record
    }
}
