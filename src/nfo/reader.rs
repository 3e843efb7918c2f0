//! Reads NFO documents into [`RawRecord`] trees.

use crate::error::{Error, Result};
use crate::nfo::{NfoKind, RawRecord, RawValue};
use std::io::Read;
use std::path::Path;
use xml::reader::{ParserConfig, XmlEvent};

/// A parsed NFO file: the kind named by its root element and the fields below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfo {
    pub kind: NfoKind,
    pub record: RawRecord,
}

struct Frame {
    name: String,
    record: RawRecord,
    text: String,
}

impl Frame {
    fn new(name: String) -> Self {
        Self {
            name,
            record: RawRecord::new(),
            text: String::new(),
        }
    }

    /// Child elements win over character data; elements with neither are dropped.
    fn into_value(self) -> Option<RawValue> {
        if !self.record.is_empty() {
            return Some(RawValue::Map(self.record));
        }

        let text = self.text.trim();
        if text.is_empty() {
            None
        } else {
            Some(RawValue::Text(text.to_string()))
        }
    }
}

/// Reads and parses the NFO file at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read, is not well-formed XML, or has a root
/// element other than `movie`, `episodedetails` or `tvshow`.
pub async fn read_nfo(path: impl AsRef<Path>) -> Result<Nfo> {
    let path = path.as_ref();
    log::debug!("Reading NFO file: {:?}", path);

    let bytes = tokio::fs::read(path).await?;
    parse(bytes.as_slice())
}

/// Parses an NFO document held in memory.
pub fn read_nfo_str(content: &str) -> Result<Nfo> {
    parse(content.as_bytes())
}

fn parse(source: impl Read) -> Result<Nfo> {
    let (root, record) = parse_root(source)?;
    let kind = NfoKind::from_root(&root).ok_or(Error::UnsupportedNfo(root))?;

    log::debug!("Parsed <{}> with {} fields", kind, record.len());
    Ok(Nfo { kind, record })
}

/// Returns the root element name and its children.
///
/// Parsing stops as soon as the root element closes: scrapers often append
/// a bare URL after the document, which is not XML.
fn parse_root(source: impl Read) -> Result<(String, RawRecord)> {
    let mut reader = ParserConfig::new()
        .trim_whitespace(true)
        .ignore_comments(true)
        .create_reader(source);

    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.next()? {
            XmlEvent::StartElement { name, .. } => stack.push(Frame::new(name.local_name)),
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            XmlEvent::EndElement { .. } => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::StructuralViolation("unbalanced NFO element".into()))?;

                match stack.last_mut() {
                    Some(parent) => {
                        let name = frame.name.clone();
                        if let Some(value) = frame.into_value() {
                            parent.record.push(name, value);
                        }
                    }
                    None => return Ok((frame.name, frame.record)),
                }
            }
            XmlEvent::EndDocument => {
                return Err(Error::UnsupportedNfo("(no root element)".to_string()));
            }
            _ => {}
        }
    }
}
