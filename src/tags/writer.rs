//! Renders a [`TagDocument`] as Matroska tags XML.
//!
//! Element order is fixed: `Targets` before the `Simple` tags of a level,
//! and `Name`, then `String`, then nested `Simple`s within a tag.

use crate::error::{Error, Result};
use crate::tags::{SimpleTag, TagDocument, TagLevel};
use std::io::Write;
use xml::common::XmlVersion;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

/// Writes `document` to `sink` as indented UTF-8 XML.
pub fn write_document<W: Write>(document: &TagDocument, sink: W) -> Result<()> {
    let config = EmitterConfig::new().perform_indent(true);
    let mut writer = EventWriter::new_with_config(sink, config);

    writer.write(XmlEvent::StartDocument {
        version: XmlVersion::Version10,
        encoding: Some("UTF-8"),
        standalone: None,
    })?;

    writer.write(XmlEvent::start_element("Tags"))?;
    for level in document.levels() {
        write_level(&mut writer, level)?;
    }
    writer.write(XmlEvent::end_element())?; // </Tags>

    Ok(())
}

/// Renders `document` into a string.
pub fn to_xml_string(document: &TagDocument) -> Result<String> {
    let mut buffer = Vec::new();
    write_document(document, &mut buffer)?;

    String::from_utf8(buffer)
        .map_err(|_| Error::StructuralViolation("rendered XML is not UTF-8".to_string()))
}

fn write_level<W: Write>(writer: &mut EventWriter<W>, level: &TagLevel) -> Result<()> {
    if level.tags.is_empty() {
        return Err(Error::StructuralViolation(format!(
            "level {} has no tags",
            level.target
        )));
    }

    writer.write(XmlEvent::start_element("Tag"))?;

    writer.write(XmlEvent::start_element("Targets"))?;
    writer.write(XmlEvent::start_element("TargetTypeValue"))?;
    writer.write(XmlEvent::characters(&level.target.to_string()))?;
    writer.write(XmlEvent::end_element())?;
    writer.write(XmlEvent::end_element())?;

    for tag in &level.tags {
        write_simple_tag(writer, tag)?;
    }

    writer.write(XmlEvent::end_element())?; // </Tag>
    Ok(())
}

fn write_simple_tag<W: Write>(writer: &mut EventWriter<W>, tag: &SimpleTag) -> Result<()> {
    writer.write(XmlEvent::start_element("Simple"))?;

    writer.write(XmlEvent::start_element("Name"))?;
    writer.write(XmlEvent::characters(tag.name.as_str()))?;
    writer.write(XmlEvent::end_element())?;

    writer.write(XmlEvent::start_element("String"))?;
    writer.write(XmlEvent::characters(&tag.value))?;
    writer.write(XmlEvent::end_element())?;

    for child in &tag.children {
        write_simple_tag(writer, child)?;
    }

    writer.write(XmlEvent::end_element())?;
    Ok(())
}
