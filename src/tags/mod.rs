//! Matroska tag documents.
//!
//! A [`TagDocument`] holds up to three [`TagLevel`]s (collection, season,
//! item), each with an ordered list of [`SimpleTag`]s. The builder fills it
//! from normalized records and the writer renders it as the XML that
//! `mkvpropedit --tags` expects.

use crate::error::{Error, Result};
use crate::nfo::RawValue;
use crate::normalize::ActorRoster;
use std::fmt;

pub mod builder;
pub mod writer;

pub use builder::{BuildContext, build_document};

/// The scope a level of tags applies to, as a Matroska `TargetTypeValue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TargetType {
    Item = 50,
    Season = 60,
    Collection = 70,
}

impl TargetType {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// The tag names this tool writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagName {
    Title,
    OriginalTitle,
    Summary,
    Synopsis,
    Genre,
    Actor,
    Character,
    LawRating,
    PartNumber,
    ProductionStudio,
    DateReleased,
    Director,
    WrittenBy,
    DateTagged,
}

impl TagName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::OriginalTitle => "ORIGINAL_TITLE",
            Self::Summary => "SUMMARY",
            Self::Synopsis => "SYNOPSIS",
            Self::Genre => "GENRE",
            Self::Actor => "ACTOR",
            Self::Character => "CHARACTER",
            Self::LawRating => "LAW_RATING",
            Self::PartNumber => "PART_NUMBER",
            Self::ProductionStudio => "PRODUCTION_STUDIO",
            Self::DateReleased => "DATE_RELEASED",
            Self::Director => "DIRECTOR",
            Self::WrittenBy => "WRITTEN_BY",
            Self::DateTagged => "DATE_TAGGED",
        }
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named string value, optionally with nested tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleTag {
    pub name: TagName,
    pub value: String,
    pub children: Vec<SimpleTag>,
}

impl SimpleTag {
    pub fn new(name: TagName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SimpleTag) -> Self {
        self.children.push(child);
        self
    }
}

/// The tags that apply to one target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLevel {
    pub target: TargetType,
    pub tags: Vec<SimpleTag>,
}

impl TagLevel {
    /// Values of every top-level tag called `name`, in order.
    pub fn values(&self, name: TagName) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|tag| tag.name == name)
            .map(|tag| tag.value.as_str())
            .collect()
    }

    /// The first value of `name`, if any.
    pub fn value(&self, name: TagName) -> Option<&str> {
        self.values(name).into_iter().next()
    }
}

/// Levels in descending target type order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDocument {
    levels: Vec<TagLevel>,
}

impl TagDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a level unless `tags` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralViolation`] if `target` does not come after
    /// every level already pushed.
    pub fn push_level(&mut self, target: TargetType, tags: Vec<SimpleTag>) -> Result<bool> {
        if let Some(last) = self.levels.last() {
            if last.target <= target {
                return Err(Error::StructuralViolation(format!(
                    "target type {target} pushed after {}",
                    last.target
                )));
            }
        }

        if tags.is_empty() {
            log::debug!("Dropping empty level {target}");
            return Ok(false);
        }

        self.levels.push(TagLevel { target, tags });
        Ok(true)
    }

    pub fn levels(&self) -> &[TagLevel] {
        &self.levels
    }

    pub fn level(&self, target: TargetType) -> Option<&TagLevel> {
        self.levels.iter().find(|level| level.target == target)
    }

    pub fn level_mut(&mut self, target: TargetType) -> Option<&mut TagLevel> {
        self.levels.iter_mut().find(|level| level.target == target)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Returns the first present candidate.
pub fn first_present<'a>(candidates: &[Option<&'a RawValue>]) -> Option<&'a RawValue> {
    candidates.iter().flatten().copied().next()
}

/// Turns a field value into zero or more tags called `name`.
///
/// Absent gives nothing, a text gives one tag and a list of texts gives one
/// tag per entry, in order.
///
/// # Errors
///
/// Any other shape means the input did not look the way we expected it to
/// and is reported as [`Error::MalformedInput`].
pub fn make_string_tag(name: TagName, value: Option<&RawValue>) -> Result<Vec<SimpleTag>> {
    let malformed = |value: &RawValue| Error::MalformedInput {
        tag: name.as_str(),
        found: value.shape(),
    };

    match value {
        None => Ok(Vec::new()),
        Some(RawValue::Text(text)) => Ok(vec![SimpleTag::new(name, text.as_str())]),
        Some(list @ RawValue::List(items)) => items
            .iter()
            .map(|item| {
                item.as_text()
                    .map(|text| SimpleTag::new(name, text))
                    .ok_or_else(|| malformed(list))
            })
            .collect(),
        Some(other) => Err(malformed(other)),
    }
}

/// One `ACTOR` per roster entry in ascending name order, each with a nested
/// `CHARACTER` when a role is known.
pub fn make_actor_tags(roster: &ActorRoster) -> Vec<SimpleTag> {
    roster
        .iter()
        .map(|(name, role)| {
            let actor = SimpleTag::new(TagName::Actor, name);
            match role.filter(|role| !role.is_empty()) {
                Some(role) => actor.with_child(SimpleTag::new(TagName::Character, role)),
                None => actor,
            }
        })
        .collect()
}
