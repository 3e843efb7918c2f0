//! Turns raw NFO records into the fields the tag builder consumes.
//!
//! Normalization never fails. Empty values are dropped, the actor field is
//! brought into one canonical roster shape, and for episodes the roles
//! known at the show level are copied down to episode actors that have none.

use crate::nfo::{RawRecord, RawValue};
use std::collections::BTreeMap;

/// Separator used when an actor has several `<role>` entries.
const ROLE_SEPARATOR: &str = " / ";

/// Actor name to optional role, ordered by name.
///
/// `None` means no role was recorded, which is not the same as `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActorRoster {
    actors: BTreeMap<String, Option<String>>,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor. Empty names are ignored; a later role for the same
    /// name replaces an earlier missing one but never a recorded one.
    pub fn insert(&mut self, name: &str, role: Option<String>) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let slot = self.actors.entry(name.to_string()).or_default();
        if slot.is_none() {
            *slot = role;
        }
    }

    pub fn role(&self, name: &str) -> Option<&str> {
        self.actors.get(name).and_then(Option::as_deref)
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Entries in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.actors
            .iter()
            .map(|(name, role)| (name.as_str(), role.as_deref()))
    }

    /// Copies roles from `container` onto actors of `self` that have no
    /// recorded role. Returns how many roles were copied.
    pub fn inherit_roles(&mut self, container: &ActorRoster) -> usize {
        let mut inherited = 0;

        for (name, role) in &mut self.actors {
            if role.is_some() {
                continue;
            }
            if let Some(Some(container_role)) = container.actors.get(name) {
                log::debug!("Actor {name:?} inherits role {container_role:?} from the show");
                *role = Some(container_role.clone());
                inherited += 1;
            }
        }

        inherited
    }
}

impl<'a> FromIterator<(&'a str, Option<&'a str>)> for ActorRoster {
    fn from_iter<I: IntoIterator<Item = (&'a str, Option<&'a str>)>>(iter: I) -> Self {
        let mut roster = Self::new();
        for (name, role) in iter {
            roster.insert(name, role.map(str::to_string));
        }
        roster
    }
}

/// The shapes the raw `actor` field can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorShape<'a> {
    /// No actor field.
    Absent,
    /// Actor name to a map of that actor's details.
    Canonical(&'a RawRecord),
    /// A single actor whose `name` sits next to its other details, e.g.
    /// `{name: "X", role: "Y"}`. The reader produces this when there is
    /// exactly one `<actor>` element.
    Collapsed(&'a RawRecord),
    /// One entry per actor, either a details map or a bare name.
    Listed(&'a [RawValue]),
    /// Anything else; ignored.
    Unrecognized(&'a RawValue),
}

impl<'a> ActorShape<'a> {
    pub fn detect(value: Option<&'a RawValue>) -> Self {
        match value {
            None => Self::Absent,
            Some(value @ RawValue::Map(map)) => match map.get("name") {
                Some(RawValue::Text(_)) => Self::Collapsed(map),
                Some(RawValue::List(names)) => {
                    log::warn!("Actor entry has {} names, expected one", names.len());
                    Self::Unrecognized(value)
                }
                _ => Self::Canonical(map),
            },
            Some(RawValue::List(items)) => Self::Listed(items),
            Some(other) => Self::Unrecognized(other),
        }
    }

    pub fn into_roster(self) -> ActorRoster {
        let mut roster = ActorRoster::new();

        match self {
            Self::Absent => {}
            Self::Canonical(map) => {
                for (name, details) in map.iter() {
                    roster.insert(name, details.as_map().and_then(role_of));
                }
            }
            Self::Collapsed(details) => {
                if let Some(name) = details.get("name").and_then(RawValue::as_text) {
                    log::debug!("Rewriting collapsed single-actor entry for {name:?}");
                    roster.insert(name, role_of(details));
                }
            }
            Self::Listed(items) => {
                for item in items {
                    match item {
                        RawValue::Text(name) => roster.insert(name, None),
                        RawValue::Map(details) => {
                            match details.get("name").and_then(RawValue::as_text) {
                                Some(name) => roster.insert(name, role_of(details)),
                                None => log::warn!("Ignoring actor entry without a name"),
                            }
                        }
                        RawValue::List(_) => log::warn!("Ignoring nested actor list"),
                    }
                }
            }
            Self::Unrecognized(value) => {
                log::warn!("Ignoring actor field with unexpected shape: {}", value.shape());
            }
        }

        roster
    }
}

fn role_of(details: &RawRecord) -> Option<String> {
    match details.get("role")? {
        RawValue::Text(role) => Some(role.clone()),
        RawValue::List(roles) => {
            let roles: Vec<&str> = roles.iter().filter_map(RawValue::as_text).collect();
            (!roles.is_empty()).then(|| roles.join(ROLE_SEPARATOR))
        }
        RawValue::Map(_) => None,
    }
}

/// The fields of one show, episode or movie record, with empty values removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub title: Option<RawValue>,
    pub original_title: Option<RawValue>,
    pub show_title: Option<RawValue>,
    pub plot: Option<RawValue>,
    pub outline: Option<RawValue>,
    pub premiered: Option<RawValue>,
    pub aired: Option<RawValue>,
    pub director: Option<RawValue>,
    pub credits: Option<RawValue>,
    pub genre: Option<RawValue>,
    pub studio: Option<RawValue>,
    pub content_rating: Option<RawValue>,
    pub season: Option<RawValue>,
    pub episode: Option<RawValue>,
    pub set_name: Option<RawValue>,
    pub actors: ActorRoster,
}

/// Normalizes a single record on its own.
pub fn normalize_record(raw: &RawRecord) -> NormalizedRecord {
    let field = |name: &str| raw.get(name).and_then(prune);

    NormalizedRecord {
        title: field("title"),
        original_title: field("originaltitle"),
        show_title: field("showtitle"),
        plot: field("plot"),
        outline: field("outline"),
        premiered: field("premiered"),
        aired: field("aired"),
        director: field("director"),
        credits: field("credits"),
        genre: field("genre"),
        studio: field("studio"),
        content_rating: field("mpaa"),
        season: field("season"),
        episode: field("episode"),
        set_name: set_name(raw.get("set")),
        actors: ActorShape::detect(raw.get("actor")).into_roster(),
    }
}

/// `<set><name>X</name></set>`, or the older `<set>X</set>`.
fn set_name(value: Option<&RawValue>) -> Option<RawValue> {
    match value? {
        RawValue::Map(set) => set.get("name").and_then(prune),
        other => prune(other),
    }
}

/// Drops empty texts, and empty entries from lists. Nested shapes are kept
/// as they are so the builder can reject them where text is required.
fn prune(value: &RawValue) -> Option<RawValue> {
    match value {
        RawValue::Text(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| RawValue::Text(text.to_string()))
        }
        RawValue::List(items) => {
            let items: Vec<RawValue> = items.iter().filter_map(prune).collect();
            (!items.is_empty()).then_some(RawValue::List(items))
        }
        RawValue::Map(map) => (!map.is_empty()).then(|| RawValue::Map(map.clone())),
    }
}

/// The normalized inputs of one tagging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRecords {
    Episode {
        show: NormalizedRecord,
        episode: NormalizedRecord,
    },
    Movie(NormalizedRecord),
}

/// Normalizes an episode and its (optional) show record, then lets episode
/// actors without a role pick it up from the show.
pub fn normalize_episode(show: Option<&RawRecord>, episode: &RawRecord) -> MediaRecords {
    let show = show.map(normalize_record).unwrap_or_default();
    let mut episode = normalize_record(episode);

    let inherited = episode.actors.inherit_roles(&show.actors);
    if inherited > 0 {
        log::debug!("{inherited} episode actor role(s) filled in from the show");
    }

    MediaRecords::Episode { show, episode }
}

pub fn normalize_movie(movie: &RawRecord) -> MediaRecords {
    MediaRecords::Movie(normalize_record(movie))
}
