//! Builds a [`TagDocument`] from normalized records.
//!
//! Each level is a fixed list of tags in output order. Every tag is fed by
//! a fallback chain: an ordered list of candidate fields of which the first
//! present one wins. Episodes and movies use deliberately different chains
//! for some tags (see `DATE_RELEASED`), so each case keeps its own table.

use crate::error::Result;
use crate::nfo::RawValue;
use crate::normalize::{MediaRecords, NormalizedRecord};
use crate::tags::{
    SimpleTag, TagDocument, TagName, TargetType, first_present, make_actor_tags, make_string_tag,
};
use chrono::NaiveDate;

/// Format of the `DATE_TAGGED` value.
pub const DATE_TAGGED_FORMAT: &str = "%Y-%m-%d";

/// Inputs to a build that do not come from the NFO files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    /// Written as `DATE_TAGGED`.
    pub tagged_on: NaiveDate,
    /// Part of a split movie release, written as the item `PART_NUMBER`.
    pub part_number: Option<u32>,
}

impl BuildContext {
    pub fn new(tagged_on: NaiveDate) -> Self {
        Self {
            tagged_on,
            part_number: None,
        }
    }

    /// A context dated with the local calendar date.
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn with_part_number(mut self, part_number: Option<u32>) -> Self {
        self.part_number = part_number;
        self
    }
}

/// Builds the tag document for an episode (with its show) or a movie.
///
/// Levels without any populated tag are left out, so two empty records
/// give a document with no levels at all.
///
/// # Errors
///
/// Fails with [`crate::error::Error::MalformedInput`] if a field that should
/// hold text holds nested elements instead.
pub fn build_document(records: &MediaRecords, context: &BuildContext) -> Result<TagDocument> {
    let mut document = TagDocument::new();

    let item_survived = match records {
        MediaRecords::Episode { show, episode } => {
            document.push_level(TargetType::Collection, episode_collection(show, episode)?)?;
            document.push_level(TargetType::Season, episode_season(episode)?)?;
            document.push_level(TargetType::Item, episode_item(show, episode)?)?
        }
        MediaRecords::Movie(movie) => {
            document.push_level(TargetType::Collection, movie_collection(movie)?)?;
            document.push_level(TargetType::Item, movie_item(movie, context)?)?
        }
    };

    if item_survived {
        if let Some(item) = document.level_mut(TargetType::Item) {
            let tagged_on = context.tagged_on.format(DATE_TAGGED_FORMAT).to_string();
            item.tags.push(SimpleTag::new(TagName::DateTagged, tagged_on));
        }
    }

    log::debug!("Built tag document with {} level(s)", document.levels().len());
    Ok(document)
}

fn field(name: TagName, candidates: &[Option<&RawValue>]) -> Result<Vec<SimpleTag>> {
    make_string_tag(name, first_present(candidates))
}

fn episode_collection(
    show: &NormalizedRecord,
    episode: &NormalizedRecord,
) -> Result<Vec<SimpleTag>> {
    Ok([
        field(TagName::Title, &[show.show_title.as_ref(), episode.show_title.as_ref()])?,
        field(TagName::Summary, &[show.plot.as_ref()])?,
        field(TagName::Genre, &[show.genre.as_ref()])?,
        make_actor_tags(&show.actors),
        field(TagName::LawRating, &[show.content_rating.as_ref()])?,
    ]
    .concat())
}

/// The show's own `season` field counts its seasons, so only the
/// episode's season number is read here.
fn episode_season(episode: &NormalizedRecord) -> Result<Vec<SimpleTag>> {
    Ok([
        field(TagName::PartNumber, &[episode.season.as_ref()])?,
        field(TagName::ProductionStudio, &[episode.studio.as_ref()])?,
    ]
    .concat())
}

fn episode_item(
    show: &NormalizedRecord,
    episode: &NormalizedRecord,
) -> Result<Vec<SimpleTag>> {
    Ok([
        field(TagName::PartNumber, &[episode.episode.as_ref()])?,
        field(TagName::Title, &[episode.title.as_ref()])?,
        field(TagName::OriginalTitle, &[episode.original_title.as_ref()])?,
        field(TagName::Summary, &[episode.plot.as_ref(), episode.outline.as_ref()])?,
        field(TagName::Synopsis, &[episode.outline.as_ref(), episode.plot.as_ref()])?,
        field(TagName::DateReleased, &[episode.aired.as_ref(), episode.premiered.as_ref()])?,
        field(TagName::Director, &[episode.director.as_ref()])?,
        field(TagName::WrittenBy, &[episode.credits.as_ref()])?,
        make_actor_tags(&episode.actors),
        field(TagName::ProductionStudio, &[episode.studio.as_ref(), show.studio.as_ref()])?,
        field(
            TagName::LawRating,
            &[episode.content_rating.as_ref(), show.content_rating.as_ref()],
        )?,
    ]
    .concat())
}

fn movie_collection(movie: &NormalizedRecord) -> Result<Vec<SimpleTag>> {
    field(TagName::Title, &[movie.set_name.as_ref()])
}

fn movie_item(movie: &NormalizedRecord, context: &BuildContext) -> Result<Vec<SimpleTag>> {
    let part_number = context
        .part_number
        .map(|part| RawValue::Text(part.to_string()));

    Ok([
        field(TagName::PartNumber, &[part_number.as_ref()])?,
        field(TagName::Title, &[movie.title.as_ref()])?,
        field(TagName::OriginalTitle, &[movie.original_title.as_ref()])?,
        field(TagName::Summary, &[movie.plot.as_ref(), movie.outline.as_ref()])?,
        field(TagName::Synopsis, &[movie.outline.as_ref(), movie.plot.as_ref()])?,
        field(TagName::DateReleased, &[movie.premiered.as_ref(), movie.aired.as_ref()])?,
        field(TagName::Director, &[movie.director.as_ref()])?,
        field(TagName::WrittenBy, &[movie.credits.as_ref()])?,
        make_actor_tags(&movie.actors),
        field(TagName::ProductionStudio, &[movie.studio.as_ref()])?,
        field(TagName::LawRating, &[movie.content_rating.as_ref()])?,
        field(TagName::Genre, &[movie.genre.as_ref()])?,
    ]
    .concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::nfo::RawRecord;
    use crate::normalize::{normalize_episode, normalize_movie};

    fn context() -> BuildContext {
        BuildContext::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
    }

    fn record(fields: &[(&str, &str)]) -> RawRecord {
        fields.iter().copied().collect()
    }

    fn names(document: &TagDocument, target: TargetType) -> Vec<&'static str> {
        document
            .level(target)
            .map(|level| level.tags.iter().map(|tag| tag.name.as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn builds_episode_levels() {
        let show = record(&[("showtitle", "Show"), ("plot", "ShowPlot")]);
        let episode = record(&[
            ("season", "3"),
            ("episode", "7"),
            ("title", "Ep Title"),
            ("aired", "2021-02-02"),
        ]);

        let document =
            build_document(&normalize_episode(Some(&show), &episode), &context()).unwrap();
        let targets: Vec<TargetType> = document.levels().iter().map(|level| level.target).collect();
        assert_eq!(
            targets,
            vec![TargetType::Collection, TargetType::Season, TargetType::Item]
        );

        let collection = document.level(TargetType::Collection).unwrap();
        assert_eq!(collection.value(TagName::Title), Some("Show"));
        assert_eq!(collection.value(TagName::Summary), Some("ShowPlot"));

        let season = document.level(TargetType::Season).unwrap();
        assert_eq!(season.value(TagName::PartNumber), Some("3"));

        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::PartNumber), Some("7"));
        assert_eq!(item.value(TagName::Title), Some("Ep Title"));
        assert_eq!(item.value(TagName::DateReleased), Some("2021-02-02"));
        assert_eq!(item.tags.last(), Some(&SimpleTag::new(TagName::DateTagged, "2024-03-09")));
    }

    #[test]
    fn episode_tags_follow_fixed_order() {
        let show = record(&[
            ("showtitle", "Show"),
            ("plot", "ShowPlot"),
            ("genre", "Drama"),
            ("mpaa", "TV-MA"),
            ("studio", "HBO"),
        ]);
        let mut episode = record(&[
            ("mpaa", "TV-14"),
            ("studio", "Network"),
            ("credits", "Writer"),
            ("director", "Director"),
            ("premiered", "2020-01-01"),
            ("outline", "Outline"),
            ("plot", "Plot"),
            ("originaltitle", "Original"),
            ("title", "Title"),
            ("episode", "1"),
            ("season", "2"),
        ]);
        episode.push("actor", RawValue::Map(record(&[("name", "Actor")])));

        let document =
            build_document(&normalize_episode(Some(&show), &episode), &context()).unwrap();

        assert_eq!(
            names(&document, TargetType::Collection),
            vec!["TITLE", "SUMMARY", "GENRE", "LAW_RATING"]
        );
        assert_eq!(
            names(&document, TargetType::Season),
            vec!["PART_NUMBER", "PRODUCTION_STUDIO"]
        );
        assert_eq!(
            names(&document, TargetType::Item),
            vec![
                "PART_NUMBER",
                "TITLE",
                "ORIGINAL_TITLE",
                "SUMMARY",
                "SYNOPSIS",
                "DATE_RELEASED",
                "DIRECTOR",
                "WRITTEN_BY",
                "ACTOR",
                "PRODUCTION_STUDIO",
                "LAW_RATING",
                "DATE_TAGGED",
            ]
        );
    }

    #[test]
    fn episode_release_date_prefers_aired() {
        let episode = record(&[("aired", "2020-01-01")]);
        let document = build_document(&normalize_episode(None, &episode), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::DateReleased), Some("2020-01-01"));

        let episode = record(&[("premiered", "2019-05-05")]);
        let document = build_document(&normalize_episode(None, &episode), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::DateReleased), Some("2019-05-05"));

        let episode = record(&[("premiered", "2019-05-05"), ("aired", "2018-01-01")]);
        let document = build_document(&normalize_episode(None, &episode), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::DateReleased), Some("2018-01-01"));
    }

    #[test]
    fn movie_release_date_prefers_premiered() {
        let movie = record(&[("premiered", "2019-05-05"), ("aired", "2018-01-01")]);
        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::DateReleased), Some("2019-05-05"));

        let movie = record(&[("aired", "2018-01-01")]);
        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::DateReleased), Some("2018-01-01"));
    }

    #[test]
    fn summary_and_synopsis_mirror_each_other() {
        let movie = record(&[("plot", "Plot"), ("outline", "Outline")]);
        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::Summary), Some("Plot"));
        assert_eq!(item.value(TagName::Synopsis), Some("Outline"));

        let movie = record(&[("outline", "Outline")]);
        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::Summary), Some("Outline"));
        assert_eq!(item.value(TagName::Synopsis), Some("Outline"));

        let movie = record(&[("plot", "Plot")]);
        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::Summary), Some("Plot"));
        assert_eq!(item.value(TagName::Synopsis), Some("Plot"));
    }

    #[test]
    fn collection_title_falls_back_to_episode_showtitle() {
        let episode = record(&[("showtitle", "From Episode"), ("title", "Pilot")]);
        let document = build_document(&normalize_episode(None, &episode), &context()).unwrap();

        let collection = document.level(TargetType::Collection).unwrap();
        assert_eq!(collection.value(TagName::Title), Some("From Episode"));
    }

    #[test]
    fn episode_studio_and_rating_fall_back_to_show() {
        let show = record(&[("studio", "HBO"), ("mpaa", "TV-MA")]);
        let episode = record(&[("title", "Pilot")]);
        let document =
            build_document(&normalize_episode(Some(&show), &episode), &context()).unwrap();

        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::ProductionStudio), Some("HBO"));
        assert_eq!(item.value(TagName::LawRating), Some("TV-MA"));
        assert!(document.level(TargetType::Season).is_none());
    }

    #[test]
    fn show_season_count_is_not_a_season_number() {
        let show = record(&[("showtitle", "Show"), ("season", "-1")]);
        let episode = record(&[("episode", "4"), ("title", "Pilot")]);
        let document =
            build_document(&normalize_episode(Some(&show), &episode), &context()).unwrap();

        assert!(document.level(TargetType::Season).is_none());
        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.value(TagName::PartNumber), Some("4"));
    }

    #[test]
    fn movie_without_set_has_item_level_only() {
        let mut movie = record(&[("title", "Heat"), ("studio", "Warner")]);
        movie.push("genre", "Action".into());
        movie.push("genre", "Crime".into());

        let document = build_document(&normalize_movie(&movie), &context()).unwrap();
        let targets: Vec<TargetType> = document.levels().iter().map(|level| level.target).collect();
        assert_eq!(targets, vec![TargetType::Item]);

        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.values(TagName::Genre), vec!["Action", "Crime"]);
        assert_eq!(item.value(TagName::PartNumber), None);
    }

    #[test]
    fn movie_set_and_part_number() {
        let mut movie = record(&[("title", "Heat")]);
        movie.push("set", RawValue::Map(record(&[("name", "Crime Classics")])));

        let context = context().with_part_number(Some(2));
        let document = build_document(&normalize_movie(&movie), &context).unwrap();

        let collection = document.level(TargetType::Collection).unwrap();
        assert_eq!(collection.tags, vec![SimpleTag::new(TagName::Title, "Crime Classics")]);
        assert!(document.level(TargetType::Season).is_none());

        let item = document.level(TargetType::Item).unwrap();
        assert_eq!(item.tags.first(), Some(&SimpleTag::new(TagName::PartNumber, "2")));
    }

    #[test]
    fn show_actors_land_on_collection_sorted() {
        let mut show = record(&[("showtitle", "Show")]);
        show.push(
            "actor",
            RawValue::Map(
                [
                    ("Zoe", RawValue::Map(record(&[("role", "Captain")]))),
                    ("Adam", RawValue::Map(RawRecord::new())),
                ]
                .into_iter()
                .collect(),
            ),
        );
        let mut episode = record(&[("title", "Pilot")]);
        episode.push("actor", RawValue::Map(record(&[("name", "Zoe")])));

        let document =
            build_document(&normalize_episode(Some(&show), &episode), &context()).unwrap();

        let collection = document.level(TargetType::Collection).unwrap();
        assert_eq!(collection.values(TagName::Actor), vec!["Adam", "Zoe"]);

        let item = document.level(TargetType::Item).unwrap();
        let zoe = item.tags.iter().find(|tag| tag.name == TagName::Actor).unwrap();
        assert_eq!(zoe.children, vec![SimpleTag::new(TagName::Character, "Captain")]);
    }

    #[test]
    fn empty_records_give_empty_document() {
        let records = normalize_episode(Some(&RawRecord::new()), &RawRecord::new());
        let document = build_document(&records, &context()).unwrap();
        assert!(document.is_empty());

        let document = build_document(&normalize_movie(&RawRecord::new()), &context()).unwrap();
        assert!(document.is_empty());
    }

    #[test]
    fn nested_value_in_text_field_fails() {
        let mut movie = record(&[("title", "Heat")]);
        movie.push("director", RawValue::Map(record(&[("name", "Mann")])));

        let err = build_document(&normalize_movie(&movie), &context()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { tag: "DIRECTOR", .. }));
    }
}
