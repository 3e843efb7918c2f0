use {
    crate::error::{Error, Result},
    crate::mkvpropedit::TagApplier,
    crate::nfo::{NfoKind, read_nfo},
    crate::normalize::{MediaRecords, normalize_episode, normalize_movie},
    crate::tags::{BuildContext, TagDocument, build_document, writer::to_xml_string},
    crate::utils::file_system,
    std::path::{Path, PathBuf},
};

pub mod config;
pub mod error;
pub mod executor;
pub mod mkvpropedit;
pub mod nfo;
pub mod normalize;
pub mod sequence;
pub mod tags;
pub mod utils;

/// What to read, and where the resulting tags should go.
#[derive(Debug, Clone)]
pub struct TagOptions {
    /// The movie or episode NFO.
    pub nfo: PathBuf,
    /// The show NFO of an episode. Looked up next to the episode when absent.
    pub show_nfo: Option<PathBuf>,
    /// A Matroska file to apply the tags to in place.
    pub media: Option<PathBuf>,
    /// Where to write the tags XML.
    pub output: Option<PathBuf>,
    /// Part of a split movie; detected from the file names when absent.
    pub part_number: Option<u32>,
    pub applier: TagApplier,
}

impl TagOptions {
    pub fn new(nfo: impl Into<PathBuf>) -> Self {
        Self {
            nfo: nfo.into(),
            show_nfo: None,
            media: None,
            output: None,
            part_number: None,
            applier: TagApplier::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    pub document: TagDocument,
    pub xml: String,
}

/// Reads an episode (plus its show, if one can be found) or a movie NFO
/// and normalizes it.
pub async fn load_records(nfo: &Path, show_nfo: Option<&Path>) -> Result<MediaRecords> {
    let item = read_nfo(nfo).await?;

    match item.kind {
        NfoKind::Movie => Ok(normalize_movie(&item.record)),
        NfoKind::Episode => {
            let show_path = show_nfo
                .map(Path::to_path_buf)
                .or_else(|| file_system::find_show_nfo(nfo));

            let show = match show_path {
                Some(path) => {
                    let show = read_nfo(&path).await?;
                    if show.kind != NfoKind::TvShow {
                        return Err(Error::UnsupportedNfo(format!(
                            "{} (expected tvshow in {})",
                            show.kind,
                            path.display()
                        )));
                    }
                    log::info!("Using show NFO {}", path.display());
                    Some(show.record)
                }
                None => {
                    log::info!("No show NFO found for {}", nfo.display());
                    None
                }
            };

            Ok(normalize_episode(show.as_ref(), &item.record))
        }
        NfoKind::TvShow => Err(Error::UnsupportedNfo(format!(
            "{} (pass an episode NFO, the show NFO goes to --show)",
            item.kind
        ))),
    }
}

/// Builds the tags for `options.nfo`, then writes and/or applies them.
///
/// The XML is rendered completely before anything is written, so a failed
/// build leaves no output behind.
pub async fn tag_media(options: &TagOptions) -> Result<TagOutcome> {
    let records = load_records(&options.nfo, options.show_nfo.as_deref()).await?;

    let part_number = options
        .part_number
        .or_else(|| options.media.as_deref().and_then(|media| sequence::part_number(media)))
        .or_else(|| sequence::part_number(&options.nfo));
    let context = BuildContext::today().with_part_number(part_number);

    let document = build_document(&records, &context)?;
    if document.is_empty() {
        log::warn!("No tags found in {}", options.nfo.display());
    }
    let xml = to_xml_string(&document)?;

    if let Some(output) = &options.output {
        file_system::create_parent_dir(output)?;
        tokio::fs::write(output, &xml).await?;
        log::info!("Wrote tags to {}", output.display());
    }

    if let Some(media) = &options.media {
        match &options.output {
            Some(output) => {
                options.applier.apply(media, output).await?;
            }
            None => {
                let temp = file_system::temp_tags_path();
                tokio::fs::write(&temp, &xml).await?;

                let applied = options.applier.apply(media, &temp).await;
                file_system::remove_temp_file(&temp).await;
                applied?;
            }
        }
    }

    Ok(TagOutcome { document, xml })
}
