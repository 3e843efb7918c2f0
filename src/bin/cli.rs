use clap::Parser;
use log::{LevelFilter, error};
use nfotags::config::Config;
use nfotags::mkvpropedit::{DEFAULT_EXECUTABLE, DEFAULT_TIMEOUT, TagApplier};
use nfotags::{TagOptions, tag_media};
use std::path::PathBuf;
use std::time::Duration;

/// Map Kodi NFO metadata into Matroska tags.
///
/// Without --output or --media the tags XML is printed to stdout.
#[derive(Parser, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Movie or episode NFO file.
    pub nfo: PathBuf,

    /// Show NFO for an episode (default: tvshow.nfo next to or above the episode).
    #[arg(long = "show")]
    pub show: Option<PathBuf>,

    /// Matroska file to apply the tags to with mkvpropedit.
    #[arg(long = "media", short)]
    pub media: Option<PathBuf>,

    /// Write the tags XML to this file.
    #[arg(long = "output", short)]
    pub output: Option<PathBuf>,

    /// Part number of a split movie (default: detected from the file names).
    #[arg(long = "part", short)]
    pub part: Option<u32>,

    #[arg(long = "mkvpropedit")]
    pub mkvpropedit: Option<PathBuf>,

    /// Seconds to wait for mkvpropedit.
    #[arg(long = "timeout", short)]
    pub timeout: Option<u64>,

    #[arg(
        long = "verbosity",
        short,
        value_parser = clap::builder::PossibleValuesParser::new([
            "info", "debug", "error", "none", "full"
        ])
    )]
    pub verbosity: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Cli::parse();
    let config = Config::load();

    let verbosity = args
        .verbosity
        .clone()
        .or_else(|| config.as_ref().ok().and_then(|c| c.verbosity.clone()))
        .unwrap_or_else(|| "info".to_string());
    init_logging(&verbosity);
    let config = config?;

    let applier = TagApplier::new(
        args.mkvpropedit
            .or(config.mkvpropedit)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
        args.timeout
            .or(config.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
    );

    let print = args.output.is_none() && args.media.is_none();
    let options = TagOptions {
        nfo: args.nfo,
        show_nfo: args.show,
        media: args.media,
        output: args.output,
        part_number: args.part,
        applier,
    };

    match tag_media(&options).await {
        Ok(outcome) => {
            if print {
                println!("{}", outcome.xml);
            }
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
        }
    }
}

fn init_logging(verbosity: &str) {
    let level = match verbosity {
        "none" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "debug" => LevelFilter::Debug,
        "full" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
