use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use matcha_log::{
    init_logging, DraftEntry, EntrySchema, MatchaApp, MatchaError, PhotoSource, SortPolicy,
    StarRating, UserSettings,
};

const DATA_DIR_ENV: &str = "MATCHA_LOG_DATA_DIR";
const DEFAULT_DATA_DIR: &str = ".matcha-log";

#[derive(Parser)]
#[command(name = "matcha-log")]
#[command(about = "Rate matcha by photo greenness and keep a local log")]
struct Args {
    /// Directory holding the log database and settings
    #[arg(long, env = DATA_DIR_ENV, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a photo without saving anything
    Analyze { photo: PathBuf },
    /// Score a photo and save it with a rating
    Save {
        photo: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        thoughts: Option<String>,
    },
    /// Print the log
    Log {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },
    /// Import a JSON log exported from the browser app
    Import {
        file: PathBuf,
        /// The export came from the 0-10 version without notes
        #[arg(long)]
        legacy_scale: bool,
    },
    /// Change stored preferences
    Configure {
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
        #[arg(long)]
        require_photo: Option<bool>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Rating,
    Recent,
}

impl From<SortArg> for SortPolicy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Rating => SortPolicy::RatingFirst,
            SortArg::Recent => SortPolicy::RecencyFirst,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Emerald,
    Legacy,
}

impl From<ProfileArg> for matcha_log::ProfileKind {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Emerald => matcha_log::ProfileKind::Emerald,
            ProfileArg::Legacy => matcha_log::ProfileKind::Legacy,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), MatchaError> {
    let app = MatchaApp::open(&args.data_dir)?;
    info!("Using data directory {}", args.data_dir.display());

    match args.command {
        Command::Analyze { photo } => {
            let scored = app.score_photo(PhotoSource::File(photo)).await?;
            println!("Greenness: {}", scored.score);
        }
        Command::Save {
            photo,
            rating,
            location,
            thoughts,
        } => {
            let rating = StarRating::new(rating).map_err(|_| MatchaError::InvalidRating(rating))?;
            let draft = DraftEntry::new()
                .with_rating(rating)
                .with_location(location.unwrap_or_default())
                .with_thoughts(thoughts.unwrap_or_default());
            let draft = app.analyze_into(&draft, PhotoSource::File(photo)).await?;
            let (entry, _) = app.save_entry(&draft).await?;
            println!("Saved {} (greenness {})", entry.id, entry.greenness);
        }
        Command::Log { sort } => print_log(&app, sort).await?,
        Command::Import { file, legacy_scale } => import(&app, &file, legacy_scale).await?,
        Command::Configure {
            sort,
            profile,
            require_photo,
        } => {
            let current = app.settings();
            app.update_settings(UserSettings {
                scoring_profile: profile.map(Into::into).unwrap_or(current.scoring_profile),
                sort_policy: sort.map(Into::into).unwrap_or(current.sort_policy),
                require_photo: require_photo.unwrap_or(current.require_photo),
            })?;
        }
    }

    Ok(())
}

async fn print_log(app: &MatchaApp, sort: Option<SortArg>) -> Result<(), MatchaError> {
    let rows = match sort {
        Some(sort) => {
            let entries = app.load_entries().await?;
            matcha_log::render(&entries, sort.into())
        }
        None => app.render_log().await?,
    };

    if rows.is_empty() {
        println!("No entries yet.");
    }
    for row in rows {
        println!("{row}\n");
    }
    Ok(())
}

async fn import(app: &MatchaApp, file: &Path, legacy_scale: bool) -> Result<(), MatchaError> {
    let json = std::fs::read_to_string(file)
        .map_err(|err| MatchaError::Storage(format!("failed to read {}: {err}", file.display())))?;
    let schema = if legacy_scale {
        EntrySchema::V1
    } else {
        EntrySchema::V2
    };

    let report = app.import_legacy(&json, schema).await?;
    println!("Imported {} entries", report.imported);
    for skipped in report.skipped {
        println!("  skipped #{}: {}", skipped.index, skipped.reason);
    }
    Ok(())
}
