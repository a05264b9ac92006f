use std::{fs, path::PathBuf};

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use videosheet::{
    Outcome, batch,
    config::{self, ConfigFile, Overrides},
    discover,
};

const CLI_AFTER_HELP: &str = "Examples:\n  videosheet input.mp4\n  videosheet /media/videos --recursive --output-directory sheets\n  videosheet input.mkv --columns 6 --rows 4 --width 1200\n  videosheet input.mp4 --comment-text \"archived 2024\" --override-existing\n\nDefaults can be placed in ~/.videosheet.toml; command-line flags win.";

#[derive(Debug, Parser)]
#[command(
    name = "videosheet",
    version,
    about = "Create contact sheets (preview thumbnail grids) from video files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Video file or directory of video files to process.
    #[arg(default_value = ".")]
    filename: PathBuf,

    /// Total sheet width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Grid columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Grid rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Grid columns for vertical videos (defaults to --columns).
    #[arg(long)]
    vertical_video_columns: Option<u32>,

    /// Grid rows for vertical videos (defaults to --rows).
    #[arg(long)]
    vertical_video_rows: Option<u32>,

    /// Gutter between thumbnails and around the grid, in pixels.
    #[arg(long)]
    spacing: Option<u32>,

    /// Background color (name or #rrggbb).
    #[arg(long)]
    background_color: Option<String>,

    /// Omit the metadata header.
    #[arg(long)]
    no_header: bool,

    /// TrueType/OpenType font file for the header.
    #[arg(long)]
    header_font: Option<PathBuf>,

    /// Header font size in pixels (used with --header-font).
    #[arg(long)]
    header_font_size: Option<f32>,

    /// Header font color (name or #rrggbb).
    #[arg(long)]
    header_font_color: Option<String>,

    /// TrueType/OpenType font file for timestamps.
    #[arg(long)]
    timestamp_font: Option<PathBuf>,

    /// Timestamp font size in pixels (used with --timestamp-font).
    #[arg(long)]
    timestamp_font_size: Option<f32>,

    /// Timestamp font color (name or #rrggbb).
    #[arg(long)]
    timestamp_font_color: Option<String>,

    /// Timestamp shadow color (name, #rrggbb, or "none" to disable).
    #[arg(long)]
    timestamp_shadow_color: Option<String>,

    /// Label preceding the comment line in the header.
    #[arg(long)]
    comment_label: Option<String>,

    /// Free-form comment appended to the header.
    #[arg(long)]
    comment_text: Option<String>,

    /// Seconds of lead-in to exclude from sampling.
    #[arg(long)]
    skip_seconds: Option<f64>,

    /// Suffix inserted before the .jpg extension of output files.
    #[arg(long)]
    suffix: Option<String>,

    /// JPEG quality, 1 to 100.
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// Overwrite existing contact sheets instead of skipping them.
    #[arg(long)]
    override_existing: bool,

    /// Descend into subdirectories.
    #[arg(long, short)]
    recursive: bool,

    /// Directory to write contact sheets into (created if missing).
    #[arg(long)]
    output_directory: Option<PathBuf>,

    /// Abort on the first failing file instead of continuing.
    #[arg(long)]
    raise_errors: bool,

    /// Show additional logging output.
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn into_overrides(self) -> Overrides {
        Overrides {
            path: Some(self.filename),
            recursive: self.recursive,
            width: self.width,
            columns: self.columns,
            rows: self.rows,
            vertical_columns: self.vertical_video_columns,
            vertical_rows: self.vertical_video_rows,
            spacing: self.spacing,
            background_color: self.background_color,
            no_header: self.no_header,
            header_font: self.header_font,
            header_font_size: self.header_font_size,
            header_font_color: self.header_font_color,
            timestamp_font: self.timestamp_font,
            timestamp_font_size: self.timestamp_font_size,
            timestamp_font_color: self.timestamp_font_color,
            timestamp_shadow_color: self.timestamp_shadow_color,
            comment_label: self.comment_label,
            comment_text: self.comment_text,
            skip_seconds: self.skip_seconds,
            suffix: self.suffix,
            jpeg_quality: self.jpeg_quality,
            override_existing: self.override_existing,
            output_directory: self.output_directory,
            raise_errors: self.raise_errors,
            verbose: self.verbose,
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let overrides = cli.into_overrides();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(if verbose {
        "debug"
    } else {
        "warn"
    }))
    .init();

    let config_file = match config::default_config_path() {
        Some(path) => ConfigFile::load(&path)?,
        None => None,
    };
    let settings = config::resolve(&overrides, config_file.as_ref())?;

    if let Some(directory) = &settings.output_directory {
        fs::create_dir_all(directory)?;
    }

    let files = discover::discover(&settings.path, settings.recursive)?;
    if files.is_empty() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("no video files found under {}", settings.path.display()).yellow()
        );
        return Ok(());
    }

    let progress_bar = if files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        pb.set_style(style.progress_chars("##-"));
        Some(pb)
    } else {
        None
    };

    let summary = batch::run(&files, &settings, |outcome| {
        if let Some(pb) = &progress_bar {
            match outcome {
                Outcome::Written(path) | Outcome::SkippedExisting(path) => {
                    if let Some(name) = path.file_name() {
                        pb.set_message(name.to_string_lossy().into_owned());
                    }
                }
                Outcome::Failed { path, .. } => {
                    if let Some(name) = path.file_name() {
                        pb.set_message(name.to_string_lossy().into_owned());
                    }
                }
            }
            pb.inc(1);
        }
    })?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    let counts = format!(
        "{} sheet(s) written, {} skipped, {} failed",
        summary.written, summary.skipped, summary.failed
    );
    if summary.failed > 0 {
        println!("{} {}", "done:".yellow().bold(), counts.yellow());
    } else {
        println!("{} {}", "success:".green().bold(), counts.green());
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
