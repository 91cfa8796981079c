//! Rmdraw: convert reMarkable notebook pages to Excalidraw drawings.
//!
//! Rmdraw decodes the tablet's proprietary `.lines`/`.rm` stroke-capture
//! files (wire versions 3, 5 and 6) into a normalized page model, then
//! re-encodes that model as an Excalidraw vector document. The decoder
//! and the converter are independent library components; the CLI is thin
//! glue that reads files, runs the two in sequence and writes JSON.
//!
//! # Modules
//!
//! - [`ink`]: decoded page model and the `.lines`/`.rm` reader
//! - [`convert`]: page-to-document conversion
//! - [`excalidraw`]: output document schema
//! - [`inspect`]: structural page summaries
//! - [`error`]: error types for rmdraw operations

pub mod convert;
pub mod error;
pub mod excalidraw;
pub mod ink;
pub mod inspect;

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use convert::{BackgroundImage, ConvertOptions, RandomIdSource};

pub use error::RmdrawError;

/// File extensions recognized as notebook pages.
const PAGE_EXTENSIONS: [&str; 2] = ["rm", "lines"];

/// Extension used for converted documents.
const OUTPUT_EXTENSION: &str = "excalidraw";

/// The rmdraw CLI application.
#[derive(Parser)]
#[command(name = "rmdraw")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert notebook pages to Excalidraw documents.
    Convert(ConvertArgs),

    /// Print a structural summary of a notebook page.
    Inspect(InspectArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input `.rm`/`.lines` file, or a directory to convert recursively.
    input: PathBuf,

    /// Output file (single input) or output root (directory input).
    /// Defaults to the input path with the `.excalidraw` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Raster page background (PNG/JPEG) to embed behind the strokes.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Do not group strokes by their source layer.
    #[arg(long)]
    flatten_layers: bool,

    /// Keep eraser strokes instead of dropping them.
    #[arg(long)]
    include_eraser: bool,

    /// Stroke width multiplier applied on top of per-pen multipliers.
    #[arg(long, default_value_t = 0.5)]
    scale: f64,

    /// Seed for element id generation (makes output reproducible).
    #[arg(long)]
    seed: Option<u64>,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input `.rm`/`.lines` file.
    input: PathBuf,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the rmdraw CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), RmdrawError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            // No subcommand: just print a help hint and exit successfully
            println!("rmdraw {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert reMarkable notebook pages to Excalidraw drawings.");
            println!();
            println!("Run 'rmdraw --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), RmdrawError> {
    let options = ConvertOptions {
        preserve_layers: !args.flatten_layers,
        include_eraser: args.include_eraser,
        stroke_width_scale: args.scale,
    };

    let background = match &args.background {
        Some(path) => Some(load_background(path)?),
        None => None,
    };

    let mut ids = match args.seed {
        Some(seed) => RandomIdSource::seeded(seed),
        None => RandomIdSource::new(),
    };

    if args.input.is_dir() {
        convert_batch(&args, background.as_ref(), &options, &mut ids)
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| args.input.with_extension(OUTPUT_EXTENSION));
        convert_page(&args.input, &output, background.as_ref(), &options, &mut ids)?;
        println!("converted {} -> {}", args.input.display(), output.display());
        Ok(())
    }
}

/// Convert every page under a directory, mirroring the tree.
///
/// Each page's failure is independent: a corrupt file is reported and
/// skipped, and the remaining pages still convert. The command fails at
/// the end if any page failed.
fn convert_batch(
    args: &ConvertArgs,
    background: Option<&BackgroundImage>,
    options: &ConvertOptions,
    ids: &mut RandomIdSource,
) -> Result<(), RmdrawError> {
    let pages = collect_page_files(&args.input)?;
    if pages.is_empty() {
        return Err(RmdrawError::EmptyBatch {
            path: args.input.clone(),
        });
    }

    let output_root = args.output.clone().unwrap_or_else(|| args.input.clone());
    let mut failed = 0usize;

    for page_path in &pages {
        let relative = page_path
            .strip_prefix(&args.input)
            .unwrap_or(page_path.as_path());
        let output = output_root.join(relative).with_extension(OUTPUT_EXTENSION);

        match convert_page(page_path, &output, background, options, ids) {
            Ok(()) => {
                println!("converted {} -> {}", page_path.display(), output.display());
            }
            Err(err) => {
                eprintln!("failed {}: {err}", page_path.display());
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(RmdrawError::BatchFailed {
            failed,
            total: pages.len(),
        });
    }
    Ok(())
}

/// Decode one page and write its converted document.
fn convert_page(
    input: &Path,
    output: &Path,
    background: Option<&BackgroundImage>,
    options: &ConvertOptions,
    ids: &mut RandomIdSource,
) -> Result<(), RmdrawError> {
    let page = ink::io_lines::read_lines_file(input)?;
    let document = convert::to_excalidraw(&page, background, options, ids);

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(RmdrawError::Io)?;
    }
    let file = fs::File::create(output).map_err(RmdrawError::Io)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &document).map_err(|source| {
        RmdrawError::ExcalidrawWrite {
            path: output.to_path_buf(),
            source,
        }
    })?;
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), RmdrawError> {
    let page = ink::io_lines::read_lines_file(&args.input)?;
    let summary = inspect::PageSummary::from_page(&page);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{json}");
        }
        _ => {
            print!("{summary}");
        }
    }
    Ok(())
}

/// Collect notebook page files under a directory, in a stable order.
fn collect_page_files(root: &Path) -> Result<Vec<PathBuf>, RmdrawError> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| RmdrawError::Io(err.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext));
        if matches {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

/// Load a raster background: probe its pixel dimensions and stamp the
/// embedded-file creation time.
fn load_background(path: &Path) -> Result<BackgroundImage, RmdrawError> {
    let bytes = fs::read(path).map_err(RmdrawError::Io)?;
    let size = imagesize::blob_size(&bytes).map_err(|err| RmdrawError::BackgroundImage {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let created_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);

    Ok(BackgroundImage {
        bytes,
        mime_type: guess_mime(path).to_string(),
        width: size.width as f64,
        height: size.height as f64,
        created_ms,
    })
}

fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
