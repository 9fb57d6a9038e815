//! Kittibox: bounding-box geometry and KITTI annotation interchange.
//!
//! Kittibox keeps images and their axis-aligned boxes geometrically
//! consistent and moves annotations in and out of the fixed-column KITTI
//! object-label format.
//!
//! # Modules
//!
//! - [`geom`]: box modes, coordinate spaces and the [`geom::BoundingBox`]
//!   value type
//! - [`transform`]: joint image-and-boxes resize/flip/rotate/crop operators
//! - [`kitti`]: the annotation record, line codec, dataset writer and JSON
//!   export
//! - [`inspect`]: label-tree inspection and reporting
//! - [`error`]: error types for kittibox operations

pub mod error;
pub mod geom;
pub mod inspect;
pub mod kitti;
pub mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::KittiboxError;

/// The kittibox CLI application.
#[derive(Parser)]
#[command(name = "kittibox")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Summarize a directory of KITTI label files.
    Inspect(InspectArgs),
    /// Export a converted split (images/ + labels/) as JSON lines.
    ExportJson(ExportJsonArgs),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Directory containing .txt label files (searched recursively).
    labels_dir: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the export-json subcommand.
#[derive(clap::Args)]
struct ExportJsonArgs {
    /// Split directory containing images/ and labels/.
    split_dir: PathBuf,

    /// Path of the JSON-lines file to create.
    output_path: PathBuf,
}

/// Run the kittibox CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), KittiboxError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::ExportJson(args)) => run_export_json(args),
        None => {
            println!("kittibox {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Bounding-box geometry and KITTI annotation interchange.");
            println!();
            println!("Run 'kittibox --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), KittiboxError> {
    let report = inspect::inspect_labels(&args.labels_dir)?;

    match args.output.as_str() {
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).map_err(|source| KittiboxError::JsonWrite {
                    path: args.labels_dir.clone(),
                    source,
                })?;
            println!("{}", json);
        }
        _ => {
            print!("{}", report);
        }
    }

    Ok(())
}

/// Execute the export-json subcommand.
fn run_export_json(args: ExportJsonArgs) -> Result<(), KittiboxError> {
    let written = kitti::io_json::export_split_jsonl(&args.split_dir, &args.output_path)?;

    if written == 0 {
        println!("No annotated images found; nothing written.");
    } else {
        println!(
            "Wrote {} annotated image(s) to {}",
            written,
            args.output_path.display()
        );
    }

    Ok(())
}
