use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use davis_contest::codec::PngCodec;
use davis_contest::evaluation::{extract_metrics, score_dataset, EvaluationTable};
use davis_contest::manifest::{Manifest, ANNOTATION, MANIFEST_FILE, OUTPUT, RAW};
use davis_contest::{resolve_manifest, split, SplitOptions};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a dataset manifest into train and holdout manifests by clip
    Split {
        /// Dataset manifest (paths.json)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Directory the manifest's paths are relative to
        /// Defaults to leaving paths as written
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Fraction of clips placed in the training split
        #[arg(long, default_value_t = 0.8)]
        ratio: f64,

        /// Seed for a reproducible clip draw
        #[arg(long)]
        seed: Option<u64>,

        /// Columns whose clip identities must agree (default: raw, annotation)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Output directory; receives train/paths.json and holdout/paths.json
        #[arg(short, long)]
        out_dir: PathBuf,
    },

    /// Score predicted masks against annotations
    Evaluate {
        /// Result manifest with an `output` column
        #[arg(short, long)]
        predictions: PathBuf,

        /// Dataset manifest with an `annotation` column
        #[arg(short, long)]
        annotations: PathBuf,

        /// Directory prediction paths are relative to (default: the manifest's directory)
        #[arg(long)]
        prediction_dir: Option<PathBuf>,

        /// Directory annotation paths are relative to (default: the manifest's directory)
        #[arg(long)]
        annotation_dir: Option<PathBuf>,

        /// Last row index to score
        #[arg(long)]
        max_index: Option<usize>,

        /// Also print the per-pair table
        #[arg(long)]
        table: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Split {
            manifest,
            base_dir,
            ratio,
            seed,
            columns,
            out_dir,
        } => {
            let options = SplitOptions {
                columns,
                ratio,
                seed,
            };
            run_split(&manifest, base_dir.as_deref(), &options, &out_dir)
        }
        Command::Evaluate {
            predictions,
            annotations,
            prediction_dir,
            annotation_dir,
            max_index,
            table,
        } => run_evaluate(
            &predictions,
            &annotations,
            prediction_dir.as_deref(),
            annotation_dir.as_deref(),
            max_index,
            table,
        ),
    }
}

fn run_split(
    manifest_path: &Path,
    base_dir: Option<&Path>,
    options: &SplitOptions,
    out_dir: &Path,
) -> Result<()> {
    tracing::info!("Splitting {}", manifest_path.display());

    let manifest = Manifest::read(manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
    // Normalized even without a base directory so clip directories resolve
    let base_dir = base_dir.unwrap_or(Path::new(""));
    let manifest = resolve_manifest(&manifest, base_dir, &[RAW, ANNOTATION])
        .context("Failed to resolve manifest paths")?;

    let (train, holdout) = split(&manifest, options).context("Failed to split manifest")?;

    for (name, part) in [("train", &train), ("holdout", &holdout)] {
        let dir = out_dir.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        part.write(dir.join(MANIFEST_FILE))
            .with_context(|| format!("Failed to write {} manifest", name))?;
        tracing::info!("Wrote {} rows to {}", part.len(), dir.display());
    }

    Ok(())
}

fn run_evaluate(
    predictions_path: &Path,
    annotations_path: &Path,
    prediction_dir: Option<&Path>,
    annotation_dir: Option<&Path>,
    max_index: Option<usize>,
    table: bool,
) -> Result<()> {
    let predictions = load_resolved(predictions_path, prediction_dir, OUTPUT)?;
    let annotations = load_resolved(annotations_path, annotation_dir, ANNOTATION)?;

    let records = score_dataset(&predictions, &annotations, max_index, &PngCodec)
        .context("Failed to score predictions")?;
    let metrics = extract_metrics(&records).context("No prediction produced a defined IoU")?;

    if table {
        let table = EvaluationTable::from_records(&records);
        println!("{}", serde_json::to_string_pretty(&table)?);
    }
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}

fn load_resolved(path: &Path, base_dir: Option<&Path>, column: &str) -> Result<Vec<Option<String>>> {
    let manifest = Manifest::read(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let base_dir = base_dir
        .or_else(|| path.parent())
        .unwrap_or_else(|| Path::new(""));
    let resolved = resolve_manifest(&manifest, base_dir, &[column])
        .with_context(|| format!("Failed to resolve paths in {}", path.display()))?;
    let values = resolved
        .require_column(column)
        .with_context(|| format!("{} has no {} column", path.display(), column))?;
    Ok(values.to_vec())
}
