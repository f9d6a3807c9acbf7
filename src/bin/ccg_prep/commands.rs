//! Subcommands and their flags.
//!
//! Every flag is optional and overrides the matching field of the config
//! file (`--config`), which in turn overrides the built-in defaults.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};

use ccg_dataprep::art::{default_art_dir, survey_scan_sizes, ArtCropper};
use ccg_dataprep::cards::{subtype_list, types_to_subtypes, CardRegistry};
use ccg_dataprep::core::{LabelMode, LabelSource, PipelineConfig, PrepRng};
use ccg_dataprep::dataset::{DatasetAssembler, LabelledFile, ScanPruner};
use ccg_dataprep::encoding::{
    build_corpus, build_text_corpus, CategoryEncoder, CharVocabulary, LabelEncoder,
};

/// Card-art and card-text dataset preparation.
#[derive(Parser, Debug)]
#[command(name = "ccg-prep", version, about)]
pub struct Cli {
    /// JSON pipeline config; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for sampling and partitioning
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crop art (and augmented copies) out of card scans
    Crop(CropArgs),
    /// Delete token and split-card scans
    Prune(PruneArgs),
    /// Fit a category vocabulary and save it
    Vocab(VocabArgs),
    /// Write the name or rules-text corpus
    Corpus(CorpusArgs),
    /// Label cropped art and write a train/test manifest
    Split(SplitArgs),
    /// List distinct scan sizes
    Sizes(SizesArgs),
    /// Print type and subtype summaries of the dataset
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
pub struct CropArgs {
    /// Directory of card scans
    pub scan_dir: PathBuf,

    /// Output directory (default: sibling `art` directory)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Output height in pixels (default: width)
    #[arg(long)]
    pub height: Option<u32>,

    /// Skip mirrored copies
    #[arg(long)]
    pub no_flip: bool,

    /// Skip blurred copies
    #[arg(long)]
    pub no_blur: bool,

    /// Save single-channel art
    #[arg(long)]
    pub grayscale: bool,

    /// Fraction of scans to process
    #[arg(long)]
    pub proportion: Option<f64>,
}

#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Directory of card scans
    pub scan_dir: PathBuf,

    /// Card dataset (JSON)
    #[arg(long)]
    pub json: PathBuf,

    /// Keep token scans
    #[arg(long)]
    pub keep_tokens: bool,

    /// Keep split-card scans
    #[arg(long)]
    pub keep_splits: bool,

    /// Only report what would be removed
    #[arg(long)]
    pub dry_run: bool,
}

/// Labelling mode flag.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// One class per card from its primary type
    PrimaryType,
    /// One bit per type (and subtype)
    MultiHot,
}

impl From<ModeArg> for LabelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::PrimaryType => LabelMode::PrimaryType,
            ModeArg::MultiHot => LabelMode::MultiHot,
        }
    }
}

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Card dataset (JSON)
    #[arg(long)]
    pub json: PathBuf,

    /// Labelling mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Minimum label frequency
    #[arg(long)]
    pub cutoff: Option<usize>,

    /// Multi-hot over types only
    #[arg(long)]
    pub types_only: bool,
}

#[derive(Args, Debug)]
pub struct VocabArgs {
    #[command(flatten)]
    pub labels: LabelArgs,

    /// Where to save the fitted encoder (bincode)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Card dataset (JSON)
    #[arg(long)]
    pub json: PathBuf,

    /// Rules text instead of names
    #[arg(long)]
    pub text: bool,

    /// Output file (default: stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Also save the character vocabulary (bincode)
    #[arg(long)]
    pub vocab: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Directory of cropped art
    pub art_dir: PathBuf,

    #[command(flatten)]
    pub labels: LabelArgs,

    /// Probability of an example landing in the test set
    #[arg(long)]
    pub test_proportion: Option<f64>,

    /// Manifest output file (JSON)
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct SizesArgs {
    /// Directory of card scans
    pub scan_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Card dataset (JSON)
    #[arg(long)]
    pub json: PathBuf,
}

/// Train/test manifest: one row per art file.
#[derive(Serialize)]
struct Manifest<'a> {
    num_categories: usize,
    train: &'a [LabelledFile],
    test: &'a [LabelledFile],
}

fn load_registry(path: &Path) -> Result<CardRegistry> {
    CardRegistry::load(path).with_context(|| format!("loading card dataset {}", path.display()))
}

impl Cli {
    /// Dispatch the chosen subcommand.
    pub fn run(self) -> Result<()> {
        let config = self.pipeline_config()?;
        match self.command {
            Commands::Crop(args) => run_crop(config, args),
            Commands::Prune(args) => run_prune(args),
            Commands::Vocab(args) => run_vocab(config, args),
            Commands::Corpus(args) => run_corpus(args),
            Commands::Split(args) => run_split(config, args),
            Commands::Sizes(args) => run_sizes(args),
            Commands::Summary(args) => run_summary(args),
        }
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }
}

fn apply_label_args(config: &mut PipelineConfig, args: &LabelArgs) {
    if let Some(mode) = args.mode {
        config.vocab.mode = mode.into();
    }
    if let Some(cutoff) = args.cutoff {
        config.vocab.cutoff = cutoff;
    }
    if args.types_only {
        config.vocab.source = LabelSource::Types;
    }
}

fn run_crop(mut config: PipelineConfig, args: CropArgs) -> Result<()> {
    let crop = &mut config.crop;
    if let Some(width) = args.width {
        crop.output_width = width;
    }
    if args.height.is_some() {
        crop.output_height = args.height;
    }
    crop.flip &= !args.no_flip;
    crop.blur &= !args.no_blur;
    crop.grayscale |= args.grayscale;
    if let Some(proportion) = args.proportion {
        crop.proportion = proportion;
    }

    let cropper = ArtCropper::new(config.crop.clone())?;
    let output = args
        .output
        .unwrap_or_else(|| default_art_dir(&args.scan_dir));
    let mut rng = PrepRng::new(config.seed).for_context("crop");

    let report = cropper
        .process_dir(&args.scan_dir, &output, &mut rng)
        .with_context(|| format!("cropping scans in {}", args.scan_dir.display()))?;
    println!(
        "Cropped {} scans ({} skipped), wrote {} files to {}",
        report.processed,
        report.sampled_out,
        report.written.len(),
        output.display()
    );
    Ok(())
}

fn run_prune(args: PruneArgs) -> Result<()> {
    let registry = load_registry(&args.json)?;
    let pruner = ScanPruner::from_registry(&registry, !args.keep_tokens, !args.keep_splits)
        .with_dry_run(args.dry_run);
    let report = pruner.prune(&args.scan_dir)?;

    for path in &report.removed {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_vocab(mut config: PipelineConfig, args: VocabArgs) -> Result<()> {
    apply_label_args(&mut config, &args.labels);
    let registry = load_registry(&args.labels.json)?;
    let encoder = CategoryEncoder::fit(&registry, &config.vocab);

    for index in 0..encoder.num_categories() {
        if let Some(label) = encoder.label_of(index) {
            println!("{index}\t{label}");
        }
    }
    if let Some(output) = &args.output {
        encoder
            .save(output)
            .with_context(|| format!("saving encoder to {}", output.display()))?;
        info!("Saved encoder to {}", output.display());
    }
    Ok(())
}

fn run_corpus(args: CorpusArgs) -> Result<()> {
    let registry = load_registry(&args.json)?;
    let corpus = if args.text {
        build_text_corpus(&registry)
    } else {
        build_corpus(&registry)
    };

    match &args.output {
        Some(path) => std::fs::write(path, &corpus)
            .with_context(|| format!("writing corpus to {}", path.display()))?,
        None => std::io::stdout().write_all(corpus.as_bytes())?,
    }
    if let Some(path) = &args.vocab {
        let vocab = CharVocabulary::build(&corpus);
        vocab
            .save(path)
            .with_context(|| format!("saving vocabulary to {}", path.display()))?;
        info!("Saved {} characters to {}", vocab.len(), path.display());
    }
    Ok(())
}

fn run_split(mut config: PipelineConfig, args: SplitArgs) -> Result<()> {
    apply_label_args(&mut config, &args.labels);
    if let Some(test_proportion) = args.test_proportion {
        config.split.test_proportion = test_proportion;
    }

    let registry = load_registry(&args.labels.json)?;
    let encoder = CategoryEncoder::fit(&registry, &config.vocab);
    let assembler = DatasetAssembler::from_config(&registry, &config)?;
    let partition = assembler
        .art_listing(&args.art_dir, &encoder)
        .with_context(|| format!("listing art in {}", args.art_dir.display()))?;
    if partition.train.is_empty() {
        warn!("Every example landed in the test set");
    }

    let manifest = Manifest {
        num_categories: encoder.num_categories(),
        train: &partition.train,
        test: &partition.test,
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("writing manifest {}", args.output.display()))?;

    println!(
        "{} train / {} test examples written to {}",
        partition.train.len(),
        partition.test.len(),
        args.output.display()
    );
    Ok(())
}

fn run_sizes(args: SizesArgs) -> Result<()> {
    let sizes = survey_scan_sizes(&args.scan_dir)?;
    for (width, height) in sizes {
        println!("{width}x{height}");
    }
    Ok(())
}

fn run_summary(args: SummaryArgs) -> Result<()> {
    let registry = load_registry(&args.json)?;

    #[derive(Serialize)]
    struct Summary {
        cards: usize,
        types_to_subtypes: BTreeMap<String, Vec<String>>,
        subtypes: Vec<String>,
    }

    let summary = Summary {
        cards: registry.len(),
        types_to_subtypes: types_to_subtypes(&registry),
        subtypes: subtype_list(&registry),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
