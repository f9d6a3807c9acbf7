//! Pipeline configuration types.
//!
//! Each stage is configured by its own struct:
//! - `CropConfig`: art extraction (output size, variants, sampling)
//! - `VocabConfig`: category encoding mode and frequency cutoff
//! - `SequenceConfig`: padding length and next-character windows
//! - `SplitConfig`: train/test proportion
//! - `PipelineConfig`: combines all of the above with the RNG seed
//!
//! All configs have a `Default`, `with_*` builder methods, and round-trip
//! through JSON so a run can be described by a single file.

use std::path::Path;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use super::error::{PrepError, PrepResult};

/// Resampling filter used when shrinking the art crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest neighbour.
    Nearest,
    /// Linear (bilinear) filter.
    #[default]
    Triangle,
    /// Cubic filter.
    CatmullRom,
    /// Gaussian filter.
    Gaussian,
    /// Lanczos with window 3.
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Art extraction settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Output width in pixels (default: 64).
    pub output_width: u32,

    /// Output height in pixels. `None` means square (same as width).
    pub output_height: Option<u32>,

    /// Also write a horizontally mirrored copy (`flip_` prefix).
    pub flip: bool,

    /// Also write blurred copies (`blur_`, and `blur_flip_` when flipping).
    pub blur: bool,

    /// Gaussian blur radius for the unmirrored copy (default: 0.6).
    pub blur_radius: f32,

    /// Gaussian blur radius for the mirrored copy (default: 0.8).
    pub flip_blur_radius: f32,

    /// Convert the art to single-channel luma before saving.
    pub grayscale: bool,

    /// Fraction of scans to process, drawn per scan (default: 1.0).
    pub proportion: f64,

    /// Resampling filter for the final resize.
    pub filter: ResampleFilter,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            output_width: 64,
            output_height: None,
            flip: true,
            blur: true,
            blur_radius: 0.6,
            flip_blur_radius: 0.8,
            grayscale: false,
            proportion: 1.0,
            filter: ResampleFilter::Triangle,
        }
    }
}

impl CropConfig {
    /// Set the output size.
    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.output_width = width;
        self.output_height = Some(height);
        self
    }

    /// Enable or disable the flip/blur variants.
    #[must_use]
    pub fn with_variants(mut self, flip: bool, blur: bool) -> Self {
        self.flip = flip;
        self.blur = blur;
        self
    }

    /// Enable grayscale output.
    #[must_use]
    pub fn with_grayscale(mut self, grayscale: bool) -> Self {
        self.grayscale = grayscale;
        self
    }

    /// Process only a random fraction of scans.
    #[must_use]
    pub fn with_proportion(mut self, proportion: f64) -> Self {
        self.proportion = proportion;
        self
    }

    /// Effective output dimensions `(width, height)`.
    #[must_use]
    pub fn output_size(&self) -> (u32, u32) {
        (
            self.output_width,
            self.output_height.unwrap_or(self.output_width),
        )
    }

    /// Check value ranges.
    pub fn validate(&self) -> PrepResult<()> {
        let (width, height) = self.output_size();
        if width == 0 || height == 0 {
            return Err(PrepError::InvalidConfig(format!(
                "output size must be non-zero, got {width}x{height}"
            )));
        }
        check_probability("crop proportion", self.proportion)?;
        if self.blur_radius <= 0.0 || self.flip_blur_radius <= 0.0 {
            return Err(PrepError::InvalidConfig(
                "blur radii must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// How cards are turned into labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    /// One class per card from its primary type, rare types merged into "Other".
    #[default]
    PrimaryType,
    /// One bit per label present on the card.
    MultiHot,
}

/// Which card fields feed a multi-hot vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// Only `types`.
    Types,
    /// `types` and `subtypes` in one shared label space.
    #[default]
    TypesAndSubtypes,
}

/// Category vocabulary settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabConfig {
    /// Labelling mode.
    pub mode: LabelMode,

    /// Fields used in multi-hot mode.
    pub source: LabelSource,

    /// Minimum occurrences for a label to get its own slot (default: 500).
    pub cutoff: usize,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            mode: LabelMode::PrimaryType,
            source: LabelSource::TypesAndSubtypes,
            cutoff: 500,
        }
    }
}

impl VocabConfig {
    /// Primary-type labelling with the given cutoff.
    #[must_use]
    pub fn primary_type(cutoff: usize) -> Self {
        Self {
            mode: LabelMode::PrimaryType,
            cutoff,
            ..Self::default()
        }
    }

    /// Multi-hot labelling over the given fields.
    #[must_use]
    pub fn multi_hot(source: LabelSource) -> Self {
        Self {
            mode: LabelMode::MultiHot,
            source,
            cutoff: 0,
        }
    }

    /// Set the frequency cutoff.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = cutoff;
        self
    }
}

/// Character sequence settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Pad/truncate length. `None` pads to the longest sequence.
    pub max_len: Option<usize>,

    /// Stride between next-character training windows (default: 3).
    pub window_step: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_len: Some(75),
            window_step: 3,
        }
    }
}

impl SequenceConfig {
    /// Set the pad/truncate length.
    #[must_use]
    pub fn with_max_len(mut self, max_len: Option<usize>) -> Self {
        self.max_len = max_len;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> PrepResult<()> {
        if self.window_step == 0 {
            return Err(PrepError::InvalidConfig(
                "window step must be at least 1".to_string(),
            ));
        }
        if self.max_len == Some(0) {
            return Err(PrepError::InvalidConfig(
                "sequence length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Train/test partition settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Probability that an example lands in the test set (default: 0.2).
    pub test_proportion: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_proportion: 0.2,
        }
    }
}

impl SplitConfig {
    /// Set the test proportion.
    #[must_use]
    pub fn with_test_proportion(mut self, test_proportion: f64) -> Self {
        self.test_proportion = test_proportion;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> PrepResult<()> {
        check_probability("test proportion", self.test_proportion)
    }
}

/// Complete pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for every random decision (sampling, partitioning).
    pub seed: u64,
    /// Art extraction.
    pub crop: CropConfig,
    /// Category encoding.
    pub vocab: VocabConfig,
    /// Character sequences.
    pub sequence: SequenceConfig,
    /// Train/test partition.
    pub split: SplitConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            crop: CropConfig::default(),
            vocab: VocabConfig::default(),
            sequence: SequenceConfig::default(),
            split: SplitConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Load a config from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> PrepResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> PrepResult<()> {
        self.crop.validate()?;
        self.sequence.validate()?;
        self.split.validate()
    }
}

fn check_probability(name: &str, value: f64) -> PrepResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PrepError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
