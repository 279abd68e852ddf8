//! Cut length bounds and segmentation parameters.

use komawari_error::{KomawariResult, PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// Targets below this are raised before deriving bounds.
const MIN_TARGET: usize = 80;

/// Soft and hard length bounds for cuts, derived from a target length.
///
/// # Examples
///
/// ```
/// use komawari_core::CutLengths;
///
/// let lengths = CutLengths::from_target(150);
/// assert_eq!(*lengths.ideal_min(), 112);
/// assert_eq!(*lengths.ideal_max(), 187);
/// assert_eq!(*lengths.hard_min(), 90);
/// assert_eq!(*lengths.hard_max(), 240);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct CutLengths {
    /// Target length after flooring
    target: usize,
    /// Lower bound of the ideal band
    ideal_min: usize,
    /// Upper bound of the ideal band
    ideal_max: usize,
    /// Shortest acceptable cut
    hard_min: usize,
    /// Longest acceptable cut; longer oracle texts are truncated
    hard_max: usize,
}

impl CutLengths {
    /// Derive the four bounds from a target length.
    pub fn from_target(target: usize) -> Self {
        let target = target.max(MIN_TARGET);
        let ideal_min = ratio(target, 3, 4).max(50);
        let ideal_max = ratio(target, 5, 4).max(ideal_min.saturating_add(30));
        let hard_min = ratio(target, 6, 10).max(40);
        let hard_max = ratio(target, 16, 10).max(hard_min.saturating_add(50));
        Self {
            target,
            ideal_min,
            ideal_max,
            hard_min,
            hard_max,
        }
    }
}

/// `⌊value · num / den⌋`, saturating instead of overflowing.
fn ratio(value: usize, num: usize, den: usize) -> usize {
    (value / den)
        .saturating_mul(num)
        .saturating_add(value % den * num / den)
}

/// Windowing and cut-length parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SegmentationConfig {
    /// Characters per oracle window
    #[serde(default = "default_window_size")]
    window_size: usize,
    /// Characters shared by consecutive windows
    #[serde(default = "default_overlap")]
    overlap: usize,
    /// Desired cut length in characters
    #[serde(default = "default_target_length")]
    target_length: usize,
}

fn default_window_size() -> usize {
    2000
}

fn default_overlap() -> usize {
    150
}

fn default_target_length() -> usize {
    150
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            overlap: default_overlap(),
            target_length: default_target_length(),
        }
    }
}

impl SegmentationConfig {
    /// Create a configuration. Call [`validate`](Self::validate) before use.
    pub fn new(window_size: usize, overlap: usize, target_length: usize) -> Self {
        Self {
            window_size,
            overlap,
            target_length,
        }
    }

    /// Replace the window size.
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Replace the overlap.
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Replace the target cut length.
    pub fn with_target_length(mut self, target_length: usize) -> Self {
        self.target_length = target_length;
        self
    }

    /// Length bounds derived from the target length.
    pub fn lengths(&self) -> CutLengths {
        CutLengths::from_target(self.target_length)
    }

    /// Check `0 < overlap < window_size` and a positive target length.
    ///
    /// # Examples
    ///
    /// ```
    /// use komawari_core::SegmentationConfig;
    ///
    /// assert!(SegmentationConfig::default().validate().is_ok());
    /// assert!(SegmentationConfig::new(300, 300, 150).validate().is_err());
    /// ```
    pub fn validate(&self) -> KomawariResult<()> {
        if self.overlap == 0 || self.overlap >= self.window_size {
            return Err(PipelineError::new(PipelineErrorKind::InvalidWindowing {
                size: self.window_size,
                overlap: self.overlap,
            })
            .into());
        }
        if self.target_length == 0 {
            return Err(PipelineError::new(PipelineErrorKind::InvalidTargetLength).into());
        }
        Ok(())
    }
}
