//! Per-window progress records handed to a progress sink.

use serde::{Deserialize, Serialize};

/// Why a window was segmented by the fallback splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum FallbackReason {
    /// The oracle call failed (network, timeout, HTTP status)
    #[display("oracle call failed: {}", _0)]
    CallFailed(String),
    /// No JSON array of records could be found in the response
    #[display("oracle response could not be parsed")]
    ParseFailed,
    /// The parsed array held no usable record
    #[display("oracle returned no usable records")]
    Empty,
}

/// How a window was turned into cuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowOutcome {
    /// Oracle labels were used
    Labeled {
        /// Cuts emitted for the window
        cuts: usize,
    },
    /// The fallback splitter was used
    Fallback {
        /// Cuts emitted for the window
        cuts: usize,
        /// Why the oracle output was not used
        reason: FallbackReason,
    },
}

impl WindowOutcome {
    /// Cuts emitted for the window.
    pub fn cuts(&self) -> usize {
        match self {
            WindowOutcome::Labeled { cuts } | WindowOutcome::Fallback { cuts, .. } => *cuts,
        }
    }

    /// Whether the fallback splitter produced the cuts.
    pub fn is_fallback(&self) -> bool {
        matches!(self, WindowOutcome::Fallback { .. })
    }
}

/// Notification sent after each window finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowProgress {
    /// Windows finished so far (1-based)
    pub completed: usize,
    /// Total windows in the run
    pub total: usize,
    /// Index of the window just finished
    pub window: usize,
    /// What happened to it
    pub outcome: WindowOutcome,
}

impl WindowProgress {
    /// Fraction of windows finished, in `0.0..=1.0`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
