use serde::{Deserialize, Serialize};

use crate::core::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// `host::template[;template...]`
    pub path_spec: String,
    #[serde(default = "default_tree")]
    pub tree: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_single_pass")]
    pub single_pass: bool,
    #[serde(default = "default_correction_tolerance")]
    pub correction_tolerance: usize,
    #[serde(default)]
    pub timing: Option<NominalTiming>,
    #[serde(default)]
    pub segments: Option<SegmentLayout>,
    #[serde(default)]
    pub correction: CorrectionSource,
}

impl RetrieverConfig {
    pub fn new(path_spec: impl Into<String>) -> Self {
        Self {
            path_spec: path_spec.into(),
            tree: default_tree(),
            timeout_secs: None,
            single_pass: default_single_pass(),
            correction_tolerance: default_correction_tolerance(),
            timing: None,
            segments: None,
            correction: CorrectionSource::default(),
        }
    }
}

/// Digitizer timing used when a node carries no timing of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NominalTiming {
    pub trigger_time: f64,
    pub sample_rate: f64,
}

impl NominalTiming {
    /// The interferometer digitizer's trigger time and rate.
    pub fn bci() -> Self {
        Self {
            trigger_time: NOMINAL_TRIGGER_TIME,
            sample_rate: NOMINAL_SAMPLE_RATE,
        }
    }
}

/// A record split across `count` nodes of `samples_per_segment` points,
/// named `<node><suffix><n>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentLayout {
    pub count: usize,
    pub samples_per_segment: usize,
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl SegmentLayout {
    /// The "ultrafast" record layout.
    pub fn bci() -> Self {
        Self {
            count: NOMINAL_SEGMENT_COUNT,
            samples_per_segment: NOMINAL_SAMPLES_PER_SEGMENT,
            suffix: default_suffix(),
        }
    }

    pub fn total_samples(&self) -> usize {
        self.count * self.samples_per_segment
    }
}

/// Where vibration-subtracted CO2 data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CorrectionSource {
    /// Subtract the reference trace `<node_prefix><beam#><chord>` from the
    /// phase trace.
    Subtract {
        #[serde(default = "default_correction_prefix")]
        node_prefix: String,
    },
    /// Read the line-integrated density `<node_prefix><chord>`, already
    /// free of vibration, and convert it to phase.
    Density {
        #[serde(default = "default_density_prefix")]
        node_prefix: String,
    },
}

impl Default for CorrectionSource {
    fn default() -> Self {
        CorrectionSource::Subtract {
            node_prefix: default_correction_prefix(),
        }
    }
}

impl CorrectionSource {
    pub fn node_prefix(&self) -> &str {
        match self {
            CorrectionSource::Subtract { node_prefix }
            | CorrectionSource::Density { node_prefix } => node_prefix,
        }
    }
}

fn default_tree() -> String {
    DEFAULT_TREE.to_string()
}

fn default_single_pass() -> bool {
    true
}

fn default_correction_tolerance() -> usize {
    DEFAULT_CORRECTION_TOLERANCE
}

fn default_suffix() -> String {
    SEGMENT_SUFFIX.to_string()
}

fn default_correction_prefix() -> String {
    CORRECTION_NODE_PREFIX.to_string()
}

fn default_density_prefix() -> String {
    DENSITY_NODE_PREFIX.to_string()
}
