// Raw node payloads and timing derivation

use crate::core::error::{BciError, RetrievalCause, Result};
use crate::models::config_model::NominalTiming;
use serde::{Deserialize, Serialize};

/// Node payload as returned by the data gateway.
///
/// `time` is the node's dimension (time base), `rate` and `start` are
/// explicit timing attributes. Either form may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePayload {
    pub data: Vec<f64>,
    #[serde(default)]
    pub time: Vec<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub start: Option<f64>,
}

impl NodePayload {
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn with_rate(mut self, start: f64, rate: f64) -> Self {
        self.start = Some(start);
        self.rate = Some(rate);
        self
    }

    pub fn with_time(mut self, time: Vec<f64>) -> Self {
        self.time = time;
        self
    }
}

/// A uniformly sampled trace straight off the server.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrace {
    samples: Vec<f64>,
    sample_rate: f64,
    start_time: f64,
}

impl RawTrace {
    pub fn new(samples: Vec<f64>, sample_rate: f64, start_time: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(BciError::invalid("trace must hold at least one sample"));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(BciError::invalid(format!(
                "sample rate must be positive, got {}",
                sample_rate
            )));
        }
        if !start_time.is_finite() {
            return Err(BciError::invalid("start time must be finite"));
        }

        Ok(Self {
            samples,
            sample_rate,
            start_time,
        })
    }

    /// Build a trace from a node payload, deriving timing from the explicit
    /// rate attribute, then the first two time-base values, then `fallback`.
    pub fn from_payload(
        node: &str,
        payload: NodePayload,
        fallback: Option<&NominalTiming>,
    ) -> Result<Self> {
        let malformed =
            |reason: String| BciError::retrieval(node, RetrievalCause::malformed(node, reason));

        if payload.data.is_empty() {
            return Err(malformed("node holds no samples".into()));
        }

        let (start_time, sample_rate) = match (payload.rate, payload.time.as_slice()) {
            (Some(rate), time) => {
                let start = payload
                    .start
                    .or_else(|| time.first().copied())
                    .or_else(|| fallback.map(|f| f.trigger_time))
                    .ok_or_else(|| malformed("rate given without a start time".into()))?;
                (start, rate)
            }
            (None, [t0, t1, ..]) => (*t0, 1.0 / (t1 - t0)),
            (None, _) => match fallback {
                Some(nominal) => (payload.start.unwrap_or(nominal.trigger_time), nominal.sample_rate),
                None => return Err(malformed("no timing metadata".into())),
            },
        };

        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(malformed(format!("derived sample rate {} is not positive", sample_rate)));
        }
        if !start_time.is_finite() {
            return Err(malformed(format!("derived start time {} is not finite", start_time)));
        }

        Ok(Self {
            samples: payload.data,
            sample_rate,
            start_time,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of sample `index`.
    pub fn time_at(&self, index: usize) -> f64 {
        self.start_time + (index as f64 / self.sample_rate)
    }

    pub fn last_time(&self) -> f64 {
        self.time_at(self.samples.len() - 1)
    }
}
