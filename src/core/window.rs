// Time windows and sample index arithmetic

use crate::core::error::{BciError, Result};
use serde::{Deserialize, Serialize};

/// Offsets (in samples) this close to a digitization time count as on it.
const GRID_EPSILON: f64 = 1e-6;

/// Closed time interval `[start, end]` in seconds. Infinite bounds leave
/// that side open.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Result<Self> {
        if start.is_nan() || end.is_nan() {
            return Err(BciError::invalid("time window bounds must not be NaN"));
        }
        if start > end {
            return Err(BciError::invalid(format!(
                "time window start {} exceeds end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Accepts the bounds in either order.
    pub fn sorted(a: f64, b: f64) -> Result<Self> {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn from_slice(tlim: &[f64]) -> Result<Self> {
        match tlim {
            [a, b] => Self::sorted(*a, *b),
            _ => Err(BciError::invalid(format!(
                "time window needs exactly two bounds, got {}",
                tlim.len()
            ))),
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }
}

impl TryFrom<[f64; 2]> for TimeWindow {
    type Error = BciError;

    fn try_from(tlim: [f64; 2]) -> Result<Self> {
        Self::sorted(tlim[0], tlim[1])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rounding {
    Nearest,
    Floor,
    Ceil,
}

impl Rounding {
    fn apply(self, x: f64) -> f64 {
        let snapped = x.round();
        if (x - snapped).abs() < GRID_EPSILON {
            return snapped;
        }
        match self {
            Rounding::Nearest => snapped,
            Rounding::Floor => x.floor(),
            Rounding::Ceil => x.ceil(),
        }
    }
}

/// How window bounds map onto sample indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Both bounds round to the nearest sample.
    #[default]
    Nearest,
    /// Start rounds up and end rounds down, so every retained sample lies
    /// inside the window.
    Bracket,
}

impl WindowPolicy {
    fn roundings(self) -> (Rounding, Rounding) {
        match self {
            WindowPolicy::Nearest => (Rounding::Nearest, Rounding::Nearest),
            WindowPolicy::Bracket => (Rounding::Ceil, Rounding::Floor),
        }
    }
}

/// Unclipped index of time `t` on the grid `t0 + i / fs`.
fn raw_index(t: f64, t0: f64, fs: f64, mode: Rounding) -> f64 {
    mode.apply(fs * (t - t0))
}

/// Index of the digitized point closest to `t`, subject to `mode`, clipped
/// to `[0, len - 1]`.
pub fn closest_index(t: f64, t0: f64, fs: f64, len: usize, mode: Rounding) -> usize {
    let last = len.saturating_sub(1) as f64;
    raw_index(t, t0, fs, mode).clamp(0.0, last) as usize
}

/// Inclusive `[first, last]` sample indices of a record with `len` samples
/// starting at `t0` that fall within `window`.
pub fn crop_bounds(
    len: usize,
    t0: f64,
    fs: f64,
    window: &TimeWindow,
    policy: WindowPolicy,
) -> Result<(usize, usize)> {
    let last = len.saturating_sub(1) as f64;
    let empty = || BciError::EmptyWindow {
        start: window.start,
        end: window.end,
        first: t0,
        last: t0 + last / fs,
    };

    // Disjoint from the record, however close to an edge
    if len == 0
        || fs * (window.end - t0) < -GRID_EPSILON
        || fs * (window.start - t0) - last > GRID_EPSILON
    {
        return Err(empty());
    }

    let (start_mode, end_mode) = policy.roundings();
    let lo = raw_index(window.start, t0, fs, start_mode);
    let hi = raw_index(window.end, t0, fs, end_mode);

    if hi < 0.0 || lo > last || lo > hi {
        return Err(empty());
    }

    Ok((lo.max(0.0) as usize, hi.min(last) as usize))
}
