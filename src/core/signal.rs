// The retrieved signal handed to downstream analysis

use crate::core::channel::{Beam, ChannelSpec, Chord};
use crate::core::error::Result;
use crate::core::window::{crop_bounds, TimeWindow, WindowPolicy};
use serde::Serialize;

/// Single-pass phase signal of one chord and beam.
///
/// `x[i]` is the signal at time `t0 + i / Fs`. The time base is generated
/// on demand by [`Signal::t`] rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    shot: i32,
    chord: Chord,
    beam: Beam,
    /// Phase samples [rad].
    x: Vec<f64>,
    /// Sample rate [samples / s].
    #[serde(rename = "Fs")]
    fs: f64,
    /// Time of `x[0]` [s].
    t0: f64,
    vibration_subtracted: bool,
}

impl Signal {
    pub(crate) fn new(channel: &ChannelSpec, x: Vec<f64>, fs: f64, t0: f64) -> Self {
        Self {
            shot: channel.shot(),
            chord: channel.chord(),
            beam: channel.beam(),
            x,
            fs,
            t0,
            vibration_subtracted: channel.correction_requested(),
        }
    }

    pub fn shot(&self) -> i32 {
        self.shot
    }

    pub fn chord(&self) -> Chord {
        self.chord
    }

    pub fn beam(&self) -> Beam {
        self.beam
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn fs(&self) -> f64 {
        self.fs
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    pub fn vibration_subtracted(&self) -> bool {
        self.vibration_subtracted
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.x
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn sample_period(&self) -> f64 {
        1.0 / self.fs
    }

    /// Times for points in `x`.
    pub fn t(&self) -> Vec<f64> {
        (0..self.x.len())
            .map(|i| self.t0 + (i as f64 / self.fs))
            .collect()
    }

    pub fn last_time(&self) -> f64 {
        self.t0 + (self.x.len().saturating_sub(1) as f64 / self.fs)
    }

    /// Narrow the signal to `window`, the same way retrieval trims.
    pub fn trim(&self, window: &TimeWindow, policy: WindowPolicy) -> Result<Signal> {
        let (lo, hi) = crop_bounds(self.x.len(), self.t0, self.fs, window, policy)?;
        Ok(Signal {
            shot: self.shot,
            chord: self.chord,
            beam: self.beam,
            x: self.x[lo..=hi].to_vec(),
            fs: self.fs,
            t0: self.t0 + (lo as f64 / self.fs),
            vibration_subtracted: self.vibration_subtracted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::BciError;

    fn ramp(n: usize, fs: f64, t0: f64) -> Signal {
        Signal {
            shot: 169572,
            chord: Chord::V2,
            beam: Beam::CO2,
            x: (0..n).map(|i| i as f64).collect(),
            fs,
            t0,
            vibration_subtracted: false,
        }
    }

    #[test]
    fn test_time_base() {
        let sig = ramp(4, 4.0, -1.0);
        assert_eq!(sig.t(), vec![-1.0, -0.75, -0.5, -0.25]);
        assert_eq!(sig.last_time(), -0.25);
        assert_eq!(sig.t().len(), sig.len());
    }

    #[test]
    fn test_trim_updates_start_time() {
        let sig = ramp(100, 10.0, 0.0);
        let window = TimeWindow::new(2.0, 3.0).unwrap();
        let trimmed = sig.trim(&window, WindowPolicy::Nearest).unwrap();
        assert_eq!(trimmed.x.first(), Some(&20.0));
        assert_eq!(trimmed.x.last(), Some(&30.0));
        assert_eq!(trimmed.t0, 2.0);
        assert_eq!(trimmed.shot, sig.shot);
    }

    #[test]
    fn test_trim_outside_is_empty_window() {
        let sig = ramp(100, 10.0, 0.0);
        let window = TimeWindow::new(20.0, 30.0).unwrap();
        assert!(matches!(
            sig.trim(&window, WindowPolicy::Nearest),
            Err(BciError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_constructed_from_channel() {
        let channel = ChannelSpec::new(169572, Chord::R0, Beam::CO2, true).unwrap();
        let sig = Signal::new(&channel, vec![1.0, 2.0], 4.0, 0.25);
        assert_eq!((sig.shot(), sig.chord(), sig.beam()), (169572, Chord::R0, Beam::CO2));
        assert!(sig.vibration_subtracted());
        assert_eq!(sig.x(), &[1.0, 2.0]);
        assert_eq!((sig.fs(), sig.t0()), (4.0, 0.25));
        assert_eq!(sig.into_samples(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_serializes_downstream_field_names() {
        let value = serde_json::to_value(ramp(2, 8.0, 0.5)).unwrap();
        assert_eq!(value["Fs"], 8.0);
        assert_eq!(value["t0"], 0.5);
        assert_eq!(value["x"], serde_json::json!([0.0, 1.0]));
        assert_eq!(value["chord"], "V2");
    }
}
