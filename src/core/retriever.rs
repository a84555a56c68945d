// Signal retrieval: node lookup, fetch, correction and trimming

use crate::client::http::HttpTreeClient;
use crate::client::path_spec::PathSpec;
use crate::client::{TreeClient, TreeConnection};
use crate::core::channel::ChannelSpec;
use crate::core::constants::DENSITY_TO_PHASE;
use crate::core::correction::subtract_correction;
use crate::core::error::{BciError, RetrievalCause, Result};
use crate::core::signal::Signal;
use crate::core::trace::RawTrace;
use crate::core::window::{crop_bounds, TimeWindow, WindowPolicy};
use crate::models::config_model::{CorrectionSource, NominalTiming, RetrieverConfig, SegmentLayout};
use crate::utils::conf_helper;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info};

/// One retrieval: which channel, and optionally which part of the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRequest {
    pub channel: ChannelSpec,
    pub window: Option<TimeWindow>,
    pub policy: WindowPolicy,
}

impl SignalRequest {
    pub fn new(channel: ChannelSpec) -> Self {
        Self {
            channel,
            window: None,
            policy: WindowPolicy::default(),
        }
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_policy(mut self, policy: WindowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate loosely typed arguments. Nothing here touches the network.
    pub fn parse(
        shot: i32,
        chord: &str,
        beam: &str,
        tlim: Option<[f64; 2]>,
        vibration_subtracted: bool,
    ) -> Result<Self> {
        let channel = ChannelSpec::parse(shot, chord, beam, vibration_subtracted)?;
        let mut request = Self::new(channel);
        if let Some(tlim) = tlim {
            request.window = Some(TimeWindow::try_from(tlim)?);
        }
        Ok(request)
    }
}

pub struct SignalRetriever<C> {
    client: C,
    config: RetrieverConfig,
}

impl SignalRetriever<HttpTreeClient> {
    /// Retriever talking to the HTTP gateway named by `config.path_spec`.
    pub fn from_config(config: RetrieverConfig) -> Result<Self> {
        conf_helper::validate(&config)?;
        let spec: PathSpec = config.path_spec.parse()?;
        let client = HttpTreeClient::new(spec, config.timeout_secs.map(Duration::from_secs))?;
        Ok(Self::new(client, config))
    }
}

impl<C: TreeClient> SignalRetriever<C> {
    pub fn new(client: C, config: RetrieverConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn retrieve(&self, request: &SignalRequest) -> Result<Signal> {
        let channel = &request.channel;
        let window = request.window.as_ref();

        info!(
            "Loading {} {} phase data ({}) for shot {}",
            channel.chord(),
            channel.beam(),
            if channel.correction_requested() {
                "vibration-subtracted"
            } else {
                "raw"
            },
            channel.shot()
        );

        let source = &self.config.correction;
        let (values, fs, t0) = {
            let mut conn = self.client.open(&self.config.tree, channel.shot())?;

            let correction_node = channel.correction_node_path(source);
            let node = match (source, &correction_node) {
                (CorrectionSource::Density { .. }, Some(density)) => density.as_str(),
                _ => channel.node_path(),
            };
            let primary = self.read_trace(&mut conn, node, window, request.policy)?;
            let (fs, t0) = (primary.sample_rate(), primary.start_time());

            let values = match (source, correction_node) {
                (CorrectionSource::Subtract { .. }, Some(correction_node)) => {
                    let correction =
                        self.read_trace(&mut conn, &correction_node, window, request.policy)?;
                    subtract_correction(
                        &correction_node,
                        &primary,
                        &correction,
                        self.config.correction_tolerance,
                    )?
                }
                (CorrectionSource::Density { .. }, Some(_)) => primary
                    .into_samples()
                    .into_iter()
                    .map(|n| n * DENSITY_TO_PHASE)
                    .collect(),
                (_, None) => primary.into_samples(),
            };
            (values, fs, t0)
        };

        let (lo, hi) = match window {
            Some(window) => crop_bounds(values.len(), t0, fs, window, request.policy)?,
            None => (0, values.len() - 1),
        };

        // Michelson chords see the plasma twice
        let scale = if self.config.single_pass { 0.5 } else { 1.0 };
        let x: Vec<f64> = values[lo..=hi].iter().map(|v| v * scale).collect();

        debug!("Retrieved {} samples at {} Hz", x.len(), fs);

        Ok(Signal::new(channel, x, fs, t0 + (lo as f64 / fs)))
    }

    fn read_trace(
        &self,
        conn: &mut C::Connection,
        node: &str,
        window: Option<&TimeWindow>,
        policy: WindowPolicy,
    ) -> Result<RawTrace> {
        let Some(layout) = &self.config.segments else {
            let payload = conn.get_node(node)?;
            return RawTrace::from_payload(node, payload, self.config.timing.as_ref());
        };

        let timing = self
            .config
            .timing
            .ok_or_else(|| BciError::Config("segmented records need nominal timing".into()))?;
        let segments = segment_range(layout, &timing, window, policy)?;
        let first = *segments.start();
        let total = segments.clone().count();

        let mut samples = Vec::with_capacity(total * layout.samples_per_segment);
        for (i, segment) in segments.enumerate() {
            let name = format!("{}{}{}", node, layout.suffix, segment);
            debug!("Window {} ({} of {}) from {}", segment, i + 1, total, name);

            let payload = conn.get_node(&name)?;
            if payload.data.len() != layout.samples_per_segment {
                return Err(BciError::retrieval(
                    &name,
                    RetrievalCause::malformed(
                        &name,
                        format!(
                            "expected {} samples, got {}",
                            layout.samples_per_segment,
                            payload.data.len()
                        ),
                    ),
                ));
            }
            samples.extend(payload.data);
        }

        let start = timing.trigger_time + ((first * layout.samples_per_segment) as f64 / timing.sample_rate);
        RawTrace::new(samples, timing.sample_rate, start)
    }
}

/// Segments of a segmented record that hold samples within `window`.
pub fn segment_range(
    layout: &SegmentLayout,
    timing: &NominalTiming,
    window: Option<&TimeWindow>,
    policy: WindowPolicy,
) -> Result<RangeInclusive<usize>> {
    if layout.count == 0 || layout.samples_per_segment == 0 {
        return Err(BciError::Config("segment layout sizes must be non-zero".into()));
    }

    let Some(window) = window else {
        return Ok(0..=layout.count - 1);
    };

    let (lo, hi) = crop_bounds(
        layout.total_samples(),
        timing.trigger_time,
        timing.sample_rate,
        window,
        policy,
    )?;
    Ok((lo / layout.samples_per_segment)..=(hi / layout.samples_per_segment))
}

impl Signal {
    /// Retrieve a signal from loosely typed arguments.
    ///
    /// Chord and beam names are case-insensitive; `tlim` may be given in
    /// either order. `vibration_subtracted` is only valid for the CO2 beam.
    pub fn fetch<C: TreeClient>(
        retriever: &SignalRetriever<C>,
        shot: i32,
        chord: &str,
        beam: &str,
        tlim: Option<[f64; 2]>,
        vibration_subtracted: bool,
    ) -> Result<Signal> {
        let request = SignalRequest::parse(shot, chord, beam, tlim, vibration_subtracted)?;
        retriever.retrieve(&request)
    }
}
