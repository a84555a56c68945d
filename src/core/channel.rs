// Chord / beam naming and the node lookup table

use crate::core::constants::*;
use crate::core::error::{BciError, Result};
use crate::models::config_model::CorrectionSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A viewing line of the interferometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chord {
    V1,
    V2,
    V3,
    R0,
}

impl Chord {
    pub const ALL: [Chord; 4] = [Chord::V1, Chord::V2, Chord::V3, Chord::R0];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chord::V1 => "V1",
            Chord::V2 => "V2",
            Chord::V3 => "V3",
            Chord::R0 => "R0",
        }
    }
}

impl FromStr for Chord {
    type Err = BciError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "V1" => Ok(Chord::V1),
            "V2" => Ok(Chord::V2),
            "V3" => Ok(Chord::V3),
            "R0" => Ok(Chord::R0),
            _ => Err(BciError::invalid(format!(
                "chord `{}` is not one of V1, V2, V3, R0",
                s
            ))),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe beam wavelength channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Beam {
    CO2,
    HeNe,
}

impl Beam {
    pub const ALL: [Beam; 2] = [Beam::CO2, Beam::HeNe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Beam::CO2 => "CO2",
            Beam::HeNe => "HeNe",
        }
    }

    /// Nodes are keyed by a beam number rather than the beam name.
    pub fn node_number(&self) -> u8 {
        match self {
            Beam::CO2 => 1,
            Beam::HeNe => 2,
        }
    }

    pub fn wavelength(&self) -> f64 {
        match self {
            Beam::CO2 => CO2_WAVELENGTH,
            Beam::HeNe => HENE_WAVELENGTH,
        }
    }

    pub fn supports_correction(&self) -> bool {
        matches!(self, Beam::CO2)
    }
}

impl FromStr for Beam {
    type Err = BciError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CO2" => Ok(Beam::CO2),
            "HENE" => Ok(Beam::HeNe),
            _ => Err(BciError::invalid(format!(
                "beam `{}` is not one of CO2, HeNe",
                s
            ))),
        }
    }
}

impl fmt::Display for Beam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated channel selection for one shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    shot: i32,
    chord: Chord,
    beam: Beam,
    correction: bool,
}

impl ChannelSpec {
    pub fn new(shot: i32, chord: Chord, beam: Beam, correction: bool) -> Result<Self> {
        if correction && !beam.supports_correction() {
            return Err(BciError::invalid(format!(
                "no correction data exists for the {} beam",
                beam
            )));
        }

        Ok(Self {
            shot,
            chord,
            beam,
            correction,
        })
    }

    pub fn parse(shot: i32, chord: &str, beam: &str, correction: bool) -> Result<Self> {
        Self::new(shot, chord.parse()?, beam.parse()?, correction)
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

    pub fn correction_requested(&self) -> bool {
        self.correction
    }

    pub fn node_path(&self) -> &'static str {
        node_path(self.chord, self.beam)
    }

    /// The node read for the correction, if one was requested.
    pub fn correction_node_path(&self, source: &CorrectionSource) -> Option<String> {
        if !self.correction {
            return None;
        }
        match source {
            CorrectionSource::Subtract { node_prefix } => {
                correction_node_path(self.chord, self.beam, node_prefix)
            }
            CorrectionSource::Density { node_prefix } => {
                Some(density_node_path(self.chord, node_prefix))
            }
        }
    }
}

// One entry per valid (chord, beam) combination
pub fn node_path(chord: Chord, beam: Beam) -> &'static str {
    match (chord, beam) {
        (Chord::V1, Beam::CO2) => "\\PL1V1",
        (Chord::V2, Beam::CO2) => "\\PL1V2",
        (Chord::V3, Beam::CO2) => "\\PL1V3",
        (Chord::R0, Beam::CO2) => "\\PL1R0",
        (Chord::V1, Beam::HeNe) => "\\PL2V1",
        (Chord::V2, Beam::HeNe) => "\\PL2V2",
        (Chord::V3, Beam::HeNe) => "\\PL2V3",
        (Chord::R0, Beam::HeNe) => "\\PL2R0",
    }
}

/// Vibration reference nodes exist for the CO2 beam only.
pub fn correction_node_path(chord: Chord, beam: Beam, prefix: &str) -> Option<String> {
    if !beam.supports_correction() {
        return None;
    }
    Some(format!("{}{}{}", prefix, beam.node_number(), chord))
}

pub fn density_node_path(chord: Chord, prefix: &str) -> String {
    format!("{}{}", prefix, chord)
}
