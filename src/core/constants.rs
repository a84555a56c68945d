// Instrument constants for the bi-color interferometer

/// Nominal digitizer trigger time [s].
pub const NOMINAL_TRIGGER_TIME: f64 = -1.4986927509307861;

/// Nominal digitizer sample rate [samples / s].
pub const NOMINAL_SAMPLE_RATE: f64 = (5.0 / 3.0) * 1e6;

// Layout of the "ultrafast" record: 9 segments of 2^21 points each
pub const NOMINAL_SEGMENT_COUNT: usize = 9;
pub const NOMINAL_SAMPLES_PER_SEGMENT: usize = 1 << 21;
pub const SEGMENT_SUFFIX: &str = "_UF_";

/// Probe wavelengths [m].
pub const CO2_WAVELENGTH: f64 = 10.6e-6;
pub const HENE_WAVELENGTH: f64 = 0.633e-6;

// Node name prefixes: phase nodes carry the beam number, correction nodes the CO2 one
pub const PHASE_NODE_PREFIX: &str = "\\PL";
pub const CORRECTION_NODE_PREFIX: &str = "\\VIB";

/// Vibration-subtracted line-integrated density nodes, `<prefix><chord>`.
pub const DENSITY_NODE_PREFIX: &str = "\\DEN";

/// Classical electron radius [m].
pub const CLASSICAL_ELECTRON_RADIUS: f64 = 2.818e-15;

/// Line-integrated density [m / cm^3] to CO2 phase [rad].
pub const DENSITY_TO_PHASE: f64 = CLASSICAL_ELECTRON_RADIUS * CO2_WAVELENGTH * 1e6;

pub const DEFAULT_TREE: &str = "bci";

/// Largest sample-count difference tolerated between a primary trace and
/// its correction trace before alignment is refused.
pub const DEFAULT_CORRECTION_TOLERANCE: usize = 8;

/// Environment variable overriding the configured path specification.
pub const PATH_ENV_VAR: &str = "BCI_PATH";
