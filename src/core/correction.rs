// Vibration correction: alignment, subtraction and two-color phase

use crate::core::error::{BciError, RetrievalCause, Result};
use crate::core::trace::RawTrace;
use crate::core::window::{closest_index, Rounding};
use tracing::{debug, warn};

/// Relative tolerance for treating two time bases as identical.
const TIMING_TOLERANCE: f64 = 1e-9;

/// Float noise allowed on top of the overhang tolerance [samples].
const ALIGNMENT_SLACK: f64 = 1e-6;

fn same_time_base(a: &RawTrace, b: &RawTrace) -> bool {
    let period = 1.0 / a.sample_rate();
    a.len() == b.len()
        && ((a.sample_rate() - b.sample_rate()) / a.sample_rate()).abs() < TIMING_TOLERANCE
        && (a.start_time() - b.start_time()).abs() < period * 1e-3
}

/// Samples by which `t` falls outside the span of `trace`.
fn overhang(trace: &RawTrace, t: f64) -> f64 {
    let offset = (t - trace.start_time()) * trace.sample_rate();
    let last = (trace.len() - 1) as f64;
    if offset < 0.0 {
        -offset
    } else {
        (offset - last).max(0.0)
    }
}

/// Subtract `correction` from `primary` pointwise.
///
/// When the two traces do not share a time base, each primary sample is
/// paired with the correction sample nearest in time. Traces whose lengths
/// differ by more than `tolerance` samples, or whose spans are more than
/// `tolerance` correction samples apart at either end, are refused.
pub fn subtract_correction(
    node: &str,
    primary: &RawTrace,
    correction: &RawTrace,
    tolerance: usize,
) -> Result<Vec<f64>> {
    if same_time_base(primary, correction) {
        debug!("{}: correction shares the primary time base", node);
        return Ok(primary
            .samples()
            .iter()
            .zip(correction.samples())
            .map(|(p, c)| p - c)
            .collect());
    }

    if primary.len().abs_diff(correction.len()) > tolerance {
        return Err(BciError::retrieval(
            node,
            RetrievalCause::CorrectionMismatch {
                primary: primary.len(),
                correction: correction.len(),
                tolerance,
            },
        ));
    }

    let worst = overhang(correction, primary.start_time())
        .max(overhang(correction, primary.last_time()));
    if worst - tolerance as f64 > ALIGNMENT_SLACK {
        return Err(BciError::retrieval(
            node,
            RetrievalCause::CorrectionMisaligned {
                overhang: worst,
                tolerance,
            },
        ));
    }

    warn!(
        "{}: aligning correction ({} samples) to primary ({} samples) by nearest index",
        node,
        correction.len(),
        primary.len()
    );

    let reference = correction.samples();
    Ok(primary
        .samples()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let j = closest_index(
                primary.time_at(i),
                correction.start_time(),
                correction.sample_rate(),
                reference.len(),
                Rounding::Nearest,
            );
            p - reference[j]
        })
        .collect())
}

/// Plasma-induced part of phase `ph1` (wavelength `lambda1`), using phase
/// `ph2` measured at `lambda2` to cancel the vibrational contribution.
pub fn plasma_induced_phase(ph1: &[f64], ph2: &[f64], lambda1: f64, lambda2: f64) -> Result<Vec<f64>> {
    if ph1.len() != ph2.len() {
        return Err(BciError::invalid(format!(
            "phase arrays differ in length ({} vs {})",
            ph1.len(),
            ph2.len()
        )));
    }
    let den = (lambda1 * lambda1) - (lambda2 * lambda2);
    if den == 0.0 {
        return Err(BciError::invalid("wavelengths must differ"));
    }

    Ok(ph1
        .iter()
        .zip(ph2)
        .map(|(p1, p2)| lambda1 * ((lambda1 * p1) - (lambda2 * p2)) / den)
        .collect())
}
