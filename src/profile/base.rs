//! Synthesis of reference (base) curves for regions loaded without an explicit hourly profile.
use crate::clock::HOURS_PER_DAY;
use crate::region::HourlyCurve;
use crate::source_type::SourceType;
use crate::units::Energy;
use rand::Rng;
use std::f64::consts::PI;

/// Lower bound of the wind random walk, as a fraction of the peak
const WIND_WALK_FLOOR: f64 = 0.2;

/// Starting point of the wind random walk, as a fraction of the peak
const WIND_WALK_START: f64 = 0.5;

/// Maximum size of a step of the wind random walk, as a fraction of the peak
const WIND_WALK_STEP: f64 = 0.1;

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn curve_from_fn<F: FnMut(usize) -> f64>(mut f: F) -> HourlyCurve {
    let mut curve = [Energy(0.0); HOURS_PER_DAY];
    for (hour, value) in curve.iter_mut().enumerate() {
        *value = Energy(round2(f(hour)));
    }

    curve
}

/// A daylight bell curve, zero from 18:00 until 06:00 and peaking at noon
fn solar_curve(peak: f64) -> HourlyCurve {
    curve_from_fn(|hour| ((hour as f64 - 6.0) * PI / 12.0).sin().max(0.0) * peak)
}

/// A bounded random walk starting at half the peak
fn wind_curve<R: Rng + ?Sized>(peak: f64, rng: &mut R) -> HourlyCurve {
    let mut value = WIND_WALK_START * peak;
    curve_from_fn(|_| {
        let step = (rng.gen_range(0.0..1.0) - 0.5) * WIND_WALK_STEP * peak;
        value = (value + step).clamp(WIND_WALK_FLOOR * peak, peak);
        value
    })
}

fn steady_curve(peak: f64) -> HourlyCurve {
    curve_from_fn(|_| peak)
}

/// Create the reference production curve for a region from its peak production
pub fn production_curve<R: Rng + ?Sized>(
    source_type: SourceType,
    peak: Energy,
    rng: &mut R,
) -> HourlyCurve {
    let peak = peak.value();
    if peak <= 0.0 {
        return [Energy(0.0); HOURS_PER_DAY];
    }

    match source_type {
        SourceType::Solar => solar_curve(peak),
        SourceType::Wind => wind_curve(peak, rng),
        _ => steady_curve(peak),
    }
}

/// Create the reference demand curve for a region from its peak demand.
///
/// Demand has a morning peak around 09:00, a larger evening peak around 19:00 and a dip in the
/// early hours.
pub fn demand_curve(peak: Energy) -> HourlyCurve {
    let peak = peak.value();
    curve_from_fn(|hour| {
        let h = hour as f64;
        let morning = 0.4 * (-(h - 9.0).powi(2) / 8.0).exp();
        let evening = 0.6 * (-(h - 19.0).powi(2) / 12.0).exp();
        let night = -0.2 * (-(h - 3.0).powi(2) / 4.0).exp();
        (0.4 + morning + evening + night) * peak
    })
}
