//! Derivation of hourly production and demand curves for a given month.
//!
//! Production is modelled per source type: a solar zenith angle model for solar, a seasonal
//! factor with random hourly gusts for wind, a purely seasonal factor for hydro and a constant
//! capacity factor for everything else. Demand is the region's reference demand curve scaled by a
//! seasonal factor peaking mid-year.
//!
//! Wind is the only source of randomness. The random number generator is supplied by the caller,
//! so seeding it makes the whole computation reproducible.
use crate::clock::{HOURS_PER_DAY, Month};
use crate::network::Network;
use crate::region::{HourlyCurve, Region};
use crate::source_type::SourceType;
use crate::units::Energy;
use log::debug;
use rand::Rng;
use std::f64::consts::PI;

pub mod base;

/// Maximum solar declination (degrees)
const SOLAR_DECLINATION_DEGREES: f64 = 23.45;

/// Day-of-year offset used in the declination formula
const DECLINATION_DAY_OFFSET: f64 = 284.0;

/// Clear-sky scaling applied to the solar peak
const SOLAR_CLEAR_SKY_FACTOR: f64 = 1.1;

/// Range of the random hourly factor applied to wind output
const WIND_HOURLY_FACTOR_MIN: f64 = 0.8;
const WIND_HOURLY_FACTOR_MAX: f64 = 1.2;

/// Production and demand for every hour of the day
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfiles {
    /// Production for each hour
    pub production: HourlyCurve,
    /// Demand for each hour
    pub demand: HourlyCurve,
}

/// Approximate day of the year for the middle of the given month
fn mid_month_day(month: Month) -> f64 {
    month.as_f64() * 30.0 + 15.0
}

/// The solar declination for the given month (radians)
fn solar_declination(month: Month) -> f64 {
    SOLAR_DECLINATION_DEGREES.to_radians()
        * (2.0 * PI * (DECLINATION_DAY_OFFSET + mid_month_day(month)) / 365.0).sin()
}

/// Calculate the solar zenith angle (radians).
///
/// # Arguments
///
/// * `lat` - Latitude in degrees
/// * `month` - The month of the year
/// * `hour` - Hour of the day (0–23)
pub fn zenith_angle(lat: f64, month: Month, hour: usize) -> f64 {
    let phi = lat.to_radians();
    let delta = solar_declination(month);
    let hour_angle = (hour as f64 - 12.0) * PI / 12.0;
    let cos_zenith = phi.sin() * delta.sin() + phi.cos() * delta.cos() * hour_angle.cos();
    cos_zenith.clamp(-1.0, 1.0).acos()
}

/// Solar output for one hour: zero while the sun is below the horizon
fn solar_output(peak: f64, lat: f64, month: Month, hour: usize) -> f64 {
    let cos_zenith = zenith_angle(lat, month, hour).cos();
    if cos_zenith <= 0.0 {
        return 0.0;
    }

    peak * SOLAR_CLEAR_SKY_FACTOR * cos_zenith
}

/// Wind output for one hour, with a random hourly factor
fn wind_output<R: Rng + ?Sized>(peak: f64, month: Month, rng: &mut R) -> f64 {
    let monthly_factor = 1.0 + 0.2 * (2.0 * PI * month.as_f64() / 12.0).sin();
    let hourly_factor = rng.gen_range(WIND_HOURLY_FACTOR_MIN..WIND_HOURLY_FACTOR_MAX);
    peak * monthly_factor * hourly_factor
}

/// Hydro output, which varies with river flow over the year but not over the day
fn hydro_output(peak: f64, month: Month) -> f64 {
    let monthly_factor = 0.7 + 0.5 * (2.0 * PI * month.as_f64() / 12.0).sin();
    peak * monthly_factor
}

/// Output of thermal-like plant, which run at a constant capacity factor
fn thermal_output(peak: f64, source_type: SourceType) -> f64 {
    peak * source_type.capacity_factor()
}

/// Seasonal scaling for demand, peaking in mid-year
pub fn seasonal_demand_factor(month: Month) -> f64 {
    1.0 + 0.3 * (2.0 * PI * (month.as_f64() - 6.0) / 12.0).sin()
}

/// Calculate hourly production and demand for a region in the given month.
///
/// The peaks of the region's reference curves are used as the basis for production, along with
/// its source type and latitude. A region with no production capacity produces nothing in any
/// hour, whatever its type. All values are rounded to the nearest whole unit.
///
/// The region itself is not modified; callers decide whether to store the result.
pub fn compute_profiles<R: Rng + ?Sized>(
    region: &Region,
    month: Month,
    rng: &mut R,
) -> HourlyProfiles {
    let lat = region.position.lat;
    let peak = region.peak_production().value();
    let demand_factor = seasonal_demand_factor(month);

    let mut production = [Energy(0.0); HOURS_PER_DAY];
    let mut demand = [Energy(0.0); HOURS_PER_DAY];
    for hour in 0..HOURS_PER_DAY {
        if peak > 0.0 {
            let value = match region.source_type {
                SourceType::Solar => solar_output(peak, lat, month, hour),
                SourceType::Wind => wind_output(peak, month, rng),
                SourceType::Hydro => hydro_output(peak, month),
                other => thermal_output(peak, other),
            };
            production[hour] = Energy(value.round());
        }

        demand[hour] = Energy((region.base_demand[hour].value() * demand_factor).round());
    }

    HourlyProfiles { production, demand }
}

/// Recompute and store the hourly curves of every region in the network for a new month
pub fn apply_month<R: Rng + ?Sized>(network: &mut Network, month: Month, rng: &mut R) {
    debug!("Computing hourly profiles for month {month}");
    for region in network.regions.values_mut() {
        let profiles = compute_profiles(region, month, rng);
        region.hourly_production = profiles.production;
        region.hourly_demand = profiles.demand;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{region_with_curves, rng};
    use float_cmp::assert_approx_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    fn month(m: u32) -> Month {
        Month::new(m).unwrap()
    }

    #[test]
    fn test_zenith_angle_noon_equator() {
        // At the equator at noon, the zenith angle is equal to the magnitude of the declination
        let m = month(2);
        let expected = solar_declination(m).abs();
        assert_approx_eq!(f64, zenith_angle(0.0, m, 12), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_zenith_angle_midnight_below_horizon() {
        assert!(zenith_angle(30.0, month(6), 0) > PI / 2.0);
    }

    #[test]
    fn test_declination_sign() {
        // Northern summer: positive declination; northern winter: negative
        assert!(solar_declination(month(5)) > 0.0);
        assert!(solar_declination(month(11)) < 0.0);
    }

    #[rstest]
    fn test_solar_profile(mut rng: StdRng) {
        let region = region_with_curves(SourceType::Solar, 32.0, 1000.0, 0.0);
        let profiles = compute_profiles(&region, month(6), &mut rng);

        // Dark at night
        assert_eq!(profiles.production[0], Energy(0.0));
        assert_eq!(profiles.production[23], Energy(0.0));

        // Highest at noon, and symmetrical around it
        let noon = profiles.production[12];
        assert!(profiles.production.iter().all(|&p| p <= noon));
        assert_eq!(profiles.production[9], profiles.production[15]);

        let expected = (1000.0 * 1.1 * zenith_angle(32.0, month(6), 12).cos()).round();
        assert_eq!(noon, Energy(expected));
    }

    #[rstest]
    fn test_wind_profile_bounds(mut rng: StdRng) {
        let region = region_with_curves(SourceType::Wind, 32.0, 1000.0, 0.0);
        let m = month(3);
        let monthly_factor = 1.0 + 0.2 * (2.0 * PI * 3.0 / 12.0).sin();
        let profiles = compute_profiles(&region, m, &mut rng);
        for value in profiles.production {
            assert!(value.value() >= (1000.0 * monthly_factor * 0.8).round());
            assert!(value.value() <= (1000.0 * monthly_factor * 1.2).round());
        }
    }

    #[test]
    fn test_wind_profile_reproducible_with_seed() {
        let region = region_with_curves(SourceType::Wind, 32.0, 1000.0, 500.0);
        let first = compute_profiles(&region, month(4), &mut StdRng::seed_from_u64(7));
        let second = compute_profiles(&region, month(4), &mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(0, 700.0)]
    #[case(3, 1200.0)]
    #[case(9, 200.0)]
    fn test_hydro_profile(#[case] m: u32, #[case] expected: f64, mut rng: StdRng) {
        let region = region_with_curves(SourceType::Hydro, 32.0, 1000.0, 0.0);
        let profiles = compute_profiles(&region, month(m), &mut rng);
        assert!(profiles.production.iter().all(|&p| p == Energy(expected)));
    }

    #[rstest]
    #[case(SourceType::Nuclear, 900.0)]
    #[case(SourceType::Biomass, 600.0)]
    #[case(SourceType::Coal, 700.0)]
    #[case(SourceType::Gas, 700.0)]
    #[case(SourceType::Geothermal, 700.0)]
    fn test_thermal_profile(
        #[case] source_type: SourceType,
        #[case] expected: f64,
        mut rng: StdRng,
    ) {
        let region = region_with_curves(source_type, 32.0, 1000.0, 0.0);
        let profiles = compute_profiles(&region, month(1), &mut rng);
        assert!(profiles.production.iter().all(|&p| p == Energy(expected)));
    }

    #[rstest]
    #[case(SourceType::Solar)]
    #[case(SourceType::Wind)]
    #[case(SourceType::Hydro)]
    #[case(SourceType::Nuclear)]
    #[case(SourceType::Hospital)]
    fn test_zero_peak_means_no_production(#[case] source_type: SourceType, mut rng: StdRng) {
        let region = region_with_curves(source_type, 32.0, 0.0, 100.0);
        let profiles = compute_profiles(&region, month(6), &mut rng);
        assert!(profiles.production.iter().all(|&p| p == Energy(0.0)));
    }

    #[rstest]
    #[case(0, 1.0)]
    #[case(3, 0.7)]
    #[case(6, 1.0)]
    #[case(9, 1.3)]
    fn test_seasonal_demand_factor(#[case] m: u32, #[case] expected: f64) {
        assert_approx_eq!(
            f64,
            seasonal_demand_factor(month(m)),
            expected,
            epsilon = 1e-12
        );
    }

    #[rstest]
    fn test_demand_profile(mut rng: StdRng) {
        let region = region_with_curves(SourceType::Hospital, 32.0, 0.0, 1000.0);
        let profiles = compute_profiles(&region, month(9), &mut rng);
        assert!(profiles.demand.iter().all(|&d| d == Energy(1300.0)));
    }

    #[rstest]
    fn test_compute_profiles_idempotent(mut rng: StdRng) {
        let region = region_with_curves(SourceType::Solar, 25.0, 1500.0, 800.0);
        let first = compute_profiles(&region, month(8), &mut rng);
        let second = compute_profiles(&region, month(8), &mut rng);
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_apply_month_does_not_compound(mut rng: StdRng) {
        let region = region_with_curves(SourceType::Hydro, 32.0, 1000.0, 1000.0);
        let mut network = Network::new(
            [(region.id.clone(), region)].into_iter().collect(),
            Default::default(),
        )
        .unwrap();

        apply_month(&mut network, month(3), &mut rng);
        apply_month(&mut network, month(3), &mut rng);
        let region = &network.regions[0];
        assert_eq!(region.hourly_production[0], Energy(1200.0));
        assert_eq!(region.hourly_demand[0], Energy(700.0));
        assert_eq!(region.base_production[0], Energy(1000.0));
        assert_eq!(region.base_demand[0], Energy(1000.0));
    }
}
