use serde::Deserialize;

use crate::error::ValidationError;
use crate::tables::{TrafficLevel, VehicleType};

pub const FEATURE_COUNT: usize = 7;

/// Column order the regression model was fit on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "distance",
    "avg_speed",
    "vehicle_weight",
    "traffic_impact",
    "congestion_factor",
    "effective_speed",
    "stress_score",
];

/// One route as it arrives over the wire. Labels stay untyped here so an
/// unknown category is reported against its field instead of failing decode.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteInput {
    pub distance: f64,
    pub avg_speed: f64,
    pub vehicle: String,
    pub traffic: String,
}

/// A validated route: positive finite distance (km) and speed (km/h),
/// vehicle and traffic drawn from their closed sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteObservation {
    distance: f64,
    avg_speed: f64,
    vehicle: VehicleType,
    traffic: TrafficLevel,
}

impl RouteObservation {
    pub fn new(
        distance: f64,
        avg_speed: f64,
        vehicle: VehicleType,
        traffic: TrafficLevel,
    ) -> Result<Self, ValidationError> {
        let route = Self {
            distance: positive("distance", distance)?,
            avg_speed: positive("avg_speed", avg_speed)?,
            vehicle,
            traffic,
        };
        // stress_score is the largest derived column; it scales with distance.
        if !derive_features(&route).stress_score().is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "distance",
                value: distance,
            });
        }
        Ok(route)
    }

    /// Build an observation from a leg returned by a routing service
    /// (metres and seconds). Traffic is inferred from the resulting speed.
    pub fn from_route_leg(
        distance_m: f64,
        duration_s: f64,
        vehicle: VehicleType,
    ) -> Result<Self, ValidationError> {
        let distance_km = positive("distance", distance_m)? / 1000.0;
        let duration_hr = positive("duration", duration_s)? / 3600.0;
        let avg_speed = distance_km / duration_hr;
        Self::new(
            round2(distance_km),
            round2(avg_speed),
            vehicle,
            TrafficLevel::from_avg_speed(avg_speed),
        )
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    pub fn vehicle(&self) -> VehicleType {
        self.vehicle
    }

    pub fn traffic(&self) -> TrafficLevel {
        self.traffic
    }
}

impl TryFrom<&RouteInput> for RouteObservation {
    type Error = ValidationError;

    fn try_from(input: &RouteInput) -> Result<Self, Self::Error> {
        let vehicle = input.vehicle.parse()?;
        let traffic = input.traffic.parse()?;
        Self::new(input.distance, input.avg_speed, vehicle, traffic)
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    // NaN fails the comparison too.
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Values too large to scale by 100 already have no fractional part.
pub(crate) fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn distance(&self) -> f64 {
        self.0[0]
    }

    pub fn avg_speed(&self) -> f64 {
        self.0[1]
    }

    pub fn vehicle_weight(&self) -> f64 {
        self.0[2]
    }

    pub fn traffic_impact(&self) -> f64 {
        self.0[3]
    }

    pub fn congestion_factor(&self) -> f64 {
        self.0[4]
    }

    pub fn effective_speed(&self) -> f64 {
        self.0[5]
    }

    pub fn stress_score(&self) -> f64 {
        self.0[6]
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

pub fn derive_features(route: &RouteObservation) -> FeatureVector {
    let vehicle_weight = route.vehicle.weight();
    let traffic_impact = route.traffic.impact();

    let congestion_factor = traffic_impact * route.distance;
    let effective_speed = route.avg_speed / traffic_impact;
    let stress_score = vehicle_weight * congestion_factor;

    FeatureVector([
        route.distance,
        route.avg_speed,
        vehicle_weight,
        traffic_impact,
        congestion_factor,
        effective_speed,
        stress_score,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(distance: f64, avg_speed: f64, vehicle: &str, traffic: &str) -> RouteInput {
        RouteInput {
            distance,
            avg_speed,
            vehicle: vehicle.to_string(),
            traffic: traffic.to_string(),
        }
    }

    #[test]
    fn car_in_low_traffic() {
        let route = RouteObservation::try_from(&input(10.0, 40.0, "car", "low")).unwrap();
        let features = derive_features(&route);
        assert_eq!(
            features.as_slice(),
            &[10.0, 40.0, 1500.0, 1.0, 10.0, 40.0, 15000.0]
        );
    }

    #[test]
    fn derived_columns_follow_their_identities() {
        for vehicle in VehicleType::ALL {
            for traffic in TrafficLevel::ALL {
                let route = RouteObservation::new(7.3, 33.0, vehicle, traffic).unwrap();
                let f = derive_features(&route);
                assert_eq!(f.distance(), 7.3);
                assert_eq!(f.avg_speed(), 33.0);
                assert_eq!(f.vehicle_weight(), vehicle.weight());
                assert_eq!(f.traffic_impact(), traffic.impact());
                assert_eq!(f.congestion_factor(), f.traffic_impact() * f.distance());
                assert_eq!(f.effective_speed(), f.avg_speed() / f.traffic_impact());
                assert_eq!(f.stress_score(), f.vehicle_weight() * f.congestion_factor());
            }
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let route =
            RouteObservation::new(12.5, 18.0, VehicleType::Bike, TrafficLevel::High).unwrap();
        assert_eq!(derive_features(&route), derive_features(&route));
    }

    #[test]
    fn rejects_non_positive_numbers() {
        let err = RouteObservation::try_from(&input(0.0, 40.0, "car", "low")).unwrap_err();
        assert_eq!(err.field(), "distance");

        let err = RouteObservation::try_from(&input(5.0, -3.0, "car", "low")).unwrap_err();
        assert_eq!(err.field(), "avg_speed");

        let err = RouteObservation::try_from(&input(f64::NAN, 40.0, "car", "low")).unwrap_err();
        assert_eq!(err.field(), "distance");
    }

    #[test]
    fn rejects_distance_that_overflows_features() {
        // 1500 * 2.5 * 1e306 is past f64::MAX
        let err = RouteObservation::try_from(&input(1e306, 40.0, "car", "high")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "distance",
                value: 1e306
            }
        );

        // the same distance on a bike in light traffic stays finite
        let route = RouteObservation::try_from(&input(1e300, 40.0, "bike", "low")).unwrap();
        assert!(derive_features(&route).as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn round2_keeps_huge_values_finite() {
        assert_eq!(round2(1.005e3), 1005.0);
        assert_eq!(round2(69.993), 69.99);
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(f64::MAX), f64::MAX);
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = RouteObservation::try_from(&input(5.0, 40.0, "scooter", "low")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownVehicle("scooter".to_string()));

        let err = RouteObservation::try_from(&input(5.0, 40.0, "bike", "jammed")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownTraffic("jammed".to_string()));
    }

    #[test]
    fn route_leg_converts_units() {
        // 12.346 km in 15 minutes
        let route = RouteObservation::from_route_leg(12_346.0, 900.0, VehicleType::Car).unwrap();
        assert_eq!(route.distance(), 12.35);
        assert_eq!(route.avg_speed(), 49.38);
        assert_eq!(route.traffic(), TrafficLevel::Low);

        // 3 km in 10 minutes: 18 km/h
        let route = RouteObservation::from_route_leg(3_000.0, 600.0, VehicleType::Bike).unwrap();
        assert_eq!(route.avg_speed(), 18.0);
        assert_eq!(route.traffic(), TrafficLevel::High);
    }

    #[test]
    fn route_leg_rejects_zero_duration() {
        let err = RouteObservation::from_route_leg(1_000.0, 0.0, VehicleType::Car).unwrap_err();
        assert_eq!(err.field(), "duration");
    }
}
