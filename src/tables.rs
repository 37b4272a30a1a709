use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// Nominal vehicle mass in kg.
const CAR_WEIGHT: f64 = 1500.0;
const BIKE_WEIGHT: f64 = 150.0;

// Multiplier applied to distance under each traffic level.
const LOW_IMPACT: f64 = 1.0;
const MEDIUM_IMPACT: f64 = 1.4;
const HIGH_IMPACT: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleType {
    Car,
    Bike,
}

impl VehicleType {
    pub const ALL: [VehicleType; 2] = [VehicleType::Car, VehicleType::Bike];

    pub fn weight(self) -> f64 {
        match self {
            VehicleType::Car => CAR_WEIGHT,
            VehicleType::Bike => BIKE_WEIGHT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
        }
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "car" => Ok(VehicleType::Car),
            "bike" => Ok(VehicleType::Bike),
            other => Err(ValidationError::UnknownVehicle(other.to_string())),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub const ALL: [TrafficLevel; 3] = [
        TrafficLevel::Low,
        TrafficLevel::Medium,
        TrafficLevel::High,
    ];

    /// Always >= 1.0, so dividing by it is safe.
    pub fn impact(self) -> f64 {
        match self {
            TrafficLevel::Low => LOW_IMPACT,
            TrafficLevel::Medium => MEDIUM_IMPACT,
            TrafficLevel::High => HIGH_IMPACT,
        }
    }

    /// Guess the traffic level from the average speed (km/h) a routing
    /// service reports for a leg: free-flowing above 40, congested at 25 or below.
    pub fn from_avg_speed(avg_speed: f64) -> Self {
        if avg_speed > 40.0 {
            TrafficLevel::Low
        } else if avg_speed > 25.0 {
            TrafficLevel::Medium
        } else {
            TrafficLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficLevel::Low => "low",
            TrafficLevel::Medium => "medium",
            TrafficLevel::High => "high",
        }
    }
}

impl FromStr for TrafficLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TrafficLevel::Low),
            "medium" => Ok(TrafficLevel::Medium),
            "high" => Ok(TrafficLevel::High),
            other => Err(ValidationError::UnknownTraffic(other.to_string())),
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-keyed lookup of a vehicle's nominal weight.
pub fn vehicle_weight(label: &str) -> Result<f64, ValidationError> {
    label.parse::<VehicleType>().map(VehicleType::weight)
}

/// String-keyed lookup of a traffic level's impact coefficient.
pub fn traffic_impact(label: &str) -> Result<f64, ValidationError> {
    label.parse::<TrafficLevel>().map(TrafficLevel::impact)
}
