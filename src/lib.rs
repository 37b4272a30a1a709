//! GreenRoute: estimates the CO2 emission of candidate travel routes with a
//! pre-fit regression model and recommends the greenest one.

pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod features;
pub mod model;
pub mod selector;
pub mod tables;

pub use error::{ModelError, PredictionError, ValidationError};
pub use estimator::{BatchPrediction, EmissionEstimator};
pub use features::{FeatureVector, RouteInput, RouteObservation, derive_features};
pub use model::{EmissionModel, ModelArtifact};
pub use selector::{PredictionResult, select_greenest};
pub use tables::{TrafficLevel, VehicleType};
