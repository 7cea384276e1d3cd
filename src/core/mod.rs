pub mod context;
pub mod engine;
pub mod risk;
pub mod scoring;

pub use crate::domain::model::{Coordinates, RiskAssessment, ScoringProfile};
pub use crate::domain::ports::Geocoder;
pub use crate::utils::error::Result;
