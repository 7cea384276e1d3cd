pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod spatial;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::NominatimGeocoder;
pub use app::InteractiveSession;
pub use config::FloodRiskConfig;
pub use crate::core::context::FloodRiskContext;
pub use crate::core::engine::{FloodRiskEngine, Location};
pub use utils::error::{FloodRiskError, Result};
