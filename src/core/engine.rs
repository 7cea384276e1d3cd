use crate::core::context::FloodRiskContext;
use crate::core::risk::risk_score_for;
use crate::core::scoring::{elevation_to_decile, forest_percentage_to_score, proximity_to_score};
use crate::domain::model::{Coordinates, FactorScores, Measurements, RiskAssessment, ScoringProfile};
use crate::domain::ports::Geocoder;
use crate::spatial::proximity::{distance_to_nearest_object, forested_area_percentage};
use crate::spatial::raster::get_elevation_from_coordinates;
use crate::spatial::regions::{get_region_name, is_not_within_border};
use crate::utils::error::{FloodRiskError, Result};
use crate::utils::monitor::SystemMonitor;

/// Outcome of resolving an address before it can be assessed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Location {
    Found(Coordinates),
    NotFound,
    OutsideBorder(Coordinates),
}

pub struct FloodRiskEngine<G: Geocoder> {
    geocoder: G,
    context: FloodRiskContext,
    profile: ScoringProfile,
    monitor: SystemMonitor,
}

impl<G: Geocoder> FloodRiskEngine<G> {
    pub fn new(geocoder: G, context: FloodRiskContext, profile: ScoringProfile) -> Self {
        Self::new_with_monitoring(geocoder, context, profile, false)
    }

    pub fn new_with_monitoring(
        geocoder: G,
        context: FloodRiskContext,
        profile: ScoringProfile,
        monitor_enabled: bool,
    ) -> Self {
        let engine = Self {
            geocoder,
            context,
            profile,
            monitor: SystemMonitor::new(monitor_enabled),
        };
        for label in engine.regions_without_precipitation() {
            tracing::warn!(
                "⚠️ Region '{}' has no precipitation scores; addresses there cannot be assessed",
                label
            );
        }
        engine.monitor.log_stats("Datasets ready");
        engine
    }

    pub fn context(&self) -> &FloodRiskContext {
        &self.context
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Region labels produced by the region layer that the precipitation
    /// table cannot score.
    pub fn regions_without_precipitation(&self) -> Vec<String> {
        self.context
            .regions
            .labels()
            .into_iter()
            .filter(|label| !self.profile.precipitation.contains(label))
            .map(str::to_string)
            .collect()
    }

    /// Geocodes the address and checks it against the national border.
    pub async fn locate(&self, address: &str) -> Result<Location> {
        let Some(coordinates) = self.geocoder.geocode(address).await? else {
            return Ok(Location::NotFound);
        };

        if is_not_within_border(coordinates, &self.context.border) {
            tracing::info!(
                "🚫 ({}, {}) is outside the border",
                coordinates.longitude,
                coordinates.latitude
            );
            return Ok(Location::OutsideBorder(coordinates));
        }
        Ok(Location::Found(coordinates))
    }

    /// Runs every factor for coordinates already known to be in-border.
    pub fn assess(&self, address: &str, coordinates: Coordinates) -> Result<RiskAssessment> {
        let context = &self.context;
        let profile = &self.profile;

        let elevation_m = get_elevation_from_coordinates(coordinates, &context.elevation)?;
        let river_distance_deg = distance_to_nearest_object(coordinates, &context.rivers)?;
        let water_body_distance_deg =
            distance_to_nearest_object(coordinates, &context.water_bodies)?;
        let forest_percentage =
            forested_area_percentage(coordinates, &context.forests, profile.forest_buffer_radius);

        let scores = FactorScores {
            elevation: elevation_to_decile(elevation_m, &context.elevation),
            rivers: proximity_to_score(river_distance_deg, &profile.rivers_breakpoints),
            water_bodies: proximity_to_score(
                water_body_distance_deg,
                &profile.water_bodies_breakpoints,
            ),
            forest: forest_percentage_to_score(forest_percentage, &profile.forest_breakpoints),
        };
        tracing::debug!(
            "Measurements: elevation {:.1} m, river {:.5}°, water body {:.5}°, forest {:.2}% -> {:?}",
            elevation_m,
            river_distance_deg,
            water_body_distance_deg,
            forest_percentage,
            scores
        );

        let region = get_region_name(coordinates, &context.regions).ok_or(
            FloodRiskError::RegionNotFound {
                lon: coordinates.longitude,
                lat: coordinates.latitude,
            },
        )?;
        let precipitation_scores = *profile.precipitation.scores_for(&region)?;

        let risk_score = risk_score_for(&scores, &precipitation_scores, &profile.weights);
        tracing::info!("🌊 {} ({}) scored {:.4}", address, region, risk_score);
        self.monitor.log_stats("Assessment finished");

        Ok(RiskAssessment {
            address: address.to_string(),
            coordinates,
            region,
            measurements: Measurements {
                elevation_m,
                river_distance_deg,
                water_body_distance_deg,
                forest_percentage,
            },
            scores,
            precipitation_scores,
            risk_score,
            assessed_at: chrono::Utc::now(),
        })
    }
}
