//! Planar distance and coverage queries. Everything is measured in the
//! datasets' native units (degrees for WGS84 layers), which is what the
//! proximity breakpoints are calibrated against.

use crate::domain::model::Coordinates;
use crate::spatial::layers::FeatureLayer;
use crate::utils::error::{FloodRiskError, Result};
use geo::{
    Area, BooleanOps, BoundingRect, Closest, ClosestPoint, Coord, EuclideanDistance, Intersects,
    LineString, Polygon, Rect,
};
use std::f64::consts::PI;

pub const DEFAULT_BUFFER_RADIUS: f64 = 0.01;

/// 每四分之一圓 16 段
const BUFFER_QUADRANT_SEGMENTS: usize = 16;

/// Distance from the point to the closest geometry of the layer.
/// Zero when the point lies on or inside a feature.
pub fn distance_to_nearest_object(coordinates: Coordinates, features: &FeatureLayer) -> Result<f64> {
    let point = coordinates.to_point();

    features
        .geometries()
        .iter()
        .filter_map(|geometry| match geometry.closest_point(&point) {
            Closest::Intersection(_) => Some(0.0),
            Closest::SinglePoint(nearest) => Some(point.euclidean_distance(&nearest)),
            Closest::Indeterminate => None,
        })
        .min_by(|a, b| a.total_cmp(b))
        .ok_or_else(|| FloodRiskError::DatasetError {
            layer: features.name().to_string(),
            message: "layer has no geometry to measure against".to_string(),
        })
}

/// Polygonal approximation of a circle around the coordinates.
pub fn circular_buffer(coordinates: Coordinates, radius: f64) -> Polygon<f64> {
    let segments = BUFFER_QUADRANT_SEGMENTS * 4;
    let ring: Vec<(f64, f64)> = (0..segments)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / segments as f64;
            (
                coordinates.longitude + radius * angle.cos(),
                coordinates.latitude + radius * angle.sin(),
            )
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// Percentage (0-100) of a circular buffer covered by the layer's polygons.
/// Overlapping forest polygons are counted once per feature.
pub fn forested_area_percentage(
    coordinates: Coordinates,
    forests: &FeatureLayer,
    buffer_radius: f64,
) -> f64 {
    let buffer = circular_buffer(coordinates, buffer_radius);
    let buffer_area = buffer.unsigned_area();
    if buffer_area == 0.0 {
        return 0.0;
    }

    let envelope = Rect::new(
        Coord {
            x: coordinates.longitude - buffer_radius,
            y: coordinates.latitude - buffer_radius,
        },
        Coord {
            x: coordinates.longitude + buffer_radius,
            y: coordinates.latitude + buffer_radius,
        },
    );

    let forested_area: f64 = forests
        .polygons()
        .filter(|polygon| {
            polygon
                .bounding_rect()
                .is_some_and(|bounds| bounds.intersects(&envelope))
        })
        .map(|polygon| buffer.intersection(&polygon).unsigned_area())
        .sum();

    forested_area / buffer_area * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, Point};

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Geometry<f64> {
        Geometry::Polygon(Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y }).to_polygon())
    }

    #[test]
    fn test_distance_to_nearest_line() {
        let rivers = FeatureLayer::new(
            "rivers",
            vec![
                Geometry::LineString(LineString::from(vec![(15.0, 50.1), (16.0, 50.1)])),
                Geometry::LineString(LineString::from(vec![(15.0, 50.0), (16.0, 50.0)])),
            ],
        );
        let distance = distance_to_nearest_object(Coordinates::new(15.5, 50.03), &rivers).unwrap();
        assert!((distance - 0.03).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_points_and_inside_polygon() {
        let layer = FeatureLayer::new(
            "water_bodies",
            vec![
                Geometry::Point(Point::new(15.0, 50.0)),
                rect(14.0, 49.0, 14.5, 49.5),
            ],
        );
        let distance = distance_to_nearest_object(Coordinates::new(15.03, 50.04), &layer).unwrap();
        assert!((distance - 0.05).abs() < 1e-9);

        let inside = distance_to_nearest_object(Coordinates::new(14.2, 49.2), &layer).unwrap();
        assert_eq!(inside, 0.0);
    }

    #[test]
    fn test_distance_against_empty_layer() {
        let layer = FeatureLayer::new("rivers", vec![]);
        assert!(distance_to_nearest_object(Coordinates::new(15.0, 50.0), &layer).is_err());
    }

    #[test]
    fn test_buffer_area_close_to_circle() {
        let buffer = circular_buffer(Coordinates::new(15.417, 50.073), DEFAULT_BUFFER_RADIUS);
        let circle = PI * DEFAULT_BUFFER_RADIUS * DEFAULT_BUFFER_RADIUS;
        let ratio = buffer.unsigned_area() / circle;
        assert!(ratio < 1.0 && ratio > 0.998);
    }

    #[test]
    fn test_forest_fully_covering_buffer() {
        let forests = FeatureLayer::new("forests", vec![rect(15.0, 50.0, 16.0, 51.0)]);
        let pct = forested_area_percentage(Coordinates::new(15.417, 50.073), &forests, DEFAULT_BUFFER_RADIUS);
        assert!((pct - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_forest_outside_buffer() {
        let forests = FeatureLayer::new("forests", vec![rect(16.0, 49.0, 16.5, 49.5)]);
        let pct = forested_area_percentage(Coordinates::new(15.417, 50.073), &forests, DEFAULT_BUFFER_RADIUS);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_forest_partially_covering_buffer() {
        // 森林從圓心往東半個半徑開始，真實圓的比例約 19.55%
        let center = Coordinates::new(15.417, 50.073);
        let edge = center.longitude + DEFAULT_BUFFER_RADIUS / 2.0;
        let forests = FeatureLayer::new("forests", vec![rect(edge, 49.9, 15.6, 50.2)]);
        let pct = forested_area_percentage(center, &forests, DEFAULT_BUFFER_RADIUS);
        assert!((pct - 19.55).abs() < 0.3, "got {}", pct);
    }
}
