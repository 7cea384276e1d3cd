use crate::domain::model::Coordinates;
use crate::spatial::layers::{BorderLayer, RegionLayer};
use geo::Contains;

/// First region (in dataset order) whose polygons strictly contain the
/// point, reported under its merged label. `None` when no region matches.
pub fn get_region_name(coordinates: Coordinates, regions: &RegionLayer) -> Option<String> {
    let point = coordinates.to_point();
    regions
        .regions()
        .iter()
        .find(|region| region.area.0.iter().any(|polygon| polygon.contains(&point)))
        .map(|region| regions.label_for(&region.name).to_string())
}

pub fn is_within_border(coordinates: Coordinates, border: &BorderLayer) -> bool {
    let point = coordinates.to_point();
    border.area().0.iter().any(|polygon| polygon.contains(&point))
}

/// `true` when the point lies outside the national border.
pub fn is_not_within_border(coordinates: Coordinates, border: &BorderLayer) -> bool {
    !is_within_border(coordinates, border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::layers::Region;
    use geo::{Coord, MultiPolygon, Rect};

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![Rect::new(
            Coord { x: min_x, y: min_y },
            Coord { x: max_x, y: max_y },
        )
        .to_polygon()])
    }

    fn regions() -> RegionLayer {
        RegionLayer::new(vec![
            Region {
                name: "Hlavní město Praha".to_string(),
                area: square(14.2, 49.9, 14.7, 50.2),
            },
            Region {
                name: "Středočeský kraj".to_string(),
                area: square(13.5, 49.5, 15.5, 49.9),
            },
            Region {
                name: "Pardubický kraj".to_string(),
                area: square(15.3, 49.9, 16.8, 50.3),
            },
        ])
        .with_merged(
            "Praha a Středočeský kraj",
            ["Hlavní město Praha", "Středočeský kraj"],
        )
    }

    #[test]
    fn test_region_name_for_point_inside() {
        assert_eq!(
            get_region_name(Coordinates::new(15.417, 50.073), &regions()).as_deref(),
            Some("Pardubický kraj")
        );
    }

    #[test]
    fn test_merged_regions_share_label() {
        let layer = regions();
        assert_eq!(
            get_region_name(Coordinates::new(14.4, 50.08), &layer).as_deref(),
            Some("Praha a Středočeský kraj")
        );
        assert_eq!(
            get_region_name(Coordinates::new(14.0, 49.7), &layer).as_deref(),
            Some("Praha a Středočeský kraj")
        );
    }

    #[test]
    fn test_point_outside_all_regions() {
        assert_eq!(get_region_name(Coordinates::new(2.35, 48.85), &regions()), None);
    }

    #[test]
    fn test_border_check() {
        let border = BorderLayer::new(square(12.0, 48.5, 18.9, 51.1));
        assert!(!is_not_within_border(Coordinates::new(15.417, 50.073), &border));
        assert!(is_not_within_border(Coordinates::new(13.405, 52.52), &border));
        assert!(is_within_border(Coordinates::new(14.42, 50.09), &border));
    }
}
