use crate::config::toml_config::{DataConfig, RegionsConfig};
use crate::spatial::{BorderLayer, ElevationRaster, FeatureLayer, RegionLayer};
use crate::utils::error::Result;
use std::path::Path;

/// All reference datasets, loaded once and shared read-only by every
/// assessment.
#[derive(Debug, Clone)]
pub struct FloodRiskContext {
    pub elevation: ElevationRaster,
    pub rivers: FeatureLayer,
    pub water_bodies: FeatureLayer,
    pub forests: FeatureLayer,
    pub regions: RegionLayer,
    pub border: BorderLayer,
}

impl FloodRiskContext {
    pub fn load(data: &DataConfig, regions: &RegionsConfig, base_dir: &Path) -> Result<Self> {
        let data = data.resolve(base_dir);

        let elevation = ElevationRaster::from_geotiff(&data.elevation)?;
        let rivers = FeatureLayer::from_geojson("rivers", &data.rivers)?;
        let water_bodies = FeatureLayer::from_geojson("water_bodies", &data.water_bodies)?;
        let forests = FeatureLayer::from_geojson("forests", &data.forests)?;
        let border = BorderLayer::from_geojson(&data.border)?;

        let region_layer = regions.merged.iter().fold(
            RegionLayer::from_geojson(&data.regions, &regions.name_property)?,
            |layer, merged| layer.with_merged(&merged.label, merged.members.iter().cloned()),
        );

        tracing::info!(
            "✅ Datasets loaded: raster {}x{}, {} rivers, {} water bodies, {} forests, {} regions",
            elevation.width(),
            elevation.height(),
            rivers.len(),
            water_bodies.len(),
            forests.len(),
            region_layer.regions().len()
        );

        Ok(Self {
            elevation,
            rivers,
            water_bodies,
            forests,
            regions: region_layer,
            border,
        })
    }
}
